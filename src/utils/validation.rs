//! Recipient address validation

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Loose shape check: something, an `@`, something, a dot, something
static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Addresses split by [`partition_recipients`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientPartition {
    /// Trimmed addresses that look deliverable
    pub valid: Vec<String>,
    /// Rejected addresses, as given
    pub invalid: Vec<String>,
}

/// Whether `address` (after trimming) has the shape of an email address
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .is_some_and(|regex| regex.is_match(address.trim()))
}

/// Split addresses into valid and invalid, keeping input order
pub fn partition_recipients<S: AsRef<str>>(addresses: &[S]) -> RecipientPartition {
    let mut partition = RecipientPartition::default();
    for address in addresses {
        let address = address.as_ref();
        if is_valid_email(address) {
            partition.valid.push(address.trim().to_string());
        } else {
            partition.invalid.push(address.to_string());
        }
    }
    partition
}
