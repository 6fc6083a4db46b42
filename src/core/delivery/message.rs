//! Outbound email payload

use serde::{Deserialize, Serialize};

/// One outbound email, as loaded from a job file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient address
    pub to: String,
    pub subject: String,
    /// Rendered HTML body
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
}

impl OutboundMessage {
    pub fn new<S: Into<String>>(to: S, subject: S, body: S) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            template_id: None,
            contact_id: None,
        }
    }
}
