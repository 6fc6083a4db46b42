//! Validation trait definition

/// Validation trait for configuration structures
///
/// Validators report a human-readable reason; callers wrap it into
/// [`DispatchError::Config`](crate::utils::error::DispatchError::Config).
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
