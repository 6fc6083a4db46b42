//! Helper constructors for dispatch errors

use super::types::DispatchError;

impl DispatchError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error comes from bad configuration rather than the environment
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Validation(_) | Self::Yaml(_))
    }
}
