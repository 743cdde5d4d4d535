//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Input that is not valid JSON or base64
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Input larger than the ceiling for its event type
    #[error("Request too large (limit={limit} size={size})")]
    SizeExceeded { limit: usize, size: usize },

    /// Input stream ended in the middle of a value
    ///
    /// Almost always a client disconnect; callers log it quietly.
    #[error("Unexpected end of input")]
    Truncated,

    /// The publisher could not record a message
    #[error("Publish failed: {0}")]
    Publish(String),
}

impl ApplicationError {
    /// Whether this error is the routine truncated-input kind
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }

    /// Whether the error was caused by the submitted request
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::SizeExceeded { .. } | Self::Truncated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_exceeded_message() {
        let err = ApplicationError::SizeExceeded {
            limit: 32_768,
            size: 40_000,
        };
        assert_eq!(err.to_string(), "Request too large (limit=32768 size=40000)");
    }

    #[test]
    fn truncated_is_detected() {
        assert!(ApplicationError::Truncated.is_truncated());
        assert!(!ApplicationError::Malformed("x".to_string()).is_truncated());
    }

    #[test]
    fn client_errors() {
        assert!(ApplicationError::Truncated.is_client_error());
        assert!(ApplicationError::Malformed("bad".to_string()).is_client_error());
        assert!(
            ApplicationError::SizeExceeded { limit: 1, size: 2 }.is_client_error()
        );
        assert!(!ApplicationError::Publish("disk full".to_string()).is_client_error());
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::InvalidStatusCode(7).into();
        assert_eq!(err.to_string(), "Invalid status code: 7");
    }
}
