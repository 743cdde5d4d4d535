//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// A value could not be encoded as JSON
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Unknown event type name
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// A chaos weight is negative or not a finite number
    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),

    /// The weights of a chaos list add up to more than 100
    #[error("Sum of weights must be <= 100; is {0}")]
    WeightSumExceeded(f64),

    /// A status override names something that is not an HTTP status code
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u16),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
