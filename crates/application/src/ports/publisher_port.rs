//! Publisher port
//!
//! The sink that records normalized messages. Implementations must
//! serialize concurrent calls so records are never interleaved.

use async_trait::async_trait;
use domain::Message;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for recording normalized messages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PublisherPort: Send + Sync {
    /// Record one message as a single discrete unit
    async fn publish(&self, message: &Message) -> Result<(), ApplicationError>;
}
