//! JSON lines publisher
//!
//! Writes every published message as one JSON object per line. Records are
//! serialized on the calling task, then written on the blocking pool while
//! holding the writer lock, so concurrent publishers never interleave and a
//! slow disk never stalls the runtime.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::PublisherPort;
use async_trait::async_trait;
use domain::Message;
use parking_lot::Mutex;
use tracing::{info, instrument};

use crate::config::OutputConfig;

/// Publisher that appends JSON lines to a writer
pub struct JsonLinesPublisher {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    target: String,
}

impl fmt::Debug for JsonLinesPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLinesPublisher")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl JsonLinesPublisher {
    /// Publish to an arbitrary writer; `target` names it in logs
    pub fn new<W>(writer: W, target: impl Into<String>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            target: target.into(),
        }
    }

    /// Append to a file, creating it when missing
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file), path.display().to_string()))
    }

    /// Accept and drop every message
    pub fn discard() -> Self {
        Self::new(io::sink(), "<discard>")
    }

    /// Build the publisher selected by the output configuration
    pub fn from_config(config: &OutputConfig) -> io::Result<Self> {
        let publisher = match &config.path {
            Some(path) => Self::open(path)?,
            None => Self::discard(),
        };
        info!(target_sink = %publisher.target, "Message publisher ready");
        Ok(publisher)
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl PublisherPort for JsonLinesPublisher {
    #[instrument(skip(self, message), fields(path = %message.path()))]
    async fn publish(&self, message: &Message) -> Result<(), ApplicationError> {
        let mut line =
            serde_json::to_vec(message).map_err(|e| ApplicationError::Publish(e.to_string()))?;
        line.push(b'\n');

        let writer = Arc::clone(&self.writer);
        tokio::task::spawn_blocking(move || {
            let mut writer = writer.lock();
            writer.write_all(&line).and_then(|()| writer.flush())
        })
        .await
        .map_err(|e| ApplicationError::Publish(format!("Writer task failed: {e}")))?
        .map_err(|e| ApplicationError::Publish(e.to_string()))
    }
}
