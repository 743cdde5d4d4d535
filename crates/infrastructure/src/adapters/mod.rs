//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod jsonl_publisher;
mod system_clock;

pub use jsonl_publisher::JsonLinesPublisher;
pub use system_clock::SystemClock;
