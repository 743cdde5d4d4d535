//! Logging initialization
//!
//! Installs the global `tracing` subscriber used by the server and CLI.

mod logging;

pub use logging::{TelemetryError, build_filter, init_logging};
