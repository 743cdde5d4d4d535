//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: configuration
//! loading, chaos document loading, the message publisher, the clock and
//! logging setup.

pub mod adapters;
pub mod chaos;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use chaos::{ChaosLoadError, DocumentFormat, default_profile, load_chaos};
pub use config::{AppConfig, ChaosAppConfig, LogFormat, LoggingConfig, OutputConfig, ServerConfig};
pub use telemetry::{TelemetryError, init_logging};
