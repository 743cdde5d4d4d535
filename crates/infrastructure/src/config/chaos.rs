//! Fault injection and output configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source value that reads the chaos document from standard input
pub const STDIN_SOURCE: &str = "-";

/// Fault injection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosAppConfig {
    /// Path of the chaos document, or `-` for standard input
    #[serde(default)]
    pub source: Option<String>,

    /// Use the built-in profile when no source is given
    #[serde(default)]
    pub default_profile: bool,

    /// Request paths that are never subjected to faults
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl ChaosAppConfig {
    /// Whether the chaos document comes from standard input
    pub fn reads_stdin(&self) -> bool {
        self.source.as_deref() == Some(STDIN_SOURCE)
    }
}

/// Where normalized messages are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File receiving one JSON line per message; unset discards messages
    #[serde(default)]
    pub path: Option<PathBuf>,
}
