use std::fs;
use std::io::{self, Read};
use std::path::Path;

use application::chaos::{ChaosConfigError, parse_chaos_document};
use domain::WeightedChaos;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ChaosAppConfig;

/// Built-in profile: occasional long stalls and error responses
pub const DEFAULT_PROFILE: &str = r#"
[[chaos]]
weight = 5
[chaos.latency]
latency = 10000

[[chaos]]
weight = 5
[chaos.latency]
latency = 31000

[[chaos]]
weight = 5
[chaos.statusCode]
code = 500
body = "Something went wrong"

[[chaos]]
weight = 5
[chaos.statusCode]
code = 429
body = "slow down"
"#;

/// Errors raised while loading a chaos document
#[derive(Debug, Error)]
pub enum ChaosLoadError {
    #[error("Failed to read chaos document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid TOML chaos document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON chaos document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ChaosConfigError),
}

/// Syntax of a chaos document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    /// JSON when the text parses as JSON, TOML otherwise
    Detect,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Parse and validate a chaos document
pub fn parse_chaos_str(text: &str, format: DocumentFormat) -> Result<WeightedChaos, ChaosLoadError> {
    let document: Value = match format {
        DocumentFormat::Toml => toml::from_str(text)?,
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Detect => match serde_json::from_str(text) {
            Ok(value) => value,
            Err(_) => toml::from_str(text)?,
        },
    };

    let chaos = parse_chaos_document(&document).inspect_err(|invalid| {
        for problem in invalid.errors() {
            error!(error = %problem, "Rejected chaos entry");
        }
    })?;

    for entry in chaos.entries() {
        debug!(weight = entry.weight, fault = %entry.action, "Chaos entry");
    }
    Ok(chaos)
}

/// Load a chaos document from a file
pub fn load_chaos_file(path: &Path) -> Result<WeightedChaos, ChaosLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ChaosLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_chaos_str(&text, DocumentFormat::from_path(path))
}

/// Load a chaos document from a reader, such as standard input
pub fn load_chaos_reader<R: Read>(
    mut reader: R,
    format: DocumentFormat,
) -> Result<WeightedChaos, ChaosLoadError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| ChaosLoadError::Io {
            path: "<stdin>".to_string(),
            source,
        })?;
    parse_chaos_str(&text, format)
}

/// The built-in profile, validated
pub fn default_profile() -> Result<WeightedChaos, ChaosLoadError> {
    parse_chaos_str(DEFAULT_PROFILE, DocumentFormat::Toml)
}

/// Resolve the chaos list for a configuration
///
/// No source and no default profile means no faults at all.
pub fn load_chaos(config: &ChaosAppConfig) -> Result<WeightedChaos, ChaosLoadError> {
    let chaos = match config.source.as_deref() {
        Some(_) if config.reads_stdin() => {
            load_chaos_reader(io::stdin().lock(), DocumentFormat::Detect)?
        },
        Some(path) => load_chaos_file(Path::new(path))?,
        None if config.default_profile => default_profile()?,
        None => WeightedChaos::none(),
    };

    info!(
        entries = chaos.len(),
        total_weight = chaos.total_weight(),
        "Chaos configuration loaded"
    );
    Ok(chaos)
}
