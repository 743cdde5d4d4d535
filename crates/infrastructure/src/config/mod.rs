//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `logging`: log filter and format
//! - `chaos`: fault injection source and message output

mod chaos;
mod logging;
mod server;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use chaos::{ChaosAppConfig, OutputConfig, STDIN_SOURCE};
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "TRACKING_CHAOS";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Message output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Fault injection configuration
    #[serde(default)]
    pub chaos: ChaosAppConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// Reads `config.toml` from the working directory when present, then
    /// applies `TRACKING_CHAOS_*` variables. Nested keys are joined with
    /// `__`, e.g. `TRACKING_CHAOS_SERVER__PORT=9000`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_sources(None, None)
    }

    /// Build from an optional file and, for tests, an explicit variable map
    /// used in place of the process environment
    pub fn from_sources(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., TRACKING_CHAOS_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("chaos.excluded_paths")
                    .source(env),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            vars.iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults() {
        let config = AppConfig::from_sources(None, env(&[])).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.shutdown_timeout_secs, 5);
        assert!(!config.server.debug);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.output.path.is_none());
        assert!(config.chaos.source.is_none());
        assert!(!config.chaos.default_profile);
        assert!(config.chaos.excluded_paths.is_empty());
    }

    #[test]
    fn default_matches_serde_defaults() {
        let config = AppConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn environment_overrides() {
        let config = AppConfig::from_sources(
            None,
            env(&[
                ("TRACKING_CHAOS_SERVER__PORT", "9000"),
                ("TRACKING_CHAOS_SERVER__DEBUG", "true"),
                ("TRACKING_CHAOS_LOGGING__FORMAT", "json"),
                ("TRACKING_CHAOS_OUTPUT__PATH", "/tmp/messages.jsonl"),
                ("TRACKING_CHAOS_CHAOS__SOURCE", "-"),
                ("TRACKING_CHAOS_CHAOS__DEFAULT_PROFILE", "true"),
                (
                    "TRACKING_CHAOS_CHAOS__EXCLUDED_PATHS",
                    "/internal/health,/crossdomain.xml",
                ),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(config.server.debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.output.path,
            Some(PathBuf::from("/tmp/messages.jsonl"))
        );
        assert!(config.chaos.reads_stdin());
        assert!(config.chaos.default_profile);
        assert_eq!(
            config.chaos.excluded_paths,
            ["/internal/health", "/crossdomain.xml"]
        );
    }

    #[test]
    fn file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[chaos]
source = "chaos.toml"
excluded_paths = ["/internal/health"]
"#
        )
        .unwrap();

        let config = AppConfig::from_sources(
            Some(file.path()),
            env(&[("TRACKING_CHAOS_SERVER__PORT", "4000")]),
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.chaos.source.as_deref(), Some("chaos.toml"));
        assert!(!config.chaos.reads_stdin());
        assert_eq!(config.chaos.excluded_paths, ["/internal/health"]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::from_sources(Some(Path::new("/nonexistent/tracking.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_log_format_is_rejected() {
        let result = AppConfig::from_sources(None, env(&[("TRACKING_CHAOS_LOGGING__FORMAT", "xml")]));
        assert!(result.is_err());
    }

    #[test]
    fn bind_address() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
            ..ServerConfig::default()
        };
        assert_eq!(server.bind_address(), "127.0.0.1:8081");
    }
}
