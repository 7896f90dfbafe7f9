//! Daemon configuration with TOML file support.

use idcheck_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Which strategy answers the biometric step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationMode {
    /// Wait `scan_duration_ms`, then succeed.
    Simulated,
    /// Run `credential_command` and trust its exit status.
    Platform,
}

/// Configuration for both the lookup server and the terminal front end.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    // ── Server ──────────────────────────────────────────────────────────
    /// Address the lookup server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Lookup server port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Artificial delay before each lookup, in milliseconds.
    #[serde(default)]
    pub simulated_latency_ms: u64,

    /// TOML record file. The built-in demo set is served when absent.
    #[serde(default)]
    pub records_path: Option<PathBuf>,

    /// Whether to expose `GET /metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    // ── Logging ─────────────────────────────────────────────────────────
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // ── Terminal session ────────────────────────────────────────────────
    /// Base URL of the lookup server the terminal session talks to.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Upper bound on one lookup, in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    /// Artificial delay before the BVN comparison, in milliseconds.
    #[serde(default)]
    pub secondary_check_delay_ms: u64,

    /// Biometric confirmation strategy.
    #[serde(default = "default_confirmation")]
    pub confirmation: ConfirmationMode,

    /// Simulated scan duration, in milliseconds.
    #[serde(default = "default_scan_duration_ms")]
    pub scan_duration_ms: u64,

    /// Program (and arguments) used as the device credential check.
    #[serde(default = "default_credential_command")]
    pub credential_command: Vec<String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_url() -> String {
    format!("http://127.0.0.1:{}", default_rpc_port())
}

fn default_lookup_timeout_ms() -> u64 {
    5000
}

fn default_confirmation() -> ConfirmationMode {
    ConfirmationMode::Simulated
}

fn default_scan_duration_ms() -> u64 {
    3000
}

fn default_credential_command() -> Vec<String> {
    vec!["fprintd-verify".to_string()]
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn secondary_check_delay(&self) -> Duration {
        Duration::from_millis(self.secondary_check_delay_ms)
    }

    pub fn scan_duration(&self) -> Duration {
        Duration::from_millis(self.scan_duration_ms)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            rpc_port: default_rpc_port(),
            simulated_latency_ms: 0,
            records_path: None,
            enable_metrics: false,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            server_url: default_server_url(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            secondary_check_delay_ms: 0,
            confirmation: default_confirmation(),
            scan_duration_ms: default_scan_duration_ms(),
            credential_command: default_credential_command(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.rpc_port, config.rpc_port);
        assert_eq!(parsed.confirmation, config.confirmation);
        assert_eq!(parsed.credential_command, config.credential_command);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 7080);
        assert_eq!(config.lookup_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.server_url, "http://127.0.0.1:7080");
        assert!(config.records_path.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            simulated_latency_ms = 1500
            confirmation = "platform"
            log_format = "json"
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert_eq!(config.simulated_latency(), Duration::from_millis(1500));
        assert_eq!(config.confirmation, ConfirmationMode::Platform);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.scan_duration_ms, 3000); // default
    }

    #[test]
    fn sample_config_parses() {
        let config = DaemonConfig::from_toml_str(include_str!("../../demos/idcheck.toml"))
            .expect("sample config should parse");
        assert_eq!(config.simulated_latency_ms, 1500);
        assert_eq!(config.secondary_check_delay_ms, 1500);
        assert_eq!(
            config.records_path.as_deref(),
            Some(Path::new("demos/records.toml"))
        );
    }

    #[test]
    fn unknown_confirmation_mode_is_parse_error() {
        let err = DaemonConfig::from_toml_str(r#"confirmation = "retina""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file_and_reports_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enable_metrics = true").unwrap();
        assert!(DaemonConfig::from_toml_file(file.path()).unwrap().enable_metrics);

        let err = DaemonConfig::from_toml_file("/nonexistent/idcheck.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
