//! Configuration module for parley.

use serde::Deserialize;
use std::path::Path;

use crate::{ParleyError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum number of concurrent connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> usize {
    64
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace / debug / info / warn / error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/parley.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Outbound IP lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Endpoint returning the caller's public IP as `{"ip": "..."}`.
    #[serde(default = "default_lookup_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,
}

fn default_lookup_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_lookup_timeout() -> u64 {
    5
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url: default_lookup_url(),
            timeout_secs: default_lookup_timeout(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// IP lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ParleyError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_connections, 64);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.lookup.timeout_secs, 5);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000
max_connections = 8

[logging]
level = "debug"
file = "/tmp/parley-test.log"

[lookup]
url = "http://localhost:9999/ip"
timeout_secs = 2
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_connections, 8);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.lookup.url, "http://localhost:9999/ip");
        assert_eq!(config.lookup.timeout_secs, 2);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 2323
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 2323);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("definitely/not/here.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [[[").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ParleyError::Config(_))));
    }
}
