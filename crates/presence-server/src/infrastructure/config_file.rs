//! TOML configuration file support.
//!
//! The file is optional.  Every key has a default, so a partial file (or an
//! empty one) is valid:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 5000
//!
//! [timeouts]
//! device_secs = 20
//! request_secs = 30
//! accept_secs = 60
//! sweep_interval_secs = 0   # 0 disables the background sweeper
//! ```
//!
//! Command-line flags and environment variables override whatever the file
//! says; see `main.rs`.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use presence_core::TimeoutPolicy;

use crate::domain::ServerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `server.bind` is not an IP address.
    #[error("invalid bind address: '{0}'")]
    InvalidBindAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub timeouts: TimeoutSection,
}

/// `[server]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSection {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// `[timeouts]`, all in whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeoutSection {
    #[serde(default = "default_device_secs")]
    pub device_secs: u64,
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
    #[serde(default = "default_accept_secs")]
    pub accept_secs: u64,
    #[serde(default)]
    pub sweep_interval_secs: u64,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_device_secs() -> u64 {
    20
}
fn default_request_secs() -> u64 {
    30
}
fn default_accept_secs() -> u64 {
    60
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            device_secs: default_device_secs(),
            request_secs: default_request_secs(),
            accept_secs: default_accept_secs(),
            sweep_interval_secs: 0,
        }
    }
}

impl FileConfig {
    /// Converts the file representation into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBindAddress`] if `server.bind` is not an IP address.
    pub fn into_server_config(self) -> Result<ServerConfig, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.server.bind.clone()))?;

        let sweep_interval = match self.timeouts.sweep_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(ServerConfig {
            bind_addr: SocketAddr::new(ip, self.server.port),
            timeouts: TimeoutPolicy {
                device_timeout: Duration::from_secs(self.timeouts.device_secs),
                request_timeout: Duration::from_secs(self.timeouts.request_secs),
                accept_timeout: Duration::from_secs(self.timeouts.accept_secs),
            },
            sweep_interval,
        })
    }
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Parses config TOML text.
///
/// # Errors
///
/// [`ConfigError::Parse`] if the text is not valid TOML for this schema.
pub fn parse_config(text: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, or [`ConfigError::Parse`].
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_defaults_convert_to_default_server_config() {
        let cfg = FileConfig::default().into_server_config().unwrap();
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Arrange
        let text = r#"
            [timeouts]
            request_secs = 45
        "#;

        // Act
        let cfg = parse_config(text).unwrap();

        // Assert
        assert_eq!(cfg.timeouts.request_secs, 45);
        assert_eq!(cfg.timeouts.device_secs, 20);
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn test_full_file_round_trips_into_server_config() {
        let text = r#"
            [server]
            bind = "127.0.0.1"
            port = 8080

            [timeouts]
            device_secs = 10
            request_secs = 15
            accept_secs = 25
            sweep_interval_secs = 5
        "#;
        let cfg = parse_config(text).unwrap().into_server_config().unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.timeouts.device_timeout, Duration::from_secs(10));
        assert_eq!(cfg.timeouts.request_timeout, Duration::from_secs(15));
        assert_eq!(cfg.timeouts.accept_timeout, Duration::from_secs(25));
        assert_eq!(cfg.sweep_interval, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_bind_address_is_error() {
        let mut cfg = FileConfig::default();
        cfg.server.bind = "not.an.ip".to_string();
        assert!(matches!(
            cfg.into_server_config(),
            Err(ConfigError::InvalidBindAddress(_))
        ));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            parse_config("[server\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/definitely/not/here/presence.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
