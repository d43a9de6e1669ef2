//! Server configuration types.
//!
//! [`ServerConfig`] holds every runtime setting.  `main.rs` builds it from
//! CLI arguments, environment variables, and an optional TOML file; tests
//! build it directly or use [`ServerConfig::default`].

use std::net::SocketAddr;
use std::time::Duration;

use presence_core::TimeoutPolicy;

/// All runtime configuration for the HTTP server.
///
/// # Example
///
/// ```rust
/// use presence_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 5000);
/// assert!(cfg.sweep_interval.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,

    /// Liveness and pairing timeouts handed to the registry.
    pub timeouts: TimeoutPolicy,

    /// How often the background sweeper runs, or `None` to rely purely on
    /// the lazy checks performed by `/list` and `/status/{id}`.
    pub sweep_interval: Option<Duration>,
}

impl Default for ServerConfig {
    /// | Field            | Default                 |
    /// |------------------|-------------------------|
    /// | bind_addr        | `0.0.0.0:5000`          |
    /// | timeouts         | 20 s / 30 s / 60 s      |
    /// | sweep_interval   | disabled                |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            timeouts: TimeoutPolicy::default(),
            sweep_interval: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_5000() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr.port(), 5000);
    }

    #[test]
    fn test_default_binds_all_interfaces() {
        let cfg = ServerConfig::default();
        assert!(cfg.bind_addr.ip().is_unspecified());
    }

    #[test]
    fn test_default_timeouts_match_registry_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.timeouts, TimeoutPolicy::default());
    }

    #[test]
    fn test_default_sweeper_is_disabled() {
        assert!(ServerConfig::default().sweep_interval.is_none());
    }
}
