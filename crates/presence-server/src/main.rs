//! Presence coordinator entry point.
//!
//! Serves the device presence and pairing API over HTTP.  Devices register
//! with their address, send heartbeats to stay listed, and use
//! `/request` → `/respond` → `/status/{id}` to agree on a peer to connect to.
//!
//! # Usage
//!
//! ```text
//! presence-server [OPTIONS]
//!
//! Options:
//!   --config <FILE>               Optional TOML config file
//!   --bind <IP>                   Listen address [default: 0.0.0.0]
//!   --port <PORT>                 Listen port [default: 5000]
//!   --device-timeout <SECS>       Liveness timeout [default: 20]
//!   --request-timeout <SECS>      Pending-request timeout [default: 30]
//!   --accept-timeout <SECS>       Accepted-pairing timeout [default: 60]
//!   --sweep-interval <SECS>       Background sweep period, 0 = off [default: 0]
//! ```
//!
//! # Precedence
//!
//! CLI flag > environment variable > config file > built-in default.
//!
//! | Variable                   | Flag                |
//! |----------------------------|---------------------|
//! | `PRESENCE_CONFIG`          | `--config`          |
//! | `PRESENCE_BIND`            | `--bind`            |
//! | `PRESENCE_PORT`            | `--port`            |
//! | `PRESENCE_DEVICE_TIMEOUT`  | `--device-timeout`  |
//! | `PRESENCE_REQUEST_TIMEOUT` | `--request-timeout` |
//! | `PRESENCE_ACCEPT_TIMEOUT`  | `--accept-timeout`  |
//! | `PRESENCE_SWEEP_INTERVAL`  | `--sweep-interval`  |

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use presence_core::Registry;
use presence_server::domain::ServerConfig;
use presence_server::infrastructure::config_file::{load_config, FileConfig};
use presence_server::infrastructure::run_server;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Device presence and pairing coordinator.
///
/// Every option is optional so that an unset flag falls through to the
/// config file and then to the built-in default.
#[derive(Debug, Parser)]
#[command(
    name = "presence-server",
    about = "HTTP coordinator for device presence and one-to-one pairing",
    version
)]
struct Cli {
    /// TOML config file to read before applying flags.
    #[arg(long, env = "PRESENCE_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to bind the HTTP listener to.
    #[arg(long, env = "PRESENCE_BIND")]
    bind: Option<String>,

    /// TCP port for the HTTP listener.
    #[arg(long, env = "PRESENCE_PORT")]
    port: Option<u16>,

    /// Seconds without a heartbeat before a device is dropped from `/list`.
    #[arg(long, env = "PRESENCE_DEVICE_TIMEOUT")]
    device_timeout: Option<u64>,

    /// Seconds a pairing request may stay unanswered.
    #[arg(long, env = "PRESENCE_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// Seconds an accepted pairing stays visible.
    #[arg(long, env = "PRESENCE_ACCEPT_TIMEOUT")]
    accept_timeout: Option<u64>,

    /// Seconds between background sweeps; 0 disables the sweeper.
    #[arg(long, env = "PRESENCE_SWEEP_INTERVAL")]
    sweep_interval: Option<u64>,
}

impl Cli {
    /// Merges the config file (if any) with the flags into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the bind address is not an IP address.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut file = match &self.config {
            Some(path) => load_config(path)?,
            None => FileConfig::default(),
        };

        if let Some(bind) = self.bind {
            file.server.bind = bind;
        }
        if let Some(port) = self.port {
            file.server.port = port;
        }
        if let Some(secs) = self.device_timeout {
            file.timeouts.device_secs = secs;
        }
        if let Some(secs) = self.request_timeout {
            file.timeouts.request_secs = secs;
        }
        if let Some(secs) = self.accept_timeout {
            file.timeouts.accept_secs = secs;
        }
        if let Some(secs) = self.sweep_interval {
            file.timeouts.sweep_interval_secs = secs;
        }

        Ok(file.into_server_config()?)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_server_config()?;

    info!(
        "presence coordinator starting: bind={}, device_timeout={:?}, request_timeout={:?}, accept_timeout={:?}",
        config.bind_addr,
        config.timeouts.device_timeout,
        config.timeouts.request_timeout,
        config.timeouts.accept_timeout,
    );

    // Registry lifetime is process lifetime; nothing is persisted.
    let registry = Arc::new(Registry::new(config.timeouts));

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, registry, running).await?;

    info!("presence coordinator stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
