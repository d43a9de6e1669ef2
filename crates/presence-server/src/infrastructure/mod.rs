//! Infrastructure layer for presence-server.
//!
//! Everything that touches the outside world lives here:
//!
//! - Binding the HTTP listener and routing requests (`http_server`)
//! - Reading the optional TOML configuration file (`config_file`)
//! - Running the optional background expiry pass (`sweeper`)
//!
//! Request semantics are NOT decided here; handlers delegate to
//! [`crate::application::coordinator_service`].

pub mod config_file;
pub mod http_server;
pub mod sweeper;

pub use http_server::{router, run_server};
