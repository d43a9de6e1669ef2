//! presence-server library crate.
//!
//! Exposes the [`presence_core::Registry`] over HTTP/JSON so devices can
//! register, heartbeat, list each other, and run the pairing handshake.
//!
//! # Architecture
//!
//! ```text
//! Device (JSON over HTTP)
//!         ↕
//! [presence-server]
//!   ├── domain/           Wire message types, ServerConfig
//!   ├── application/      Decode body → registry call → response; ApiError
//!   └── infrastructure/
//!         ├── http_server/  axum router and serve loop
//!         ├── config_file/  optional TOML configuration
//!         └── sweeper/      optional periodic expiry pass
//!         ↕
//! presence_core::Registry  (single shared table, one mutex)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no framework types beyond serde derives.
//! - `application` depends on `domain` and `presence-core` only.
//! - `infrastructure` owns everything that touches sockets, files, or tasks.

/// Domain layer: wire types and configuration (no I/O).
pub mod domain;

/// Application layer: one function per HTTP operation.
pub mod application;

/// Infrastructure layer: HTTP server, config file, background sweeper.
pub mod infrastructure;
