//! Application layer for presence-server.
//!
//! Turns a decoded HTTP request into exactly one [`presence_core::Registry`]
//! call and turns the outcome into a wire response or an [`ApiError`].
//!
//! # What does NOT belong here?
//!
//! - Routing, status codes, or response framing (that is infrastructure)
//! - Any state of its own; the registry is passed in on every call

pub mod coordinator_service;

pub use coordinator_service::ApiError;
