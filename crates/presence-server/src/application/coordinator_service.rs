//! Coordinator service: one function per HTTP operation.
//!
//! Each function decodes the raw request body, calls the registry once, and
//! returns a wire type.  Bodies are decoded here rather than by the HTTP
//! framework so that an undecodable body is rejected with the same
//! `{"error": ...}` shape as every other failure, and before the registry is
//! touched.
//!
//! # Missing fields
//!
//! | Operation   | Missing field      | Outcome                         |
//! |-------------|--------------------|---------------------------------|
//! | `register`  | `id` or `ip`       | `Validation` (400)              |
//! | `heartbeat` | `id`               | `NotFound` (404)                |
//! | `request`   | `receiver`         | `NotFound` (404)                |
//! | `request`   | `id` (requester)   | `Validation` (400)              |
//! | `respond`   | `id`               | `NotFound` (404)                |
//! | `reset`     | `id`               | `NotFound` (404)                |
//!
//! A missing id on the lookup operations is treated as an id no device has.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use presence_core::{Registry, RegistryError};

use crate::domain::messages::{
    DeviceEntry, DeviceIdRequest, PairingRequest, RegisterRequest, RespondRequest, StatusResponse,
    SuccessResponse,
};

/// Plain-text banner served at `/`.
pub const BANNER: &str = "presence coordinator is running";

/// Errors that can occur while serving a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The body was not valid JSON for this operation.
    #[error("malformed request body: {0}")]
    MalformedInput(String),

    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The named device is not registered.  `role` is `"Device"` or `"Receiver"`.
    #[error("{role} not found")]
    NotFound { role: &'static str },

    /// `GET /status/{id}` for an unknown device.
    #[error("status requested for unknown device")]
    StatusNotFound,
}

/// Maps a registry rejection onto the wire error for one operation.
fn rejected(err: RegistryError, role: &'static str, missing: &str) -> ApiError {
    match err {
        RegistryError::NotFound(_) => ApiError::NotFound { role },
        RegistryError::Validation { .. } => ApiError::Validation(missing.to_owned()),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("rejecting undecodable request body: {e}");
        ApiError::MalformedInput(e.to_string())
    })
}

/// `POST /register`
pub fn register(registry: &Registry, body: &[u8]) -> Result<SuccessResponse, ApiError> {
    let req: RegisterRequest = decode(body)?;
    let id = req.id.unwrap_or_default();
    let ip = req.ip.unwrap_or_default();
    registry
        .register(&id, &ip, req.name.as_deref())
        .map_err(|e| rejected(e, "Device", "Missing ID or IP"))?;
    Ok(SuccessResponse::OK)
}

/// `POST /heartbeat`
pub fn heartbeat(registry: &Registry, body: &[u8]) -> Result<SuccessResponse, ApiError> {
    let req: DeviceIdRequest = decode(body)?;
    registry
        .heartbeat(req.id.as_deref().unwrap_or_default())
        .map_err(|e| rejected(e, "Device", "Missing ID"))?;
    Ok(SuccessResponse::OK)
}

/// `GET /list`
pub fn list(registry: &Registry) -> Vec<DeviceEntry> {
    registry
        .list_active()
        .into_iter()
        .map(DeviceEntry::from)
        .collect()
}

/// `POST /request`
pub fn request(registry: &Registry, body: &[u8]) -> Result<SuccessResponse, ApiError> {
    let req: PairingRequest = decode(body)?;
    let receiver = req.receiver.unwrap_or_default();
    let requester = req.id.unwrap_or_default();

    registry
        .send_request(&receiver, &requester)
        .map_err(|e| rejected(e, "Receiver", "Missing requester ID"))?;
    Ok(SuccessResponse::OK)
}

/// `POST /respond`
pub fn respond(registry: &Registry, body: &[u8]) -> Result<SuccessResponse, ApiError> {
    let req: RespondRequest = decode(body)?;
    registry
        .respond(req.id.as_deref().unwrap_or_default(), req.accept)
        .map_err(|e| rejected(e, "Device", "Missing ID"))?;
    Ok(SuccessResponse::OK)
}

/// `GET /status/{id}`
pub fn status(registry: &Registry, id: &str) -> Result<StatusResponse, ApiError> {
    registry
        .check_status(id)
        .map(StatusResponse::from)
        .map_err(|_| ApiError::StatusNotFound)
}

/// `POST /reset`
pub fn reset(registry: &Registry, body: &[u8]) -> Result<SuccessResponse, ApiError> {
    let req: DeviceIdRequest = decode(body)?;
    registry
        .reset(req.id.as_deref().unwrap_or_default())
        .map_err(|e| rejected(e, "Device", "Missing ID"))?;
    Ok(SuccessResponse::OK)
}
