//! Domain layer for presence-server.
//!
//! Pure types only: the JSON "language" spoken with devices, and the
//! runtime configuration struct.  Nothing here opens a socket or reads a
//! file.

pub mod config;
pub mod messages;

pub use config::ServerConfig;
pub use messages::{
    DeviceEntry, DeviceIdRequest, ErrorResponse, PairingRequest, RegisterRequest, RespondRequest,
    StatusResponse, SuccessResponse,
};
