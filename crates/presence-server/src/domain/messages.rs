//! JSON message types for the device-facing HTTP protocol.
//!
//! Field names follow the protocol devices already speak: a device's
//! address travels as `"ip"` and its display name as `"name"`, even though
//! the registry calls them `address` and `display_name`.
//!
//! # Request bodies
//!
//! ```json
//! POST /register   {"id":"dev1","ip":"10.0.0.1","name":"Desk"}
//! POST /heartbeat  {"id":"dev1"}
//! POST /request    {"id":"dev2","receiver":"dev1"}
//! POST /respond    {"id":"dev1","accept":true}
//! POST /reset      {"id":"dev1"}
//! ```
//!
//! Every field is optional at the serde level.  Whether a missing field is a
//! validation failure or an unknown device is decided by the application
//! layer, per operation.  Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use presence_core::{DeviceStatus, DeviceSummary, StatusReport};

// ── Device → server ───────────────────────────────────────────────────────────

/// Body of `POST /register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    pub id: Option<String>,
    /// Address peers should connect to once paired.
    pub ip: Option<String>,
    /// Display name; defaults to `id`.
    pub name: Option<String>,
}

/// Body of `POST /heartbeat` and `POST /reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceIdRequest {
    pub id: Option<String>,
}

/// Body of `POST /request`.
///
/// `id` is the device asking to pair; `receiver` is the device being asked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PairingRequest {
    pub id: Option<String>,
    pub receiver: Option<String>,
}

/// Body of `POST /respond`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RespondRequest {
    pub id: Option<String>,
    /// Absent means decline.
    #[serde(default)]
    pub accept: bool,
}

// ── Server → device ───────────────────────────────────────────────────────────

/// `{"success":true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

/// `{"error":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One element of the `GET /list` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    pub id: String,
    pub name: String,
    pub status: DeviceStatus,
    pub ip: String,
}

impl From<DeviceSummary> for DeviceEntry {
    fn from(summary: DeviceSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.display_name,
            status: summary.status,
            ip: summary.address,
        }
    }
}

/// Body of `GET /status/{id}`.
///
/// ```json
/// {"status":"available"}
/// {"status":"requested","requested_by":"dev2"}
/// {"status":"accepted","ip":"10.0.0.1"}
/// {"status":"not_found"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusResponse {
    Available,
    Requested { requested_by: String },
    Accepted { ip: String },
    NotFound,
}

impl From<StatusReport> for StatusResponse {
    fn from(report: StatusReport) -> Self {
        match report {
            StatusReport::Available => Self::Available,
            StatusReport::Requested { requested_by } => Self::Requested { requested_by },
            StatusReport::Accepted { address } => Self::Accepted { ip: address },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_accepts_missing_name() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"id":"dev1","ip":"10.0.0.1"}"#).unwrap();
        assert_eq!(req.id.as_deref(), Some("dev1"));
        assert_eq!(req.ip.as_deref(), Some("10.0.0.1"));
        assert!(req.name.is_none());
    }

    #[test]
    fn test_register_request_null_name_is_none() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"id":"dev1","ip":"10.0.0.1","name":null}"#).unwrap();
        assert!(req.name.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let req: DeviceIdRequest =
            serde_json::from_str(r#"{"id":"dev1","battery":87}"#).unwrap();
        assert_eq!(req.id.as_deref(), Some("dev1"));
    }

    #[test]
    fn test_respond_request_defaults_to_decline() {
        let req: RespondRequest = serde_json::from_str(r#"{"id":"dev1"}"#).unwrap();
        assert!(!req.accept);
    }

    #[test]
    fn test_success_response_shape() {
        let value = serde_json::to_value(SuccessResponse::OK).unwrap();
        assert_eq!(value, json!({"success": true}));
    }

    #[test]
    fn test_device_entry_uses_wire_field_names() {
        // Arrange
        let summary = DeviceSummary {
            id: "dev1".to_string(),
            display_name: "Desk".to_string(),
            status: DeviceStatus::Requested,
            address: "10.0.0.1".to_string(),
        };

        // Act
        let value = serde_json::to_value(DeviceEntry::from(summary)).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({"id": "dev1", "name": "Desk", "status": "requested", "ip": "10.0.0.1"})
        );
    }

    #[test]
    fn test_status_response_shapes() {
        let cases = [
            (StatusResponse::Available, json!({"status": "available"})),
            (
                StatusResponse::Requested {
                    requested_by: "dev2".to_string(),
                },
                json!({"status": "requested", "requested_by": "dev2"}),
            ),
            (
                StatusResponse::Accepted {
                    ip: "10.0.0.1".to_string(),
                },
                json!({"status": "accepted", "ip": "10.0.0.1"}),
            ),
            (StatusResponse::NotFound, json!({"status": "not_found"})),
        ];
        for (response, expected) in cases {
            assert_eq!(serde_json::to_value(&response).unwrap(), expected);
        }
    }

    #[test]
    fn test_status_response_from_accepted_report_carries_address() {
        let report = StatusReport::Accepted {
            address: "10.0.0.1".to_string(),
        };
        assert_eq!(
            StatusResponse::from(report),
            StatusResponse::Accepted {
                ip: "10.0.0.1".to_string()
            }
        );
    }
}
