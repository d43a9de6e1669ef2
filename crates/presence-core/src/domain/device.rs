//! The device record: one entry per registered device id.
//!
//! # Pairing lifecycle (for beginners)
//!
//! ```text
//!              send_request (by peer)          respond(accept = true)
//!  Available ─────────────────────────► Requested ─────────────────────► Accepted
//!      ▲                                    │                               │
//!      │   respond(false) / request timeout │     accept timeout            │
//!      └────────────────────────────────────┴───────────────────────────────┘
//!                 reset or re-register return any state to Available
//! ```
//!
//! The transition methods below always set `status`, `requested_by`, and
//! `request_time` together, so a record can never be observed with a peer
//! reference while `Available`, or without one while `Requested`/`Accepted`.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Pairing state of a single device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Free to receive a pairing request.  Initial state.
    Available,
    /// A peer has asked to pair and is waiting for an answer.
    Requested,
    /// The device accepted the pending request.
    Accepted,
}

impl DeviceStatus {
    /// Wire name of the status (`"available"`, `"requested"`, `"accepted"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Requested => "requested",
            Self::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the coordinator knows about one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    id: String,
    address: String,
    display_name: String,
    status: DeviceStatus,
    requested_by: Option<String>,
    last_seen: Instant,
    request_time: Option<Instant>,
}

impl DeviceRecord {
    /// Creates a fresh `Available` record seen at `now`.
    ///
    /// `display_name` falls back to `id` when absent or empty.
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        display_name: Option<String>,
        now: Instant,
    ) -> Self {
        let id = id.into();
        let display_name = display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.clone());
        Self {
            id,
            address: address.into(),
            display_name,
            status: DeviceStatus::Available,
            requested_by: None,
            last_seen: now,
            request_time: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    /// Id of the peer that asked to pair, while `Requested` or `Accepted`.
    pub fn requested_by(&self) -> Option<&str> {
        self.requested_by.as_deref()
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    /// When the current `Requested`/`Accepted` window began.
    pub fn request_time(&self) -> Option<Instant> {
        self.request_time
    }

    /// Records a heartbeat.  Touches liveness only.
    pub fn touch(&mut self, now: Instant) {
        self.last_seen = now;
    }

    /// Moves to `Requested` on behalf of `requester`, replacing any pending request.
    pub fn mark_requested(&mut self, requester: impl Into<String>, now: Instant) {
        self.status = DeviceStatus::Requested;
        self.requested_by = Some(requester.into());
        self.request_time = Some(now);
    }

    /// Moves to `Accepted` and restarts the window, keeping the requester.
    ///
    /// Returns `false` without changing anything when there is no requester
    /// to accept.
    pub fn mark_accepted(&mut self, now: Instant) -> bool {
        if self.requested_by.is_none() {
            return false;
        }
        self.status = DeviceStatus::Accepted;
        self.request_time = Some(now);
        true
    }

    /// Returns to `Available` and forgets the peer.
    pub fn mark_available(&mut self) {
        self.status = DeviceStatus::Available;
        self.requested_by = None;
        self.request_time = None;
    }

    /// Public projection returned by `list_active`.
    pub fn summary(&self) -> DeviceSummary {
        DeviceSummary {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            status: self.status,
            address: self.address.clone(),
        }
    }

    /// Status-query projection; the shape depends on the current status.
    pub fn status_report(&self) -> StatusReport {
        match (self.status, &self.requested_by) {
            (DeviceStatus::Requested, Some(peer)) => StatusReport::Requested {
                requested_by: peer.clone(),
            },
            (DeviceStatus::Accepted, _) => StatusReport::Accepted {
                address: self.address.clone(),
            },
            _ => StatusReport::Available,
        }
    }
}

/// A device as listed to other devices.  Timestamps and request metadata are withheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub id: String,
    pub display_name: String,
    pub status: DeviceStatus,
    pub address: String,
}

/// Answer to `check_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    Available,
    /// Someone wants to pair with this device.
    Requested { requested_by: String },
    /// The pairing was accepted; `address` is the device's own advertised address.
    Accepted { address: String },
}

impl StatusReport {
    pub fn status(&self) -> DeviceStatus {
        match self {
            Self::Available => DeviceStatus::Available,
            Self::Requested { .. } => DeviceStatus::Requested,
            Self::Accepted { .. } => DeviceStatus::Accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record() -> DeviceRecord {
        DeviceRecord::new("dev1", "10.0.0.1", None, Instant::now())
    }

    #[test]
    fn test_new_record_is_available_with_no_peer() {
        let record = make_record();
        assert_eq!(record.status(), DeviceStatus::Available);
        assert!(record.requested_by().is_none());
        assert!(record.request_time().is_none());
    }

    #[test]
    fn test_display_name_defaults_to_id() {
        let record = make_record();
        assert_eq!(record.display_name(), "dev1");
    }

    #[test]
    fn test_empty_display_name_defaults_to_id() {
        let record = DeviceRecord::new("dev1", "10.0.0.1", Some(String::new()), Instant::now());
        assert_eq!(record.display_name(), "dev1");
    }

    #[test]
    fn test_explicit_display_name_is_kept() {
        let record = DeviceRecord::new(
            "dev1",
            "10.0.0.1",
            Some("Living Room".to_string()),
            Instant::now(),
        );
        assert_eq!(record.display_name(), "Living Room");
    }

    #[test]
    fn test_mark_requested_sets_peer_and_time() {
        // Arrange
        let mut record = make_record();
        let now = Instant::now();

        // Act
        record.mark_requested("dev2", now);

        // Assert
        assert_eq!(record.status(), DeviceStatus::Requested);
        assert_eq!(record.requested_by(), Some("dev2"));
        assert_eq!(record.request_time(), Some(now));
    }

    #[test]
    fn test_mark_accepted_keeps_requester() {
        let mut record = make_record();
        record.mark_requested("dev2", Instant::now());
        assert!(record.mark_accepted(Instant::now()));
        assert_eq!(record.status(), DeviceStatus::Accepted);
        assert_eq!(record.requested_by(), Some("dev2"));
    }

    #[test]
    fn test_mark_accepted_without_requester_is_noop() {
        let mut record = make_record();
        let before = record.clone();
        assert!(!record.mark_accepted(Instant::now()));
        assert_eq!(record, before);
    }

    #[test]
    fn test_mark_available_clears_pairing_fields() {
        let mut record = make_record();
        record.mark_requested("dev2", Instant::now());
        record.mark_available();
        assert_eq!(record.status(), DeviceStatus::Available);
        assert!(record.requested_by().is_none());
        assert!(record.request_time().is_none());
    }

    #[test]
    fn test_touch_only_changes_last_seen() {
        // Arrange
        let mut record = make_record();
        record.mark_requested("dev2", Instant::now());
        let before = record.clone();
        let later = before.last_seen() + std::time::Duration::from_secs(5);

        // Act
        record.touch(later);

        // Assert
        assert_eq!(record.last_seen(), later);
        assert_eq!(record.status(), before.status());
        assert_eq!(record.requested_by(), before.requested_by());
        assert_eq!(record.address(), before.address());
        assert_eq!(record.request_time(), before.request_time());
    }

    #[test]
    fn test_status_report_shapes() {
        let mut record = make_record();
        assert_eq!(record.status_report(), StatusReport::Available);

        record.mark_requested("dev2", Instant::now());
        assert_eq!(
            record.status_report(),
            StatusReport::Requested {
                requested_by: "dev2".to_string()
            }
        );

        record.mark_accepted(Instant::now());
        assert_eq!(
            record.status_report(),
            StatusReport::Accepted {
                address: "10.0.0.1".to_string()
            }
        );
    }

    #[test]
    fn test_summary_withholds_request_metadata() {
        let mut record = make_record();
        record.mark_requested("dev2", Instant::now());
        let summary = record.summary();
        assert_eq!(summary.id, "dev1");
        assert_eq!(summary.display_name, "dev1");
        assert_eq!(summary.status, DeviceStatus::Requested);
        assert_eq!(summary.address, "10.0.0.1");
    }

    #[test]
    fn test_status_display_matches_as_str() {
        for status in [
            DeviceStatus::Available,
            DeviceStatus::Requested,
            DeviceStatus::Accepted,
        ] {
            assert_eq!(status.to_string(), status.as_str());
        }
    }
}
