//! Timeout policy and the lazy expiry rule.
//!
//! Three clocks run per device:
//!
//! | Timeout           | Default | Measured from  | Effect when exceeded                 |
//! |-------------------|---------|----------------|--------------------------------------|
//! | `device_timeout`  | 20 s    | `last_seen`    | record evicted on the next listing   |
//! | `request_timeout` | 30 s    | `request_time` | `Requested` falls back to `Available` |
//! | `accept_timeout`  | 60 s    | `request_time` | `Accepted` falls back to `Available`  |
//!
//! Nothing here runs in the background.  The registry calls
//! [`evaluate_expiry`] when a device's status is queried and [`is_stale`]
//! when devices are listed.

use std::time::{Duration, Instant};

use super::device::{DeviceRecord, DeviceStatus};

/// The three timeouts that drive liveness and pairing expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Silence after which a device is no longer listed and gets evicted.
    pub device_timeout: Duration,
    /// How long a pairing request may stay unanswered.
    pub request_timeout: Duration,
    /// How long an accepted pairing stays visible before resetting.
    pub accept_timeout: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            device_timeout: Duration::from_secs(20),
            request_timeout: Duration::from_secs(30),
            accept_timeout: Duration::from_secs(60),
        }
    }
}

/// Outcome of [`evaluate_expiry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// No pairing timeout has fired.
    Unchanged,
    /// A `Requested` record outlived `request_timeout`.
    RequestTimedOut,
    /// An `Accepted` record outlived `accept_timeout`.
    AcceptTimedOut,
}

impl Expiry {
    pub fn fired(self) -> bool {
        self != Self::Unchanged
    }
}

/// Decides whether a pairing timeout has fired for `record` at `now`.
///
/// The window must be strictly exceeded: a request exactly
/// `request_timeout` old is still pending.
pub fn evaluate_expiry(record: &DeviceRecord, now: Instant, policy: &TimeoutPolicy) -> Expiry {
    let Some(started) = record.request_time() else {
        return Expiry::Unchanged;
    };
    let elapsed = now.saturating_duration_since(started);

    match record.status() {
        DeviceStatus::Requested if elapsed > policy.request_timeout => Expiry::RequestTimedOut,
        DeviceStatus::Accepted if elapsed > policy.accept_timeout => Expiry::AcceptTimedOut,
        _ => Expiry::Unchanged,
    }
}

/// `true` when the device has been silent for longer than `device_timeout`.
pub fn is_stale(record: &DeviceRecord, now: Instant, policy: &TimeoutPolicy) -> bool {
    now.saturating_duration_since(record.last_seen()) > policy.device_timeout
}

impl DeviceRecord {
    /// Evaluates and applies pairing expiry in place.
    pub fn apply_expiry(&mut self, now: Instant, policy: &TimeoutPolicy) -> Expiry {
        let outcome = evaluate_expiry(self, now, policy);
        if outcome.fired() {
            self.mark_available();
        }
        outcome
    }
}
