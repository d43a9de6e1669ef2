//! Registry: the in-memory table of device records.
//!
//! # Concurrency
//!
//! The whole table sits behind one `std::sync::Mutex`.  Every public method
//! takes the lock, reads the clock, does its read-modify-write, and releases
//! the lock before returning.  No method awaits, performs I/O, or calls back
//! into caller code while holding it, so critical sections are a handful of
//! hash-map operations long.
//!
//! Because `list_active` scans and evicts under that same lock, eviction
//! always acts on a consistent view: a `register` or `heartbeat` that lands
//! after the scan simply runs after it, and one that landed before it
//! refreshed `last_seen` first.
//!
//! The lock is never held across a panic-prone call, so a poisoned lock
//! still guards a consistent table and is recovered rather than propagated.
//!
//! # Expiry
//!
//! Expiry is lazy.  Pairing timeouts are applied when `check_status` is
//! called for that device, and stale devices are removed when
//! `list_active` runs.  [`Registry::sweep`] applies both rules to the whole
//! table at once for deployments that want a periodic background pass.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::device::{DeviceRecord, DeviceSummary, StatusReport};
use crate::domain::expiry::{is_stale, Expiry, TimeoutPolicy};
use crate::registry::error::RegistryError;

/// Counts returned by [`Registry::sweep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records removed because their device stopped sending heartbeats.
    pub evicted: usize,
    /// Records whose pairing request or acceptance timed out.
    pub expired: usize,
}

/// The presence and pairing registry.
///
/// Share it between request handlers as `Arc<Registry>`; every method takes
/// `&self`.
pub struct Registry {
    devices: Mutex<HashMap<String, DeviceRecord>>,
    policy: TimeoutPolicy,
    clock: Arc<dyn Clock>,
}

impl Registry {
    /// Creates an empty registry that reads the system clock.
    pub fn new(policy: TimeoutPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Creates an empty registry with an injected clock.
    pub fn with_clock(policy: TimeoutPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &TimeoutPolicy {
        &self.policy
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, DeviceRecord>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces the record for `id`.
    ///
    /// Re-registering an existing id overwrites it completely, which cancels
    /// any pairing negotiation that was in flight.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Validation`] if `id` or `address` is empty.
    pub fn register(
        &self,
        id: &str,
        address: &str,
        display_name: Option<&str>,
    ) -> Result<(), RegistryError> {
        if id.is_empty() {
            return Err(RegistryError::Validation { field: "id" });
        }
        if address.is_empty() {
            return Err(RegistryError::Validation { field: "address" });
        }

        let mut devices = self.table();
        let now = self.clock.now();
        let record = DeviceRecord::new(id, address, display_name.map(str::to_owned), now);
        if devices.insert(id.to_owned(), record).is_some() {
            debug!(device = id, "device re-registered; pairing state reset");
        } else {
            info!(device = id, address, "device registered");
        }
        Ok(())
    }

    /// Refreshes liveness for `id`.  Nothing else about the record changes.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `id` is unknown.
    pub fn heartbeat(&self, id: &str) -> Result<(), RegistryError> {
        let mut devices = self.table();
        let now = self.clock.now();
        let record = lookup(&mut devices, id)?;
        record.touch(now);
        debug!(device = id, "heartbeat");
        Ok(())
    }

    /// Lists devices seen within `device_timeout` and evicts the rest.
    ///
    /// Results are sorted by id.
    pub fn list_active(&self) -> Vec<DeviceSummary> {
        let mut devices = self.table();
        let now = self.clock.now();
        let policy = self.policy;

        devices.retain(|id, record| {
            let keep = !is_stale(record, now, &policy);
            if !keep {
                info!(device = %id, "evicting stale device");
            }
            keep
        });

        let mut active: Vec<DeviceSummary> = devices.values().map(DeviceRecord::summary).collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        active
    }

    /// Asks `receiver_id` to pair with `requester_id`.
    ///
    /// Any request already pending on the receiver is replaced.  The requester
    /// does not have to be registered.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if `receiver_id` is unknown.
    /// - [`RegistryError::Validation`] if `requester_id` is empty.
    pub fn send_request(&self, receiver_id: &str, requester_id: &str) -> Result<(), RegistryError> {
        let mut devices = self.table();
        let now = self.clock.now();
        let record = lookup(&mut devices, receiver_id)?;
        if requester_id.is_empty() {
            return Err(RegistryError::Validation { field: "id" });
        }
        if let Some(previous) = record.requested_by() {
            debug!(
                receiver = receiver_id,
                previous, "replacing pending pairing request"
            );
        }
        record.mark_requested(requester_id, now);
        info!(
            receiver = receiver_id,
            requester = requester_id,
            "pairing requested"
        );
        Ok(())
    }

    /// Accepts or declines the request pending on `id`.
    ///
    /// Accepting restarts the window so that `accept_timeout` counts from
    /// acceptance.  Accepting when there is no requester leaves the record as
    /// it is.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `id` is unknown.
    pub fn respond(&self, id: &str, accept: bool) -> Result<(), RegistryError> {
        let mut devices = self.table();
        let now = self.clock.now();
        let record = lookup(&mut devices, id)?;

        if accept {
            if record.mark_accepted(now) {
                info!(device = id, requester = ?record.requested_by(), "pairing accepted");
            } else {
                debug!(device = id, "accept ignored; no pending request");
            }
        } else {
            record.mark_available();
            info!(device = id, "pairing declined");
        }
        Ok(())
    }

    /// Returns the pairing status of `id`, applying any timeout that has fired.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `id` is unknown.
    pub fn check_status(&self, id: &str) -> Result<StatusReport, RegistryError> {
        let mut devices = self.table();
        let now = self.clock.now();
        let record = lookup(&mut devices, id)?;

        match record.apply_expiry(now, &self.policy) {
            Expiry::Unchanged => {}
            Expiry::RequestTimedOut => info!(device = id, "pairing request timed out"),
            Expiry::AcceptTimedOut => info!(device = id, "accepted pairing timed out"),
        }
        Ok(record.status_report())
    }

    /// Forces `id` back to `Available` from any state.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if `id` is unknown.
    pub fn reset(&self, id: &str) -> Result<(), RegistryError> {
        let mut devices = self.table();
        let record = lookup(&mut devices, id)?;
        record.mark_available();
        info!(device = id, "pairing state reset");
        Ok(())
    }

    /// Applies pairing expiry to every record and evicts stale devices.
    pub fn sweep(&self) -> SweepReport {
        let mut devices = self.table();
        let now = self.clock.now();
        let policy = self.policy;
        let before = devices.len();

        devices.retain(|_, record| !is_stale(record, now, &policy));
        let evicted = before - devices.len();
        let expired = devices
            .values_mut()
            .map(|record| record.apply_expiry(now, &policy))
            .filter(|outcome| outcome.fired())
            .count();

        if evicted > 0 || expired > 0 {
            info!(evicted, expired, "registry sweep");
        }
        SweepReport { evicted, expired }
    }

    /// Copy of the record for `id`, if present.  No expiry is applied.
    pub fn get(&self, id: &str) -> Option<DeviceRecord> {
        self.table().get(id).cloned()
    }

    /// Number of records currently held, stale or not.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(TimeoutPolicy::default())
    }
}

fn lookup<'a>(
    devices: &'a mut HashMap<String, DeviceRecord>,
    id: &str,
) -> Result<&'a mut DeviceRecord, RegistryError> {
    devices
        .get_mut(id)
        .ok_or_else(|| RegistryError::NotFound(id.to_owned()))
}
