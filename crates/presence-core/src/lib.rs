//! # presence-core
//!
//! Device presence and pairing coordination, with no dependency on any
//! network transport.
//!
//! # Architecture overview (for beginners)
//!
//! Remote devices register themselves under an id of their own choosing,
//! keep themselves alive with periodic heartbeats, and negotiate one-to-one
//! pairing: a *requester* asks a *receiver* to pair, and the receiver
//! accepts or declines.  Once accepted, the requester can read the
//! receiver's advertised address and connect to it directly.
//!
//! This crate is the whole of that coordination logic:
//!
//! - **`domain`** – The device record, its pairing status, the timeout
//!   policy, and the pure [`evaluate_expiry`] rule.  Time is read through the
//!   [`Clock`] trait so every timeout can be tested deterministically.
//!
//! - **`registry`** – The [`Registry`]: the single owner of all device
//!   records, guarded by one mutex so that every operation is an atomic
//!   read-modify-write.
//!
//! The HTTP surface lives in the `presence-server` crate and only decodes
//! requests into [`Registry`] calls.

pub mod domain;
pub mod registry;

// Re-export the most-used types at the crate root so callers can write
// `presence_core::Registry` instead of `presence_core::registry::store::Registry`.
pub use domain::clock::{Clock, ManualClock, SystemClock};
pub use domain::device::{DeviceRecord, DeviceStatus, DeviceSummary, StatusReport};
pub use domain::expiry::{evaluate_expiry, is_stale, Expiry, TimeoutPolicy};
pub use registry::error::RegistryError;
pub use registry::store::{Registry, SweepReport};
