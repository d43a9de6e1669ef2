//! Domain entities for the presence coordinator.
//!
//! Nothing in here performs I/O or locks anything.  The types describe a
//! single device and the rules that move it between pairing states; the
//! [`crate::registry`] module applies those rules to the shared table.

/// Time source abstraction used by the registry.
pub mod clock;

/// The per-device record and its projections.
pub mod device;

/// Timeout policy and the pure expiry rule.
pub mod expiry;
