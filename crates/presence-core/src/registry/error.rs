//! Error type for registry operations.

use thiserror::Error;

/// Why a registry call was rejected.
///
/// A rejected call never modifies the table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A required field was missing or empty.  The caller must fix the request.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    /// The referenced device never registered or has been evicted.
    /// The device should register again.
    #[error("device not found: {0}")]
    NotFound(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
