//! The shared device registry.
//!
//! - **`store`** – [`store::Registry`], the table of device records and the
//!   seven operations devices use to announce and pair themselves.
//! - **`error`** – [`error::RegistryError`], returned when a call names an
//!   unknown device or omits a required field.

pub mod error;
pub mod store;
