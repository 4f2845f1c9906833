//! Contact Core Library
//!
//! Domain errors, request validation, and the storage port for the contact
//! service.

// Re-export pure types from contact-types
pub use contact_types::*;

pub mod error;
pub mod ports;
pub mod validation;

pub use error::{ContactError, Result};
pub use ports::ContactStore;
pub use validation::{parse_contact_id, validate_payload};
