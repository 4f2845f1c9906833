//! Error types for the contact service

use contact_types::FieldError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContactError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Contact not found: {0}")]
    NotFound(String),

    #[error("Invalid contact id: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ContactError {
    pub fn storage(e: impl std::fmt::Display) -> Self {
        ContactError::Storage(e.to_string())
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_fields() {
        let err = ContactError::Validation(vec![
            FieldError::new("name", "Name is required"),
            FieldError::new("email", "Invalid email format"),
        ]);

        assert_eq!(
            err.to_string(),
            "Validation failed: name: Name is required, email: Invalid email format"
        );
    }

    #[test]
    fn test_storage_helper() {
        let err = ContactError::storage("database is locked");
        assert_eq!(err, ContactError::Storage("database is locked".to_string()));
    }
}
