//! Request validation
//!
//! Turns a raw [`ContactPayload`] into [`ContactFields`], collecting every
//! failing field instead of stopping at the first one. Create and update
//! share the same rules.

use crate::error::{ContactError, Result};
use contact_types::{ContactFields, ContactPayload, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Validate a create/update body
pub fn validate_payload(payload: &ContactPayload) -> Result<ContactFields> {
    let mut errors = Vec::new();

    let name = required_text(payload.name.as_ref(), "name", "Name", &mut errors);
    let email = required_text(payload.email.as_ref(), "email", "Email", &mut errors);
    let email = email.and_then(|email| {
        if is_valid_email(&email) {
            Some(email)
        } else {
            errors.push(FieldError::new("email", "Invalid email format"));
            None
        }
    });
    let phone_number = phone_number(payload.phone_number.as_ref(), &mut errors);
    let address = required_text(payload.address.as_ref(), "address", "Address", &mut errors);

    match (name, email, phone_number, address) {
        (Some(name), Some(email), Some(phone_number), Some(address)) => {
            Ok(ContactFields {
                name,
                email,
                phone_number,
                address,
            })
        }
        _ => Err(ContactError::Validation(errors)),
    }
}

/// Parse a path identifier into the store's primary key
pub fn parse_contact_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| ContactError::InvalidId(id.to_string()))
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn required_text(
    value: Option<&Value>,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        None | Some(Value::String(_)) => {
            errors.push(FieldError::new(field, format!("{} is required", label)));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(field, format!("{} must be a string", label)));
            None
        }
    }
}

fn phone_number(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<i64> {
    let parsed = match value {
        None => {
            errors.push(FieldError::new("phoneNumber", "Phone number is required"));
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new("phoneNumber", "Phone number is required"));
            return None;
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => {
            let digits = s.trim();
            if digits.chars().all(|c| c.is_ascii_digit()) {
                digits.parse::<i64>().ok()
            } else {
                None
            }
        }
        Some(_) => None,
    };

    match parsed.filter(|n| *n >= 0) {
        Some(n) => Some(n),
        None => {
            errors.push(FieldError::new("phoneNumber", "Phone number must be numeric"));
            None
        }
    }
}
