//! Contact types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored contact record
///
/// Field names on the wire follow the public API (`_id`, `contactId`,
/// `phoneNumber`, `__v`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-generated primary identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Human-facing sequential id, never reused
    pub contact_id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: i64,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of updates applied to this record
    #[serde(rename = "__v")]
    pub version: i64,
}

/// The four business fields, already validated
///
/// Create and update both write all four fields together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone_number: i64,
    pub address: String,
}

/// Raw create/update request body
///
/// Every field is kept as an untyped JSON value so that missing or
/// mistyped fields surface as field errors instead of a body rejection.
/// Only a JSON object can become a payload; `null` counts as missing.
#[derive(Debug, Clone, Default)]
pub struct ContactPayload {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone_number: Option<Value>,
    pub address: Option<Value>,
}

impl ContactPayload {
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let mut take = |key: &str| object.remove(key).filter(|v| !v.is_null());

        Self {
            name: take("name"),
            email: take("email"),
            phone_number: take("phoneNumber"),
            address: take("address"),
        }
    }
}
