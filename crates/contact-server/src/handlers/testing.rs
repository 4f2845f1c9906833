//! Router fixtures shared by handler tests

use crate::storage::Database;
use crate::{router, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use contact_core::{Contact, ContactError, ContactFields, ContactStore, Result};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PORT: u16 = 5555;

/// Router over a fresh in-memory database
pub async fn test_app() -> Router {
    let db = Database::in_memory().await.unwrap();
    router(AppState::new(Arc::new(db), TEST_PORT))
}

/// Router whose store fails every call
pub fn failing_app() -> Router {
    router(AppState::new(Arc::new(FailingStore), TEST_PORT))
}

/// Send one request and decode the JSON response
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

struct FailingStore;

fn unavailable<T>() -> Result<T> {
    Err(ContactError::Storage("disk I/O error".to_string()))
}

#[async_trait]
impl ContactStore for FailingStore {
    async fn find_max_sequential_id(&self) -> Result<Option<i64>> {
        unavailable()
    }

    async fn insert(&self, _fields: &ContactFields) -> Result<Contact> {
        unavailable()
    }

    async fn find_all(&self) -> Result<Vec<Contact>> {
        unavailable()
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Contact>> {
        unavailable()
    }

    async fn update(&self, _id: &str, _fields: &ContactFields) -> Result<Option<Contact>> {
        unavailable()
    }

    async fn delete_by_id(&self, _id: &str) -> Result<Option<Contact>> {
        unavailable()
    }

    async fn ping(&self) -> Result<()> {
        unavailable()
    }
}
