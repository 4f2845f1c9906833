//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use contact_types::{Contact, ContactFields};

/// Contact store
///
/// Identifiers are taken as raw strings; implementations reject malformed
/// ones with [`crate::ContactError::InvalidId`] rather than reporting them
/// as absent.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Highest sequential id currently stored, `None` when empty
    async fn find_max_sequential_id(&self) -> Result<Option<i64>>;

    /// Persist a new contact, assigning its id, sequential id and timestamps
    async fn insert(&self, fields: &ContactFields) -> Result<Contact>;

    /// All contacts ordered by sequential id ascending
    async fn find_all(&self) -> Result<Vec<Contact>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>>;

    /// Overwrite all business fields and refresh `updated_at`
    async fn update(&self, id: &str, fields: &ContactFields) -> Result<Option<Contact>>;

    /// Hard delete, returning the removed record
    async fn delete_by_id(&self, id: &str) -> Result<Option<Contact>>;

    /// Round-trip to the backend
    async fn ping(&self) -> Result<()>;
}
