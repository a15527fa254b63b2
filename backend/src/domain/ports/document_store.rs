//! Port for the external document database.
//!
//! Documents are untyped key/value maps grouped into named collections. The
//! store assigns ids for added documents and keeps a revision per document so
//! callers can make updates conditional on what they last read.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use super::define_port_error;

/// Untyped document body.
pub type Document = Map<String, Value>;

/// Collections used by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Complaints,
    Suggestions,
    AuthorizedAdmins,
}

impl Collection {
    pub const ALL: [Self; 4] = [
        Self::Users,
        Self::Complaints,
        Self::Suggestions,
        Self::AuthorizedAdmins,
    ];

    /// Collection name in the document store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Complaints => "complaints",
            Self::Suggestions => "suggestions",
            Self::AuthorizedAdmins => "authorizedAdmins",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    /// Starts at 1 and grows by one with every write to the document.
    pub revision: u64,
    pub data: Document,
}

/// Change notification published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChange {
    pub collection: Collection,
    pub id: String,
    pub revision: u64,
}

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "document store connection failed: {message}",
        /// The store refused or failed the operation.
        Query { message: String } =>
            "document store query failed: {message}",
        /// The addressed document does not exist.
        NotFound { collection: String, id: String } =>
            "document {collection}/{id} not found",
        /// Conditional update saw a newer revision.
        RevisionMismatch { expected: u64, actual: u64 } =>
            "revision mismatch: expected {expected}, found {actual}",
    }
}

/// Port for document storage.
///
/// # Revision semantics
///
/// - `add` and the first `set` of an id create revision 1.
/// - `set` on an existing id and `update` increment the revision.
/// - `update` with `expected_revision = Some(n)` fails with
///   [`DocumentStoreError::RevisionMismatch`] unless the stored revision is
///   `n`, and writes nothing in that case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` when absent.
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Full snapshot of a collection, ordered by creation.
    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    /// Insert a document under a store-generated id and return the id.
    async fn add(&self, collection: Collection, data: Document)
    -> Result<String, DocumentStoreError>;

    /// Create or replace the document stored under `id`.
    async fn set(
        &self,
        collection: Collection,
        id: &str,
        data: Document,
    ) -> Result<u64, DocumentStoreError>;

    /// Merge `patch` into an existing document and return the new revision.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
        expected_revision: Option<u64>,
    ) -> Result<u64, DocumentStoreError>;

    /// Receive a notification for every subsequent write to `collection`.
    fn subscribe(&self, collection: Collection) -> broadcast::Receiver<CollectionChange>;
}
