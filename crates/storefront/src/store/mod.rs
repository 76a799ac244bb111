//! Document store capability.
//!
//! # Architecture
//!
//! The remote database is reached through an external client; this layer only
//! sees the [`DocumentStore`] trait. Collections are flat and documents are
//! schema-less JSON objects addressed by collection + document id:
//!
//! - `users/{uid}` - profile document, including the `favorites` array
//! - `products/{autoId}` - product record
//!
//! Decoding documents into domain types happens in [`crate::db`], never here.
//!
//! [`MemoryStore`] implements the trait in-process for tests and demos.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A schema-less document body.
pub type Document = Map<String, Value>;

/// A document as returned by reads and queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Store-assigned document id.
    pub id: String,
    /// Document fields.
    pub data: Document,
}

/// One field mutation applied by [`DocumentStore::update`].
///
/// Array operations are executed atomically by the store, so concurrent
/// callers never need to read-modify-write the array themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Replace the field value.
    Set(Value),
    /// Append each value not already present (set union).
    ArrayUnion(Vec<Value>),
    /// Remove every occurrence of each value (set difference).
    ArrayRemove(Vec<Value>),
}

/// Errors reported by the store capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The addressed document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },

    /// The store refused the request (permissions, invalid argument, ...).
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Capability for reading and writing documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a single document; `Ok(None)` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or fully replace a document.
    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError>;

    /// Apply field mutations to an existing document as one atomic write.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldUpdate)>,
    ) -> Result<(), StoreError>;

    /// Read every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, StoreError>;

    /// Read the documents whose `field` equals one of `values`.
    async fn query_in(
        &self,
        collection: &str,
        field: &str,
        values: &[Value],
    ) -> Result<Vec<Snapshot>, StoreError>;
}
