//! Repositories over the document store.
//!
//! # Collections
//!
//! - `users/{uid}` - profile fields plus the `favorites` array of product ids
//! - `products/{autoId}` - product records (`id`, `name`, `cost`, `description`, `images`)
//!
//! Every read and write returns a typed `Result`. Product records that fail to
//! decode are not errors: they are collected in [`FetchReport::skipped`] so the
//! caller can see what was dropped and why.

pub mod catalog;
pub mod favorites;
pub mod profiles;
pub mod records;

pub use catalog::CatalogRepository;
pub use favorites::FavoritesRepository;
pub use profiles::ProfileRepository;
pub use records::{MappingError, SkippedRecord};

use thiserror::Error;
use vitrine_core::CardItem;

use crate::store::StoreError;

/// Errors raised by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading from the store failed.
    #[error("failed to read {collection}: {source}")]
    Read {
        /// Collection that was read.
        collection: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// Writing to the store failed.
    #[error("failed to write {collection}: {source}")]
    Write {
        /// Collection that was written.
        collection: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// The addressed document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A document exists but cannot be used (e.g. `favorites` is not an array).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    pub(crate) fn read(collection: &str, source: StoreError) -> Self {
        Self::Read {
            collection: collection.to_owned(),
            source,
        }
    }

    pub(crate) fn write(collection: &str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound { collection, id } => Self::NotFound(format!("{collection}/{id}")),
            source => Self::Write {
                collection: collection.to_owned(),
                source,
            },
        }
    }
}

/// Result of a fetch that maps many records: what mapped, and what did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchReport {
    /// Successfully mapped cards, in store order.
    pub items: Vec<CardItem>,
    /// Records dropped during mapping.
    pub skipped: Vec<SkippedRecord>,
}

impl FetchReport {
    /// True when every record mapped.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
