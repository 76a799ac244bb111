//! Product catalog repository.

use std::sync::Arc;

use tracing::instrument;

use super::records::map_products;
use super::{FetchReport, RepositoryError};
use crate::store::DocumentStore;

/// Repository for the product collection.
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl CatalogRepository {
    /// Create a repository reading `collection`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Fetch and map the whole catalog in one request.
    ///
    /// The result is meant to replace the caller's list wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Read` if the store request fails. Malformed
    /// records are not errors; they are listed in [`FetchReport::skipped`].
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn fetch_all(&self) -> Result<FetchReport, RepositoryError> {
        let snapshots = self.store.list(&self.collection).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch products");
            RepositoryError::read(&self.collection, e)
        })?;

        let total = snapshots.len();
        let report = map_products(snapshots);
        tracing::debug!(
            total,
            mapped = report.items.len(),
            skipped = report.skipped.len(),
            "Catalog fetched"
        );
        Ok(report)
    }
}
