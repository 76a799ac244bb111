//! Favorites repository.
//!
//! A user's favorites live in the `favorites` array of their profile document
//! and are only ever changed with atomic array union/remove operations.
//! Writes for the same (user, product) pair are serialized, so a burst of
//! toggles leaves the store in the state of the last request.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;
use vitrine_core::{ProductId, UserUid};

use super::records::{decode_favorites, map_products, product_fields, profile_fields};
use super::{FetchReport, RepositoryError};
use crate::models::session::Session;
use crate::store::{DocumentStore, FieldUpdate};
use crate::sync::KeyedLocks;

/// Repository for per-user favorites.
#[derive(Clone)]
pub struct FavoritesRepository {
    inner: Arc<FavoritesRepositoryInner>,
}

struct FavoritesRepositoryInner {
    store: Arc<dyn DocumentStore>,
    users: String,
    products: String,
    batch_size: usize,
    write_locks: KeyedLocks<(UserUid, ProductId)>,
}

impl FavoritesRepository {
    /// Create a repository.
    ///
    /// `batch_size` caps how many ids go into one "in" query; it is clamped to
    /// at least 1.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        users: impl Into<String>,
        products: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            inner: Arc::new(FavoritesRepositoryInner {
                store,
                users: users.into(),
                products: products.into(),
                batch_size: batch_size.max(1),
                write_locks: KeyedLocks::new(),
            }),
        }
    }

    /// Read the favorite id set of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile document is missing,
    /// `RepositoryError::Read` if the store request fails, and
    /// `RepositoryError::DataCorruption` if `favorites` is not an array.
    #[instrument(skip(self, session), fields(uid = %session.uid))]
    pub async fn fetch_favorite_ids(
        &self,
        session: &Session,
    ) -> Result<BTreeSet<ProductId>, RepositoryError> {
        let users = &self.inner.users;
        let doc = self
            .inner
            .store
            .get(users, session.uid.as_str())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to read user document");
                RepositoryError::read(users, e)
            })?
            .ok_or_else(|| RepositoryError::NotFound(format!("{users}/{}", session.uid)))?;

        decode_favorites(session.uid.as_str(), &doc)
    }

    /// Resolve product ids to cards.
    ///
    /// Ids are queried in chunks of the configured batch size. Ids with no
    /// matching product are omitted; if several records carry the same id,
    /// the first one wins. Cards come back in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Read` if any chunk query fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn resolve(&self, ids: &BTreeSet<ProductId>) -> Result<FetchReport, RepositoryError> {
        let products = &self.inner.products;
        let values: Vec<Value> = ids
            .iter()
            .map(|id| Value::String(id.as_str().to_owned()))
            .collect();

        let mut snapshots = Vec::new();
        for chunk in values.chunks(self.inner.batch_size) {
            let found = self
                .inner
                .store
                .query_in(products, product_fields::ID, chunk)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to fetch favorite products");
                    RepositoryError::read(products, e)
                })?;
            snapshots.extend(found);
        }

        let mut report = map_products(snapshots);
        let mut seen = HashSet::new();
        report.items.retain(|item| seen.insert(item.id().clone()));
        report.items.sort_by(|a, b| a.id().cmp(b.id()));

        let omitted = ids.len().saturating_sub(report.items.len());
        if omitted > 0 {
            tracing::debug!(omitted, "Some favorites have no matching product");
        }
        Ok(report)
    }

    /// Fetch the signed-in user's favorites as cards.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_favorite_ids`] and [`Self::resolve`].
    pub async fn fetch_favorites(&self, session: &Session) -> Result<FetchReport, RepositoryError> {
        let ids = self.fetch_favorite_ids(session).await?;
        self.resolve(&ids).await
    }

    /// Whether `product_id` is currently in the user's favorites.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_favorite_ids`].
    pub async fn is_favorite(
        &self,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<bool, RepositoryError> {
        Ok(self.fetch_favorite_ids(session).await?.contains(product_id))
    }

    /// Flip the favorite state of a product and return the new state.
    ///
    /// `currently_favorite` is the caller's view of the current state; the
    /// write requests the opposite.
    ///
    /// # Errors
    ///
    /// See [`Self::set_favorite`]. On error the caller's flag must stay as it was.
    pub async fn toggle(
        &self,
        session: &Session,
        product_id: &ProductId,
        currently_favorite: bool,
    ) -> Result<bool, RepositoryError> {
        let desired = !currently_favorite;
        self.set_favorite(session, product_id, desired).await?;
        Ok(desired)
    }

    /// Add (`favorite = true`) or remove a product from the user's favorites.
    ///
    /// Idempotent. Calls for the same user and product are applied one at a
    /// time in call order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile document is missing
    /// and `RepositoryError::Write` if the store rejects the mutation.
    #[instrument(skip(self, session), fields(uid = %session.uid, product_id = %product_id))]
    pub async fn set_favorite(
        &self,
        session: &Session,
        product_id: &ProductId,
        favorite: bool,
    ) -> Result<(), RepositoryError> {
        let key = (session.uid.clone(), product_id.clone());
        let _guard = self.inner.write_locks.lock(&key).await;

        let value = vec![Value::String(product_id.as_str().to_owned())];
        let update = if favorite {
            FieldUpdate::ArrayUnion(value)
        } else {
            FieldUpdate::ArrayRemove(value)
        };

        let users = &self.inner.users;
        self.inner
            .store
            .update(
                users,
                session.uid.as_str(),
                vec![(profile_fields::FAVORITES.to_owned(), update)],
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, favorite, "Failed to update favorites");
                RepositoryError::write(users, e)
            })?;

        crate::error::add_breadcrumb(
            "favorites",
            if favorite {
                "Added product to favorites"
            } else {
                "Removed product from favorites"
            },
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(())
    }
}
