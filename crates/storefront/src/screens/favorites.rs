//! The signed-in user's favorites list with search.

use vitrine_core::{CardItem, ProductId};

use crate::db::{FavoritesRepository, FetchReport, RepositoryError, SkippedRecord};
use crate::models::session::Session;
use crate::search;
use crate::sync::{RequestSequence, RequestTicket};

/// Resolved favorites as last fetched, plus the current search query.
#[derive(Debug, Default)]
pub struct FavoritesScreen {
    items: Vec<CardItem>,
    skipped: Vec<SkippedRecord>,
    query: String,
    fetches: RequestSequence,
}

impl FavoritesScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch. Any fetch started earlier becomes stale.
    pub fn begin_refresh(&self) -> RequestTicket {
        self.fetches.issue()
    }

    /// Install a fetch result if `ticket` is still the latest.
    ///
    /// # Errors
    ///
    /// Returns the fetch error of the latest request; the list is unchanged.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        result: Result<FetchReport, RepositoryError>,
    ) -> Result<bool, RepositoryError> {
        if !self.fetches.is_latest(ticket) {
            tracing::debug!(ticket = ticket.value(), "Discarding stale favorites fetch");
            return Ok(false);
        }
        let report = result?;
        self.items = report.items;
        self.skipped = report.skipped;
        Ok(true)
    }

    /// Fetch and resolve the user's favorites.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the list is left unchanged.
    pub async fn refresh(
        &mut self,
        repo: &FavoritesRepository,
        session: &Session,
    ) -> Result<bool, RepositoryError> {
        let ticket = self.begin_refresh();
        let result = repo.fetch_favorites(session).await;
        self.apply(ticket, result)
    }

    /// Remove a product from favorites, dropping it from the list once the
    /// store has accepted the removal.
    ///
    /// In-flight fetches are invalidated so they cannot bring the item back.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the list is left unchanged.
    pub async fn remove(
        &mut self,
        repo: &FavoritesRepository,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<(), RepositoryError> {
        repo.set_favorite(session, product_id, false).await?;
        self.fetches.invalidate();
        self.items.retain(|item| item.id() != product_id);
        Ok(())
    }

    /// Forget everything, e.g. on sign-out.
    pub fn clear(&mut self) {
        self.fetches.invalidate();
        self.items.clear();
        self.skipped.clear();
        self.query.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CardItem] {
        &self.items
    }

    /// Favorited records the last accepted fetch could not map.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The favorites to display, filtered by the search query.
    #[must_use]
    pub fn visible(&self) -> Vec<CardItem> {
        search::filter(&self.items, &self.query)
    }
}
