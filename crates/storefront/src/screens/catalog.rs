//! Catalog list with search.

use vitrine_core::{CardItem, ProductId};

use crate::db::{CatalogRepository, FetchReport, RepositoryError, SkippedRecord};
use crate::search;
use crate::sync::{RequestSequence, RequestTicket};

/// The product list as last fetched, plus the current search query.
#[derive(Debug, Default)]
pub struct CatalogScreen {
    items: Vec<CardItem>,
    skipped: Vec<SkippedRecord>,
    query: String,
    fetches: RequestSequence,
}

impl CatalogScreen {
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
    /// Returns `Ok(false)` when the completion was stale and ignored. A failed
    /// fetch leaves the current list as it was.
    ///
    /// # Errors
    ///
    /// Returns the fetch error of the latest request.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        result: Result<FetchReport, RepositoryError>,
    ) -> Result<bool, RepositoryError> {
        if !self.fetches.is_latest(ticket) {
            tracing::debug!(ticket = ticket.value(), "Discarding stale catalog fetch");
            return Ok(false);
        }
        let report = result?;
        self.items = report.items;
        self.skipped = report.skipped;
        Ok(true)
    }

    /// Fetch the catalog and replace the list with the result.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the list is left unchanged.
    pub async fn refresh(&mut self, repo: &CatalogRepository) -> Result<bool, RepositoryError> {
        let ticket = self.begin_refresh();
        let result = repo.fetch_all().await;
        self.apply(ticket, result)
    }

    /// Every card from the last accepted fetch.
    #[must_use]
    pub fn items(&self) -> &[CardItem] {
        &self.items
    }

    /// Records the last accepted fetch dropped.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Mutable access to one card, e.g. to move its carousel.
    pub fn item_mut(&mut self, id: &ProductId) -> Option<&mut CardItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The cards to display: the list filtered by the search query.
    #[must_use]
    pub fn visible(&self) -> Vec<CardItem> {
        search::filter(&self.items, &self.query)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::*;
    use crate::store::{MemoryStore, StoreError};

    fn card(id: &str, title: &str) -> CardItem {
        CardItem::new(ProductId::new(id), title, "1", "d", vec!["u".to_owned()]).unwrap()
    }

    fn report(items: Vec<CardItem>) -> FetchReport {
        FetchReport {
            items,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut screen = CatalogScreen::new();
        let older = screen.begin_refresh();
        let newer = screen.begin_refresh();

        assert!(screen.apply(newer, Ok(report(vec![card("new", "New")]))).unwrap());
        assert!(!screen.apply(older, Ok(report(vec![card("old", "Old")]))).unwrap());

        assert_eq!(screen.items().len(), 1);
        assert_eq!(screen.items()[0].id().as_str(), "new");
    }

    #[test]
    fn test_stale_error_is_discarded() {
        let mut screen = CatalogScreen::new();
        let older = screen.begin_refresh();
        let newer = screen.begin_refresh();
        screen.apply(newer, Ok(report(vec![card("a", "A")]))).unwrap();

        let stale = Err(RepositoryError::Read {
            collection: "products".to_owned(),
            source: StoreError::Unavailable("offline".to_owned()),
        });
        assert!(!screen.apply(older, stale).unwrap());
        assert_eq!(screen.items().len(), 1);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_list() {
        let mut screen = CatalogScreen::new();
        let first = screen.begin_refresh();
        screen.apply(first, Ok(report(vec![card("a", "A")]))).unwrap();

        let second = screen.begin_refresh();
        let err = screen
            .apply(second, Err(RepositoryError::NotFound("products".to_owned())))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
        assert_eq!(screen.items().len(), 1);
    }

    #[test]
    fn test_each_fetch_replaces_the_list() {
        let mut screen = CatalogScreen::new();
        let t = screen.begin_refresh();
        screen
            .apply(t, Ok(report(vec![card("a", "A"), card("b", "B")])))
            .unwrap();
        let t = screen.begin_refresh();
        screen.apply(t, Ok(report(vec![card("c", "C")]))).unwrap();

        let ids: Vec<&str> = screen.items().iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, ["c"]);
    }

    #[test]
    fn test_visible_applies_search() {
        let mut screen = CatalogScreen::new();
        let t = screen.begin_refresh();
        screen
            .apply(t, Ok(report(vec![card("a", "Coffee Mug"), card("b", "Tea Pot")])))
            .unwrap();

        assert_eq!(screen.visible().len(), 2);
        screen.set_query("MUG");
        let visible = screen.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title(), "Coffee Mug");
        assert_eq!(screen.items().len(), 2);
    }

    #[test]
    fn test_item_mut_moves_carousel() {
        let mut screen = CatalogScreen::new();
        let t = screen.begin_refresh();
        let item = CardItem::new(
            ProductId::new("a"),
            "A",
            "1",
            "d",
            vec!["1".to_owned(), "2".to_owned()],
        )
        .unwrap();
        screen.apply(t, Ok(report(vec![item]))).unwrap();

        screen.item_mut(&ProductId::new("a")).unwrap().show_next();
        assert_eq!(screen.items()[0].current_image(), "2");
        assert!(screen.item_mut(&ProductId::new("zzz")).is_none());
    }

    #[tokio::test]
    async fn test_refresh_reports_skipped_records() {
        let store = Arc::new(MemoryStore::new());
        for value in [
            json!({"id": "p1", "name": "Mug", "cost": "10", "description": "A mug", "images": ["http://x/1.png"]}),
            json!({"id": "p2", "name": "Pot", "cost": "5", "description": "A pot"}),
        ] {
            let Value::Object(doc) = value else {
                unreachable!();
            };
            store.add("products", doc).await;
        }
        let repo = CatalogRepository::new(store, "products");

        let mut screen = CatalogScreen::new();
        assert!(screen.refresh(&repo).await.unwrap());
        assert_eq!(screen.items().len(), 1);
        assert_eq!(screen.skipped().len(), 1);
        assert_eq!(screen.skipped()[0].error.missing, vec!["images"]);
    }
}
