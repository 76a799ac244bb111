//! Product details with an optimistic favorite toggle.
//!
//! The flag flips as soon as the user taps and the write is issued. Once the
//! latest toggle settles, the flag shows what the store is known to hold.

use vitrine_core::CardItem;

use crate::db::{FavoritesRepository, RepositoryError};
use crate::models::session::Session;
use crate::sync::{RequestSequence, RequestTicket};

/// An in-flight favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteToggle {
    ticket: RequestTicket,
    desired: bool,
}

impl FavoriteToggle {
    /// The state this toggle asks the store for.
    #[must_use]
    pub const fn desired(&self) -> bool {
        self.desired
    }
}

/// One product and whether it is in the user's favorites.
#[derive(Debug)]
pub struct DetailsScreen {
    item: CardItem,
    is_favorite: bool,
    /// Last value read from or written to the store.
    stored: bool,
    /// Toggle whose write set `stored`, if any.
    stored_by: Option<RequestTicket>,
    last_issued: Option<RequestTicket>,
    pending: bool,
    toggles: RequestSequence,
}

impl DetailsScreen {
    #[must_use]
    pub fn new(item: CardItem) -> Self {
        Self {
            item,
            is_favorite: false,
            stored: false,
            stored_by: None,
            last_issued: None,
            pending: false,
            toggles: RequestSequence::new(),
        }
    }

    #[must_use]
    pub const fn item(&self) -> &CardItem {
        &self.item
    }

    pub const fn item_mut(&mut self) -> &mut CardItem {
        &mut self.item
    }

    #[must_use]
    pub const fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Read the favorite flag from the store and return the stored value.
    ///
    /// While a toggle is in flight the local flag is left alone; the toggle
    /// settles it when it finishes.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the flag is left unchanged.
    pub async fn load_flag(
        &mut self,
        repo: &FavoritesRepository,
        session: &Session,
    ) -> Result<bool, RepositoryError> {
        let stored = repo.is_favorite(session, self.item.id()).await?;
        if self.pending {
            tracing::debug!(
                product_id = %self.item.id(),
                "Toggle in flight, keeping local favorite flag"
            );
        } else {
            self.stored = stored;
            self.stored_by = self.last_issued;
            self.is_favorite = stored;
        }
        Ok(stored)
    }

    /// Flip the flag locally and return the write to issue.
    pub fn begin_toggle(&mut self) -> FavoriteToggle {
        let ticket = self.toggles.issue();
        self.last_issued = Some(ticket);
        self.pending = true;
        self.is_favorite = !self.is_favorite;
        FavoriteToggle {
            ticket,
            desired: self.is_favorite,
        }
    }

    /// Settle a toggle with the outcome of its write.
    ///
    /// Writes for one product reach the store in toggle order, so a success
    /// only moves the stored value forward. When the latest toggle has settled
    /// the flag falls back to the stored value; until then it keeps showing
    /// the latest request.
    ///
    /// # Errors
    ///
    /// Returns the write error.
    pub fn finish_toggle(
        &mut self,
        toggle: FavoriteToggle,
        result: Result<(), RepositoryError>,
    ) -> Result<bool, RepositoryError> {
        if self.toggles.is_latest(toggle.ticket) {
            self.pending = false;
        }
        if result.is_ok() && self.stored_by.is_none_or(|by| toggle.ticket > by) {
            self.stored = toggle.desired;
            self.stored_by = Some(toggle.ticket);
        }
        if !self.pending {
            self.is_favorite = self.stored;
        }
        result.map(|()| toggle.desired)
    }

    /// Toggle the favorite flag and persist it.
    ///
    /// # Errors
    ///
    /// Returns the repository error after rolling the flag back.
    pub async fn toggle_favorite(
        &mut self,
        repo: &FavoritesRepository,
        session: &Session,
    ) -> Result<bool, RepositoryError> {
        let toggle = self.begin_toggle();
        let result = repo
            .set_favorite(session, self.item.id(), toggle.desired)
            .await;
        self.finish_toggle(toggle, result)
    }
}
