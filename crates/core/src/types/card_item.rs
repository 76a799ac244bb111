//! Catalog product as held by a screen.

use serde::Serialize;

use super::id::ProductId;

/// Errors raised when building or moving a [`CardItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CardItemError {
    /// A card must show at least one image.
    #[error("product {0} has no images")]
    NoImages(ProductId),
    /// Carousel position outside `0..len`.
    #[error("image index {index} out of range (product has {len} images)")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of images.
        len: usize,
    },
}

/// A product card.
///
/// Created when a remote product record maps successfully and dropped with the
/// screen that owns it; never persisted locally.
///
/// `images` is never empty and `current_index` always points into it, so
/// [`CardItem::current_image`] cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardItem {
    id: ProductId,
    title: String,
    price: String,
    description: String,
    images: Vec<String>,
    current_index: usize,
}

impl CardItem {
    /// Build a card positioned on its first image.
    ///
    /// # Errors
    ///
    /// Returns [`CardItemError::NoImages`] if `images` is empty.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
        images: Vec<String>,
    ) -> Result<Self, CardItemError> {
        if images.is_empty() {
            return Err(CardItemError::NoImages(id));
        }

        Ok(Self {
            id,
            title: title.into(),
            price: price.into(),
            description: description.into(),
            images,
            current_index: 0,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display price exactly as stored; never parsed.
    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// URL of the image the carousel is showing.
    #[must_use]
    pub fn current_image(&self) -> &str {
        self.images
            .get(self.current_index)
            .map_or("", String::as_str)
    }

    /// Move the carousel to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CardItemError::IndexOutOfRange`] and leaves the position
    /// untouched if `index` is past the last image.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), CardItemError> {
        if index >= self.images.len() {
            return Err(CardItemError::IndexOutOfRange {
                index,
                len: self.images.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    /// Advance to the next image, wrapping to the first.
    pub fn show_next(&mut self) {
        self.current_index = (self.current_index + 1) % self.images.len();
    }

    /// Step back to the previous image, wrapping to the last.
    pub fn show_previous(&mut self) {
        self.current_index = self
            .current_index
            .checked_sub(1)
            .unwrap_or(self.images.len() - 1);
    }
}
