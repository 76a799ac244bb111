//! Title search over an in-memory card list.
//!
//! Matching is a case-insensitive substring test against the title only. An
//! empty query keeps every item.

use vitrine_core::CardItem;

/// Items whose title contains `query`, ignoring case, in their original order.
#[must_use]
pub fn filter(items: &[CardItem], query: &str) -> Vec<CardItem> {
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| matches_title(item, &needle))
        .cloned()
        .collect()
}

/// Whether `item`'s title contains an already-lowercased needle.
fn matches_title(item: &CardItem, needle: &str) -> bool {
    item.title().to_lowercase().contains(needle)
}
