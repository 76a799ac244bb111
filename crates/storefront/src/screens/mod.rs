//! Screen state holders.
//!
//! Each screen owns the in-memory copy of what it shows and decides which
//! remote completions it accepts. Rendering is out of scope; these types are
//! what a view layer binds to.

pub mod account;
pub mod catalog;
pub mod details;
pub mod favorites;

pub use account::AccountScreen;
pub use catalog::CatalogScreen;
pub use details::{DetailsScreen, FavoriteToggle};
pub use favorites::FavoritesScreen;
