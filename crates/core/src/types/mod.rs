//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers and the entity model.

pub mod card_item;
pub mod email;
pub mod id;
pub mod profile;

pub use card_item::{CardItem, CardItemError};
pub use email::{Email, EmailError};
pub use id::*;
pub use profile::{BirthDate, EducationLevel, Profile};
