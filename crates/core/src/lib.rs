//! Vitrine Core - Shared types library.
//!
//! This crate provides the entity model used by the storefront sync layer:
//! - [`CardItem`] - In-memory catalog product with its image carousel
//! - [`Profile`] - Editable account record stored per signed-in user
//! - String-backed ids ([`UserUid`], [`ProductId`], [`DocumentId`]) and [`Email`]
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no document
//! store access, no auth calls. Remote records are decoded into these types by
//! `vitrine-storefront`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
