//! Vitrine storefront client library.
//!
//! The data-synchronization layer between screen state and a remote document
//! store: catalog retrieval and mapping, favorites, profile load/save, and
//! title search. The auth service and the document store are reached through
//! the [`services::auth::AuthProvider`] and [`store::DocumentStore`]
//! capabilities; in-memory implementations of both ship with the crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod screens;
pub mod search;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
pub mod telemetry;
