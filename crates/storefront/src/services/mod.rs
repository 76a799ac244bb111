//! Services for the storefront client.
//!
//! - `auth` - session gateway over the external auth provider
pub mod auth;
