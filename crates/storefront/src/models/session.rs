//! Signed-in session identity.
//!
//! A [`Session`] is produced by the auth gateway and passed by reference into
//! every user-scoped repository call. Nothing reads the "current user" from
//! global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{Email, UserUid};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Auth provider user id; also the profile document id.
    pub uid: UserUid,
    /// Email the user signed in with.
    pub email: Email,
    /// When the session was established.
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Create a session established now.
    #[must_use]
    pub fn new(uid: UserUid, email: Email) -> Self {
        Self {
            uid,
            email,
            signed_in_at: Utc::now(),
        }
    }
}
