//! Profile repository.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;
use vitrine_core::Profile;

use super::RepositoryError;
use super::records::{ProfileRecord, decode_profile, profile_fields};
use crate::models::session::Session;
use crate::store::{DocumentStore, FieldUpdate};

/// Repository for `users/{uid}` profile documents.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ProfileRepository {
    /// Create a repository over `collection`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Load the signed-in user's profile.
    ///
    /// Absent string fields default to `""`. A `dob` that does not parse as
    /// `yyyy-MM-dd` is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document does not exist,
    /// `RepositoryError::Read` if the store request fails, and
    /// `RepositoryError::DataCorruption` if `favorites` is not an array.
    #[instrument(skip(self, session), fields(uid = %session.uid))]
    pub async fn load(&self, session: &Session) -> Result<Profile, RepositoryError> {
        let doc = self
            .store
            .get(&self.collection, session.uid.as_str())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to load profile");
                RepositoryError::read(&self.collection, e)
            })?
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("{}/{}", self.collection, session.uid))
            })?;

        decode_profile(session.uid.as_str(), &doc)
    }

    /// Overwrite every editable field of the profile in one write.
    ///
    /// `favorites` is left alone; see [`super::FavoritesRepository`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document does not exist and
    /// `RepositoryError::Write` if the store rejects the write.
    #[instrument(skip(self, session, profile), fields(uid = %session.uid))]
    pub async fn save(&self, session: &Session, profile: &Profile) -> Result<(), RepositoryError> {
        let updates = ProfileRecord::from_profile(profile)
            .to_document()?
            .into_iter()
            .map(|(field, value)| (field, FieldUpdate::Set(value)))
            .collect();

        self.store
            .update(&self.collection, session.uid.as_str(), updates)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to save profile");
                RepositoryError::write(&self.collection, e)
            })?;

        tracing::debug!("Profile saved");
        Ok(())
    }

    /// Write the initial profile document for a new account.
    ///
    /// Replaces any existing document at the same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Write` if the store rejects the write.
    #[instrument(skip(self, session), fields(uid = %session.uid))]
    pub async fn create_default(&self, session: &Session) -> Result<(), RepositoryError> {
        let profile = Profile::for_new_account(&session.email);
        let mut doc = ProfileRecord::from_profile(&profile).to_document()?;
        doc.insert(profile_fields::FAVORITES.to_owned(), Value::Array(Vec::new()));

        self.store
            .set(&self.collection, session.uid.as_str(), doc)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create profile");
                RepositoryError::write(&self.collection, e)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use vitrine_core::{BirthDate, EducationLevel, Email, ProductId, UserUid};

    use super::*;
    use crate::store::MemoryStore;

    fn session() -> Session {
        Session::new(UserUid::new("u1"), Email::parse("ann@example.com").unwrap())
    }

    #[tokio::test]
    async fn test_create_default_then_load() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProfileRepository::new(store.clone(), "users");
        repo.create_default(&session()).await.unwrap();

        let profile = repo.load(&session()).await.unwrap();
        assert_eq!(profile.email, "ann@example.com");
        assert_eq!(profile.education_level, EducationLevel::Higher);
        assert!(profile.favorites.is_empty());
        assert!(profile.dob.is_empty());

        let raw = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(raw.get("education"), Some(&json!("Высшее")));
        assert_eq!(raw.get("favorites"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProfileRepository::new(store, "users");
        let session = session();
        repo.create_default(&session).await.unwrap();

        let profile = Profile {
            email: "ann@example.com".to_owned(),
            name: "Anna".to_owned(),
            surname: "Petrova".to_owned(),
            patronymic: "Ivanovna".to_owned(),
            dob: BirthDate::Date(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap()),
            education_level: EducationLevel::Secondary,
            interests: "climbing".to_owned(),
            pet_name: "Rex".to_owned(),
            profile_description: "hello".to_owned(),
            favorites: std::collections::BTreeSet::new(),
        };
        repo.save(&session, &profile).await.unwrap();

        assert_eq!(repo.load(&session).await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_save_does_not_touch_favorites() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProfileRepository::new(store.clone(), "users");
        let session = session();
        repo.create_default(&session).await.unwrap();
        store
            .update(
                "users",
                "u1",
                vec![("favorites".to_owned(), FieldUpdate::ArrayUnion(vec![json!("p1")]))],
            )
            .await
            .unwrap();

        // A stale draft with no favorites must not wipe the stored set.
        let mut draft = repo.load(&session).await.unwrap();
        draft.favorites.clear();
        draft.name = "Anna".to_owned();
        repo.save(&session, &draft).await.unwrap();

        let loaded = repo.load(&session).await.unwrap();
        assert_eq!(loaded.name, "Anna");
        assert!(loaded.favorites.contains(&ProductId::new("p1")));
    }

    #[tokio::test]
    async fn test_unparsed_dob_survives_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let Value::Object(doc) = json!({"email": "ann@example.com", "dob": "12.04.1990"}) else {
            unreachable!();
        };
        store.set("users", "u1", doc).await.unwrap();
        let repo = ProfileRepository::new(store.clone(), "users");
        let session = session();

        let profile = repo.load(&session).await.unwrap();
        assert_eq!(profile.dob, BirthDate::Unparsed("12.04.1990".to_owned()));
        assert_eq!(profile.dob.display(), "12.04.1990");

        repo.save(&session, &profile).await.unwrap();
        let raw = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(raw.get("dob"), Some(&json!("12.04.1990")));
    }

    #[tokio::test]
    async fn test_load_missing_document_is_not_found() {
        let repo = ProfileRepository::new(Arc::new(MemoryStore::new()), "users");
        let err = repo.load(&session()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_missing_document_is_not_found() {
        let repo = ProfileRepository::new(Arc::new(MemoryStore::new()), "users");
        let err = repo.save(&session(), &Profile::default()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_offline_is_write_error() {
        let store = Arc::new(MemoryStore::new());
        let repo = ProfileRepository::new(store.clone(), "users");
        repo.create_default(&session()).await.unwrap();
        store.set_offline(true);

        let err = repo.save(&session(), &Profile::default()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Write { .. }));
    }
}
