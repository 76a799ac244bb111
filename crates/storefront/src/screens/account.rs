//! Editable profile form.

use chrono::NaiveDate;
use vitrine_core::{BirthDate, EducationLevel, Profile};

use crate::db::{ProfileRepository, RepositoryError};
use crate::models::session::Session;

/// Draft of the signed-in user's profile.
///
/// Text fields are edited in place through [`Self::draft_mut`]; nothing is
/// written until [`Self::save`].
#[derive(Debug, Default)]
pub struct AccountScreen {
    draft: Profile,
    loaded: bool,
}

impl AccountScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the draft with the stored profile.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the draft is left unchanged.
    pub async fn load(
        &mut self,
        repo: &ProfileRepository,
        session: &Session,
    ) -> Result<(), RepositoryError> {
        self.draft = repo.load(session).await?;
        self.loaded = true;
        Ok(())
    }

    /// Write the draft back.
    ///
    /// # Errors
    ///
    /// Returns the repository error.
    pub async fn save(
        &self,
        repo: &ProfileRepository,
        session: &Session,
    ) -> Result<(), RepositoryError> {
        repo.save(session, &self.draft).await
    }

    /// Whether a profile has been loaded into the draft.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub const fn draft(&self) -> &Profile {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut Profile {
        &mut self.draft
    }

    /// Date picked in the form.
    pub fn set_dob(&mut self, date: NaiveDate) {
        self.draft.dob = BirthDate::Date(date);
    }

    pub const fn set_education(&mut self, level: EducationLevel) {
        self.draft.education_level = level;
    }

    /// Birth date as shown in the form.
    #[must_use]
    pub fn dob_display(&self) -> String {
        self.draft.dob.display()
    }
}
