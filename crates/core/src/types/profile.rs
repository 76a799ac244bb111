//! Editable account record.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::ProductId;

/// Highest completed education level.
///
/// Stored as a Russian label (`Высшее`, `Среднее`, `Начальное`); anything the
/// store holds that is not one of those labels reads as [`EducationLevel::Higher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EducationLevel {
    #[default]
    Higher,
    Secondary,
    Primary,
}

impl EducationLevel {
    /// Label written to the `education` field.
    #[must_use]
    pub const fn storage_label(self) -> &'static str {
        match self {
            Self::Higher => "Высшее",
            Self::Secondary => "Среднее",
            Self::Primary => "Начальное",
        }
    }

    /// Decode a stored label, falling back to the default.
    #[must_use]
    pub fn from_storage_label(label: &str) -> Self {
        match label {
            "Среднее" => Self::Secondary,
            "Начальное" => Self::Primary,
            _ => Self::Higher,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_label())
    }
}

/// Date of birth.
///
/// The store keeps `yyyy-MM-dd`. Values that do not parse are kept verbatim so
/// the user still sees what was saved and a later save writes it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BirthDate {
    /// A valid calendar date.
    Date(NaiveDate),
    /// Raw text that is not a `yyyy-MM-dd` date (including empty).
    Unparsed(String),
}

impl BirthDate {
    /// Storage format (`yyyy-MM-dd`).
    pub const STORAGE_FORMAT: &'static str = "%Y-%m-%d";
    /// Medium display style, e.g. `Jan 5, 2024`.
    pub const DISPLAY_FORMAT: &'static str = "%b %-d, %Y";

    /// Parse a stored value; never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        NaiveDate::parse_from_str(raw, Self::STORAGE_FORMAT)
            .map_or_else(|_| Self::Unparsed(raw.to_owned()), Self::Date)
    }

    /// Value to write back to the store.
    #[must_use]
    pub fn to_storage(&self) -> String {
        match self {
            Self::Date(date) => date.format(Self::STORAGE_FORMAT).to_string(),
            Self::Unparsed(raw) => raw.clone(),
        }
    }

    /// Text to show in the account form.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Date(date) => date.format(Self::DISPLAY_FORMAT).to_string(),
            Self::Unparsed(raw) => raw.clone(),
        }
    }

    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Unparsed(_) => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Unparsed(raw) if raw.is_empty())
    }
}

impl Default for BirthDate {
    fn default() -> Self {
        Self::Unparsed(String::new())
    }
}

impl From<NaiveDate> for BirthDate {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// A user's profile document, one per uid.
///
/// `favorites` holds product ids only; ids with no matching product are
/// skipped when the list is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub dob: BirthDate,
    pub education_level: EducationLevel,
    pub interests: String,
    pub pet_name: String,
    pub profile_description: String,
    pub favorites: BTreeSet<ProductId>,
}

impl Profile {
    /// Fresh profile written at sign-up: only the email is filled in.
    #[must_use]
    pub fn for_new_account(email: &Email) -> Self {
        Self {
            email: email.as_str().to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.favorites.contains(id)
    }
}
