//! Decoding between raw documents and domain types.
//!
//! Field names here are the wire schema; nothing outside this module should
//! index into a [`Document`] by string key.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use vitrine_core::{BirthDate, CardItem, DocumentId, EducationLevel, ProductId, Profile};

use super::{FetchReport, RepositoryError};
use crate::store::{Document, Snapshot};

/// Product record fields.
pub mod product_fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const COST: &str = "cost";
    pub const DESCRIPTION: &str = "description";
    pub const IMAGES: &str = "images";
}

/// Profile document fields.
pub mod profile_fields {
    pub const FAVORITES: &str = "favorites";
}

/// A product record that could not be turned into a [`vitrine_core::CardItem`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("product record {document_id} is malformed (missing: {missing:?}, invalid: {invalid:?})")]
pub struct MappingError {
    /// Store document id of the record.
    pub document_id: DocumentId,
    /// Required fields that are absent.
    pub missing: Vec<&'static str>,
    /// Fields present with the wrong type or an unusable value.
    pub invalid: Vec<&'static str>,
}

/// A record dropped while mapping a fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// The document as the store returned it.
    pub raw: Document,
    /// Why it was dropped.
    pub error: MappingError,
}

#[derive(Default)]
struct FieldCheck {
    missing: Vec<&'static str>,
    invalid: Vec<&'static str>,
}

impl FieldCheck {
    fn string<'a>(&mut self, doc: &'a Document, field: &'static str) -> Option<&'a str> {
        match doc.get(field) {
            None | Some(Value::Null) => {
                self.missing.push(field);
                None
            }
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                self.invalid.push(field);
                None
            }
        }
    }

    fn string_list(&mut self, doc: &Document, field: &'static str) -> Option<Vec<String>> {
        match doc.get(field) {
            None | Some(Value::Null) => {
                self.missing.push(field);
                None
            }
            Some(Value::Array(values)) => {
                let strings: Option<Vec<String>> = values
                    .iter()
                    .map(|v| v.as_str().map(str::to_owned))
                    .collect();
                if strings.is_none() {
                    self.invalid.push(field);
                }
                strings
            }
            Some(_) => {
                self.invalid.push(field);
                None
            }
        }
    }
}

/// Decode one product record.
///
/// # Errors
///
/// Returns a [`MappingError`] listing every missing or invalid field. An empty
/// `id` or an empty `images` list counts as invalid.
pub fn decode_product(snapshot: &Snapshot) -> Result<CardItem, MappingError> {
    use product_fields::{COST, DESCRIPTION, ID, IMAGES, NAME};

    let doc = &snapshot.data;
    let mut check = FieldCheck::default();

    let id = check.string(doc, ID);
    let title = check.string(doc, NAME);
    let price = check.string(doc, COST);
    let description = check.string(doc, DESCRIPTION);
    let images = check.string_list(doc, IMAGES);

    if id.is_some_and(str::is_empty) {
        check.invalid.push(ID);
    }
    if images.as_ref().is_some_and(Vec::is_empty) {
        check.invalid.push(IMAGES);
    }

    let fail = |check: FieldCheck| MappingError {
        document_id: DocumentId::new(snapshot.id.as_str()),
        missing: check.missing,
        invalid: check.invalid,
    };

    if !check.missing.is_empty() || !check.invalid.is_empty() {
        return Err(fail(check));
    }

    match (id, title, price, description, images) {
        (Some(id), Some(title), Some(price), Some(description), Some(images)) => {
            CardItem::new(ProductId::new(id), title, price, description, images).map_err(|_| {
                fail(FieldCheck {
                    missing: Vec::new(),
                    invalid: vec![IMAGES],
                })
            })
        }
        _ => Err(fail(check)),
    }
}

/// Map every snapshot, splitting the result into cards and skipped records.
///
/// Skipped records are logged at `warn` so they show up even when the caller
/// ignores the report.
pub fn map_products(snapshots: Vec<Snapshot>) -> FetchReport {
    let mut report = FetchReport::default();
    for snapshot in snapshots {
        match decode_product(&snapshot) {
            Ok(item) => report.items.push(item),
            Err(error) => {
                tracing::warn!(
                    document_id = %error.document_id,
                    missing = ?error.missing,
                    invalid = ?error.invalid,
                    "Skipping malformed product record"
                );
                report.skipped.push(SkippedRecord {
                    raw: snapshot.data,
                    error,
                });
            }
        }
    }
    report
}

/// Editable profile fields as written by a save.
///
/// Has no `favorites` field: that array is only changed by the favorites
/// repository through atomic array operations.
#[derive(Debug, Serialize)]
pub struct ProfileRecord<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
    pub patronymic: &'a str,
    pub dob: String,
    pub education: &'static str,
    pub interests: &'a str,
    pub pet: &'a str,
    #[serde(rename = "profileDescription")]
    pub profile_description: &'a str,
}

impl<'a> ProfileRecord<'a> {
    #[must_use]
    pub fn from_profile(profile: &'a Profile) -> Self {
        Self {
            email: &profile.email,
            name: &profile.name,
            surname: &profile.surname,
            patronymic: &profile.patronymic,
            dob: profile.dob.to_storage(),
            education: profile.education_level.storage_label(),
            interests: &profile.interests,
            pet: &profile.pet_name,
            profile_description: &profile.profile_description,
        }
    }

    /// Serialize into a document body.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if serialization fails.
    pub fn to_document(&self) -> Result<Document, RepositoryError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(RepositoryError::DataCorruption(format!(
                "profile serialized to non-object: {other}"
            ))),
            Err(e) => Err(RepositoryError::DataCorruption(format!(
                "profile serialization failed: {e}"
            ))),
        }
    }
}

/// Read a string field, treating absent or non-string values as empty.
fn lenient_string(doc: &Document, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Read the `favorites` array.
///
/// An absent field is an empty set; non-string entries are ignored.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the field exists but is not an array.
pub fn decode_favorites(
    uid: &str,
    doc: &Document,
) -> Result<BTreeSet<ProductId>, RepositoryError> {
    match doc.get(profile_fields::FAVORITES) {
        None | Some(Value::Null) => Ok(BTreeSet::new()),
        Some(Value::Array(values)) => Ok(values
            .iter()
            .filter_map(Value::as_str)
            .map(ProductId::from)
            .collect()),
        Some(other) => Err(RepositoryError::DataCorruption(format!(
            "users/{uid}: favorites is not an array: {other}"
        ))),
    }
}

/// Decode a profile document, defaulting absent fields.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if `favorites` is not an array.
pub fn decode_profile(uid: &str, doc: &Document) -> Result<Profile, RepositoryError> {
    Ok(Profile {
        email: lenient_string(doc, "email"),
        name: lenient_string(doc, "name"),
        surname: lenient_string(doc, "surname"),
        patronymic: lenient_string(doc, "patronymic"),
        dob: BirthDate::parse(&lenient_string(doc, "dob")),
        education_level: EducationLevel::from_storage_label(&lenient_string(doc, "education")),
        interests: lenient_string(doc, "interests"),
        pet_name: lenient_string(doc, "pet"),
        profile_description: lenient_string(doc, "profileDescription"),
        favorites: decode_favorites(uid, doc)?,
    })
}
