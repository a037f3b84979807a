use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::capabilities::StoreConfig;
use crate::AppError;

/// Store-assigned document identifier. Absent before first persistence,
/// immutable afterwards; the core never mints one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six stored fields, exactly as the document store keeps them.
/// All free-form strings; `population` is numeric-as-text and deliberately
/// not parsed (any non-empty string passes submission).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFields {
    pub name: String,
    pub location: String,
    pub population: String,
    pub description: String,
    pub category: String,
    /// Data URL, e.g. `data:image/png;base64,...`.
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: DocumentFields,
}

/// The text inputs addressable through `Event::FieldChanged`. The image is
/// set through `Event::ImageSelected`, which owns the data-URL conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Name,
    Location,
    Population,
    Description,
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

/// The record currently loaded into the form for editing, addressed both by
/// identifier and by position in the canonical record list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditTarget {
    pub id: RecordId,
    pub position: usize,
}

/// Mirrors the editable fields of a record plus the edit target.
/// `editing` is `Some` exactly when a submit will update rather than create.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub name: String,
    pub location: String,
    pub population: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub editing: Option<EditTarget>,
}

impl FormState {
    pub fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Location => self.location = value,
            Field::Population => self.population = value,
            Field::Description => self.description = value,
            Field::Category => self.category = value,
        }
    }

    /// Copies every editable field of `record` into the form and records the
    /// edit target; the next submit becomes an update.
    pub fn load_record(&mut self, position: usize, record: &AnimalRecord) {
        self.name = record.fields.name.clone();
        self.location = record.fields.location.clone();
        self.population = record.fields.population.clone();
        self.description = record.fields.description.clone();
        self.category = record.fields.category.clone();
        self.image = record.fields.image.clone();
        self.editing = Some(EditTarget {
            id: record.id.clone(),
            position,
        });
    }

    /// Back to empty defaults, edit target cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The local gate preceding create/update. Every field must be non-empty;
    /// population is intentionally not checked for being numeric, so "abc"
    /// passes while "" does not.
    pub fn validate(&self) -> Result<DocumentFields, ValidationError> {
        let required: [(&'static str, &str); 6] = [
            ("name", &self.name),
            ("location", &self.location),
            ("population", &self.population),
            ("description", &self.description),
            ("category", &self.category),
            ("image", &self.image),
        ];

        for (field, value) in required {
            if value.is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }

        Ok(DocumentFields {
            name: self.name.clone(),
            location: self.location.clone(),
            population: self.population.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            image: self.image.clone(),
        })
    }
}

/// Record staged for deletion: identifier for the remote call, display name
/// for the confirmation prompt, position for parity with the edit target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelete {
    pub id: RecordId,
    pub name: String,
    pub position: usize,
}

/// Deletion confirmation machine: `Idle -> Confirming -> {InFlight, Idle}`.
/// `InFlight` covers the remote round trip so a failed delete can return to
/// `Idle` without having touched the form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming(PendingDelete),
    InFlight(PendingDelete),
}

impl DeleteState {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn confirming(&self) -> Option<&PendingDelete> {
        match self {
            Self::Confirming(pending) => Some(pending),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Opaque connection identifiers, held for the shell; never interpreted.
    pub store_config: Option<StoreConfig>,

    /// The collection as of the most recent successful load. Replaced
    /// wholesale after every mutation; individual records are never patched
    /// in place client-side.
    pub records: Vec<AnimalRecord>,

    pub form: FormState,

    // Filter inputs; the filtered view itself is derived in `App::view`.
    pub query: String,
    pub category_filter: String,

    pub delete_state: DeleteState,

    pub is_loading: bool,
    pub active_error: Option<AppError>,
}

impl Model {
    pub fn set_error(&mut self, error: impl Into<AppError>) {
        self.active_error = Some(error.into());
    }
}
