use serde::{Deserialize, Serialize};

use crate::capabilities::{StoreConfig, StoreResult};
use crate::model::Field;

/// Everything that can happen to the catalogue: user actions and store
/// completions. Store results are boxed to keep the enum small.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    /// Process-start entry point; carries the opaque store configuration and
    /// triggers the initial load.
    Started { config: StoreConfig },

    // Form
    FieldChanged { field: Field, value: String },
    ImageSelected { bytes: Vec<u8> },
    EditRequested { position: usize },
    FormCleared,
    SubmitRequested,

    // Filtering
    QueryChanged { query: String },
    CategoryFilterChanged { category: String },

    // Collection
    RefreshRequested,
    DeleteRequested { position: usize },
    DeleteConfirmed,
    DeleteCancelled,

    ErrorDismissed,

    // Store completions
    RecordsLoaded(Box<StoreResult>),
    RecordCreated(Box<StoreResult>),
    RecordUpdated(Box<StoreResult>),
    RecordDeleted(Box<StoreResult>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::FieldChanged { .. } => "field_changed",
            Self::ImageSelected { .. } => "image_selected",
            Self::EditRequested { .. } => "edit_requested",
            Self::FormCleared => "form_cleared",
            Self::SubmitRequested => "submit_requested",
            Self::QueryChanged { .. } => "query_changed",
            Self::CategoryFilterChanged { .. } => "category_filter_changed",
            Self::RefreshRequested => "refresh_requested",
            Self::DeleteRequested { .. } => "delete_requested",
            Self::DeleteConfirmed => "delete_confirmed",
            Self::DeleteCancelled => "delete_cancelled",
            Self::ErrorDismissed => "error_dismissed",
            Self::RecordsLoaded(_) => "records_loaded",
            Self::RecordCreated(_) => "record_created",
            Self::RecordUpdated(_) => "record_updated",
            Self::RecordDeleted(_) => "record_deleted",
        }
    }
}
