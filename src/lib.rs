#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod data_url;
pub mod event;
pub mod model;

use serde::{Deserialize, Serialize};

pub use app::{filter_records, App, FormMode, FormView, RecordCard, UserFacingError, ViewModel};
pub use capabilities::{
    Capabilities, DocumentStore, Effect, StoreConfig, StoreError, StoreOperation, StoreOutput,
    StoreResult, COLLECTION,
};
pub use event::Event;
pub use model::{
    AnimalRecord, DeleteState, DocumentFields, EditTarget, Field, FormState, Model, PendingDelete,
    RecordId, ValidationError,
};

/// The two failure classes the catalogue distinguishes. Nothing is retried;
/// every failure ends the current user action and leaves the app usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required field was empty. Caught locally, never reaches the store.
    Validation,
    /// The remote store rejected or failed a round trip.
    Persistence,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Persistence => "PERSISTENCE_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    /// Safe to show to the user as-is.
    pub message: String,
    /// Raw detail from the failing layer, for logs only.
    pub internal: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let message = match &e {
            StoreError::Network(_) => {
                "Unable to reach the catalogue. Check your connection and try again.".to_string()
            }
            StoreError::PermissionDenied => {
                "You don't have permission to make this change.".to_string()
            }
            StoreError::QuotaExceeded => {
                "The catalogue's storage quota has been reached.".to_string()
            }
            StoreError::NotFound(_) => {
                "That record no longer exists. Refresh the list and try again.".to_string()
            }
            StoreError::Rejected(reason) => {
                format!("The store rejected the request: {reason}")
            }
        };

        Self::new(ErrorKind::Persistence, message).with_internal(e.to_string())
    }
}
