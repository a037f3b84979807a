use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{AnimalRecord, DocumentFields, RecordId};

/// The one collection this app talks to.
pub const COLLECTION: &str = "animals";

/// Connection identifiers for the document store, supplied by the shell at
/// process start. Opaque to the core; the shell owns the actual client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
}

// Redact the API key; config ends up in debug logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_key", &"[REDACTED]")
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// The wire contract with the document store: four verbs against a named
/// collection. The shell maps these 1:1 onto its client SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreOperation {
    /// Enumerate every document; no pagination, no ordering contract.
    List { collection: String },
    /// Append a new document; the store assigns the identifier.
    Insert {
        collection: String,
        fields: DocumentFields,
    },
    /// Replace a document's fields wholesale. Never a partial patch.
    Replace {
        collection: String,
        id: RecordId,
        fields: DocumentFields,
    },
    /// Remove a document by identifier.
    Remove { collection: String, id: RecordId },
}

impl Operation for StoreOperation {
    type Output = StoreResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreOutput {
    /// Documents with their store identifiers attached, in store iteration
    /// order.
    Documents(Vec<AnimalRecord>),
    Inserted { id: RecordId },
    Replaced,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StoreError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("permission denied by the store")]
    PermissionDenied,

    #[error("store quota exceeded")]
    QuotaExceeded,

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

pub type StoreResult = Result<StoreOutput, StoreError>;

/// Persistence gateway capability. Each method is a single remote round trip;
/// the completion comes back as the event the caller maps it into, which is
/// how tests substitute the store with canned outputs.
pub struct DocumentStore<Ev> {
    context: CapabilityContext<StoreOperation, Ev>,
}

impl<Ev> Capability<Ev> for DocumentStore<Ev> {
    type Operation = StoreOperation;
    type MappedSelf<MappedEv> = DocumentStore<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        DocumentStore::new(self.context.map_event(f))
    }
}

impl<Ev> DocumentStore<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<StoreOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn list<F>(&self, collection: impl Into<String>, make_event: F)
    where
        F: FnOnce(StoreResult) -> Ev + Send + 'static,
    {
        self.request(
            StoreOperation::List {
                collection: collection.into(),
            },
            make_event,
        );
    }

    pub fn insert<F>(&self, collection: impl Into<String>, fields: DocumentFields, make_event: F)
    where
        F: FnOnce(StoreResult) -> Ev + Send + 'static,
    {
        self.request(
            StoreOperation::Insert {
                collection: collection.into(),
                fields,
            },
            make_event,
        );
    }

    pub fn replace<F>(
        &self,
        collection: impl Into<String>,
        id: RecordId,
        fields: DocumentFields,
        make_event: F,
    ) where
        F: FnOnce(StoreResult) -> Ev + Send + 'static,
    {
        self.request(
            StoreOperation::Replace {
                collection: collection.into(),
                id,
                fields,
            },
            make_event,
        );
    }

    pub fn remove<F>(&self, collection: impl Into<String>, id: RecordId, make_event: F)
    where
        F: FnOnce(StoreResult) -> Ev + Send + 'static,
    {
        self.request(
            StoreOperation::Remove {
                collection: collection.into(),
                id,
            },
            make_event,
        );
    }

    fn request<F>(&self, operation: StoreOperation, make_event: F)
    where
        F: FnOnce(StoreResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_config_debug_redacts_the_api_key() {
        let config = StoreConfig {
            api_key: "AIzaSecret".into(),
            auth_domain: "example.firebaseapp.com".into(),
            project_id: "example".into(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("AIzaSecret"));
        assert!(rendered.contains("example.firebaseapp.com"));
    }

    #[test]
    fn operations_round_trip_through_serde() {
        let op = StoreOperation::Replace {
            collection: COLLECTION.into(),
            id: RecordId::new("rec-1"),
            fields: DocumentFields {
                name: "Vaquita".into(),
                location: "Gulf of California".into(),
                population: "10".into(),
                description: "small porpoise".into(),
                category: "mammal".into(),
                image: "data:image/jpeg;base64,CCCC".into(),
            },
        };
        let json = serde_json::to_string(&op).expect("serializes");
        let back: StoreOperation = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(op, back);
    }
}
