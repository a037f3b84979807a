use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capabilities::{Capabilities, StoreError, StoreOutput, COLLECTION};
use crate::data_url;
use crate::event::Event;
use crate::model::{AnimalRecord, DeleteState, Model, PendingDelete};
use crate::{AppError, ErrorKind};

#[derive(Default)]
pub struct App;

/// Case-insensitive substring match of `query` against name, location and
/// description (OR across the three), intersected with an exact category
/// match; an empty category passes every record. Pure projection over the
/// canonical list; positions index into `records` so that edit and delete
/// requests keep addressing the right record while a filter is active.
#[must_use]
pub fn filter_records<'r>(
    records: &'r [AnimalRecord],
    query: &str,
    category: &str,
) -> Vec<(usize, &'r AnimalRecord)> {
    let needle = query.to_lowercase();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| category.is_empty() || record.fields.category == category)
        .filter(|(_, record)| {
            needle.is_empty()
                || record.fields.name.to_lowercase().contains(&needle)
                || record.fields.location.to_lowercase().contains(&needle)
                || record.fields.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCard {
    /// Position in the canonical (unfiltered) record list.
    pub position: usize,
    pub id: String,
    pub name: String,
    pub location: String,
    pub population: String,
    pub description: String,
    pub category: String,
    pub image: String,
}

impl RecordCard {
    fn new(position: usize, record: &AnimalRecord) -> Self {
        Self {
            position,
            id: record.id.as_str().to_string(),
            name: record.fields.name.clone(),
            location: record.fields.location.clone(),
            population: record.fields.population.clone(),
            description: record.fields.description.clone(),
            category: record.fields.category.clone(),
            image: record.fields.image.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormMode {
    Create,
    Update,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub mode: FormMode,
    pub name: String,
    pub location: String,
    pub population: String,
    pub description: String,
    pub category: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacingError {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for UserFacingError {
    fn from(error: &AppError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    /// The derived, filtered view. Recomputed on every render, never cached.
    pub records: Vec<RecordCard>,
    /// Distinct categories present in the loaded records, sorted; feeds the
    /// category filter control.
    pub categories: Vec<String>,
    pub form: FormView,
    pub query: String,
    pub category_filter: String,
    /// Set while the deletion machine is in `Confirming`.
    pub confirm_prompt: Option<String>,
    pub error: Option<UserFacingError>,
    pub is_loading: bool,
}

impl App {
    fn reload(model: &mut Model, caps: &Capabilities) {
        model.is_loading = true;
        caps.store
            .list(COLLECTION, |result| Event::RecordsLoaded(Box::new(result)));
    }

    fn fail(model: &mut Model, error: StoreError) {
        warn!(error = %error, "store operation failed");
        model.is_loading = false;
        model.set_error(error);
    }

    fn unexpected(model: &mut Model, context: &'static str, output: &StoreOutput) {
        warn!(context, ?output, "unexpected store output");
        model.is_loading = false;
        model.set_error(
            AppError::new(ErrorKind::Persistence, "An unexpected error occurred.")
                .with_internal(format!("{context}: unexpected output {output:?}")),
        );
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), "update");

        match event {
            Event::Started { config } => {
                model.store_config = Some(config);
                Self::reload(model, caps);
                caps.render.render();
            }

            Event::FieldChanged { field, value } => {
                model.form.set_field(field, value);
                caps.render.render();
            }

            Event::ImageSelected { bytes } => {
                model.form.image = data_url::encode(&bytes);
                caps.render.render();
            }

            Event::EditRequested { position } => {
                if let Some(record) = model.records.get(position) {
                    model.form.load_record(position, record);
                } else {
                    warn!(position, "edit requested for unknown position");
                }
                caps.render.render();
            }

            Event::FormCleared => {
                model.form.reset();
                caps.render.render();
            }

            Event::SubmitRequested => match model.form.validate() {
                Err(e) => {
                    model.set_error(e);
                    caps.render.render();
                }
                Ok(fields) => {
                    model.active_error = None;
                    model.is_loading = true;
                    match &model.form.editing {
                        None => caps.store.insert(COLLECTION, fields, |result| {
                            Event::RecordCreated(Box::new(result))
                        }),
                        Some(target) => {
                            caps.store
                                .replace(COLLECTION, target.id.clone(), fields, |result| {
                                    Event::RecordUpdated(Box::new(result))
                                });
                        }
                    }
                    caps.render.render();
                }
            },

            Event::QueryChanged { query } => {
                model.query = query;
                caps.render.render();
            }

            Event::CategoryFilterChanged { category } => {
                model.category_filter = category;
                caps.render.render();
            }

            Event::RefreshRequested => {
                Self::reload(model, caps);
                caps.render.render();
            }

            Event::DeleteRequested { position } => {
                if let Some(record) = model.records.get(position) {
                    model.delete_state = DeleteState::Confirming(PendingDelete {
                        id: record.id.clone(),
                        name: record.fields.name.clone(),
                        position,
                    });
                } else {
                    warn!(position, "delete requested for unknown position");
                }
                caps.render.render();
            }

            Event::DeleteConfirmed => {
                if let DeleteState::Confirming(pending) = std::mem::take(&mut model.delete_state) {
                    model.is_loading = true;
                    caps.store.remove(COLLECTION, pending.id.clone(), |result| {
                        Event::RecordDeleted(Box::new(result))
                    });
                    model.delete_state = DeleteState::InFlight(pending);
                }
                caps.render.render();
            }

            Event::DeleteCancelled => {
                // Negative response: back to idle, no remote call.
                model.delete_state = DeleteState::Idle;
                caps.render.render();
            }

            Event::ErrorDismissed => {
                model.active_error = None;
                caps.render.render();
            }

            Event::RecordsLoaded(result) => {
                match *result {
                    Ok(StoreOutput::Documents(records)) => {
                        debug!(count = records.len(), "records loaded");
                        model.records = records;
                        model.is_loading = false;
                    }
                    Ok(other) => Self::unexpected(model, "list", &other),
                    Err(e) => Self::fail(model, e),
                }
                caps.render.render();
            }

            Event::RecordCreated(result) => {
                match *result {
                    Ok(StoreOutput::Inserted { id }) => {
                        debug!(id = %id, "record created");
                        model.form.reset();
                        Self::reload(model, caps);
                    }
                    Ok(other) => Self::unexpected(model, "create", &other),
                    // Form state stays untouched so the user can retry.
                    Err(e) => Self::fail(model, e),
                }
                caps.render.render();
            }

            Event::RecordUpdated(result) => {
                match *result {
                    Ok(StoreOutput::Replaced) => {
                        model.form.reset();
                        Self::reload(model, caps);
                    }
                    Ok(other) => Self::unexpected(model, "update", &other),
                    Err(e) => Self::fail(model, e),
                }
                caps.render.render();
            }

            Event::RecordDeleted(result) => {
                match *result {
                    Ok(StoreOutput::Removed) => {
                        if let DeleteState::InFlight(pending) =
                            std::mem::take(&mut model.delete_state)
                        {
                            // Deleting the record currently loaded for
                            // editing clears the form.
                            let editing_it = model
                                .form
                                .editing
                                .as_ref()
                                .is_some_and(|target| target.id == pending.id);
                            if editing_it {
                                model.form.reset();
                            }
                        }
                        Self::reload(model, caps);
                    }
                    Ok(other) => {
                        model.delete_state = DeleteState::Idle;
                        Self::unexpected(model, "delete", &other);
                    }
                    Err(e) => {
                        model.delete_state = DeleteState::Idle;
                        Self::fail(model, e);
                    }
                }
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        let records = filter_records(&model.records, &model.query, &model.category_filter)
            .into_iter()
            .map(|(position, record)| RecordCard::new(position, record))
            .collect();

        let mut categories: Vec<String> = model
            .records
            .iter()
            .map(|record| record.fields.category.clone())
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();

        let mode = if model.form.is_editing() {
            FormMode::Update
        } else {
            FormMode::Create
        };

        ViewModel {
            records,
            categories,
            form: FormView {
                mode,
                name: model.form.name.clone(),
                location: model.form.location.clone(),
                population: model.form.population.clone(),
                description: model.form.description.clone(),
                category: model.form.category.clone(),
                image: model.form.image.clone(),
            },
            query: model.query.clone(),
            category_filter: model.category_filter.clone(),
            confirm_prompt: model
                .delete_state
                .confirming()
                .map(|pending| format!("Delete \"{}\"?", pending.name)),
            error: model.active_error.as_ref().map(UserFacingError::from),
            is_loading: model.is_loading,
        }
    }
}
