use crux_core::testing::AppTester;
use crux_core::Request;

use redlist_core::{
    data_url, AnimalRecord, App, DocumentFields, Effect, ErrorKind, Event, Field, FormState,
    Model, RecordId, StoreConfig, StoreError, StoreOperation, StoreOutput, COLLECTION,
};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn take_store_request(effects: &mut Vec<Effect>) -> Request<StoreOperation> {
    let position = effects
        .iter()
        .position(|effect| matches!(effect, Effect::Store(_)))
        .expect("expected a store effect");
    match effects.remove(position) {
        Effect::Store(request) => request,
        _ => unreachable!(),
    }
}

fn has_store_effect(effects: &[Effect]) -> bool {
    effects.iter().any(|effect| matches!(effect, Effect::Store(_)))
}

fn fill_form(app: &AppTester<App, Effect>, model: &mut Model) {
    for (field, value) in [
        (Field::Name, "Amur Leopard"),
        (Field::Location, "Russia"),
        (Field::Population, "100"),
        (Field::Description, "rare"),
        (Field::Category, "mammal"),
    ] {
        app.update(
            Event::FieldChanged {
                field,
                value: value.into(),
            },
            model,
        );
    }
    app.update(
        Event::ImageSelected {
            bytes: PNG_HEADER.to_vec(),
        },
        model,
    );
}

fn leopard_fields() -> DocumentFields {
    DocumentFields {
        name: "Amur Leopard".into(),
        location: "Russia".into(),
        population: "100".into(),
        description: "rare".into(),
        category: "mammal".into(),
        image: data_url::encode(PNG_HEADER),
    }
}

fn leopard(id: &str) -> AnimalRecord {
    AnimalRecord {
        id: RecordId::new(id),
        fields: leopard_fields(),
    }
}

#[test]
fn startup_loads_the_collection_once() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::Started {
            config: StoreConfig {
                api_key: "key".into(),
                auth_domain: "example.firebaseapp.com".into(),
                project_id: "example".into(),
            },
        },
        &mut model,
    );

    let mut effects = update.effects;
    let request = take_store_request(&mut effects);
    assert_eq!(
        request.operation,
        StoreOperation::List {
            collection: COLLECTION.into()
        }
    );
    assert!(!has_store_effect(&effects), "exactly one list operation");
    assert!(model.is_loading);
}

#[test]
fn create_flow_persists_resets_and_reloads() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    fill_form(&app, &mut model);

    let update = app.update(Event::SubmitRequested, &mut model);
    let mut effects = update.effects;
    let mut request = take_store_request(&mut effects);

    // Create carries the full field set and no identifier.
    assert_eq!(
        request.operation,
        StoreOperation::Insert {
            collection: COLLECTION.into(),
            fields: leopard_fields(),
        }
    );

    // The store assigns the identifier.
    let update = app
        .resolve(
            &mut request,
            Ok(StoreOutput::Inserted {
                id: RecordId::new("rec-1"),
            }),
        )
        .expect("resolves insert");

    let mut reload = None;
    for event in update.events {
        let update = app.update(event, &mut model);
        let mut effects = update.effects;
        if has_store_effect(&effects) {
            reload = Some(take_store_request(&mut effects));
        }
    }

    // Successful create resets the form and unconditionally reloads.
    assert_eq!(model.form, FormState::default());
    assert!(model.active_error.is_none());

    let mut request = reload.expect("reload after create");
    assert_eq!(
        request.operation,
        StoreOperation::List {
            collection: COLLECTION.into()
        }
    );

    let update = app
        .resolve(
            &mut request,
            Ok(StoreOutput::Documents(vec![leopard("rec-1")])),
        )
        .expect("resolves list");
    for event in update.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.records.len(), 1);
    assert_eq!(model.records[0].id, RecordId::new("rec-1"));
    assert_eq!(model.records[0].fields, leopard_fields());
    assert!(!model.is_loading);
}

#[test]
fn any_empty_required_field_blocks_submission_locally() {
    for field in [
        Field::Name,
        Field::Location,
        Field::Population,
        Field::Description,
        Field::Category,
    ] {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();
        fill_form(&app, &mut model);
        app.update(
            Event::FieldChanged {
                field,
                value: String::new(),
            },
            &mut model,
        );

        let update = app.update(Event::SubmitRequested, &mut model);
        assert!(
            !has_store_effect(&update.effects),
            "{field:?} empty must not reach the store"
        );
        let error = model.active_error.expect("blocking validation message");
        assert_eq!(error.kind, ErrorKind::Validation);
    }

    // Missing image blocks too.
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    fill_form(&app, &mut model);
    model.form.image = String::new();
    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(!has_store_effect(&update.effects));
}

#[test]
fn non_numeric_population_still_submits() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    fill_form(&app, &mut model);
    app.update(
        Event::FieldChanged {
            field: Field::Population,
            value: "abc".into(),
        },
        &mut model,
    );

    let update = app.update(Event::SubmitRequested, &mut model);
    assert!(
        has_store_effect(&update.effects),
        "population is not numerically validated"
    );
}

#[test]
fn update_flow_replaces_the_whole_document() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    model.records = vec![leopard("rec-1")];

    app.update(Event::EditRequested { position: 0 }, &mut model);
    assert!(model.form.is_editing());

    app.update(
        Event::FieldChanged {
            field: Field::Location,
            value: "Primorye".into(),
        },
        &mut model,
    );

    let update = app.update(Event::SubmitRequested, &mut model);
    let mut effects = update.effects;
    let mut request = take_store_request(&mut effects);

    // Wholesale replacement: every field travels, not just the change.
    let mut expected = leopard_fields();
    expected.location = "Primorye".into();
    assert_eq!(
        request.operation,
        StoreOperation::Replace {
            collection: COLLECTION.into(),
            id: RecordId::new("rec-1"),
            fields: expected,
        }
    );

    let update = app
        .resolve(&mut request, Ok(StoreOutput::Replaced))
        .expect("resolves replace");

    let mut saw_reload = false;
    for event in update.events {
        let update = app.update(event, &mut model);
        saw_reload |= has_store_effect(&update.effects);
    }

    assert_eq!(model.form, FormState::default());
    assert!(saw_reload, "successful update reloads the collection");
}

#[test]
fn failed_create_keeps_the_form_for_retry() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    fill_form(&app, &mut model);
    let form_before = model.form.clone();

    let update = app.update(Event::SubmitRequested, &mut model);
    let mut effects = update.effects;
    let mut request = take_store_request(&mut effects);

    let update = app
        .resolve(&mut request, Err(StoreError::Network("timed out".into())))
        .expect("resolves failure");
    for event in update.events {
        let update = app.update(event, &mut model);
        assert!(!has_store_effect(&update.effects), "no reload on failure");
    }

    assert_eq!(model.form, form_before);
    assert!(model.records.is_empty());
    let error = model.active_error.expect("failure surfaced to the user");
    assert_eq!(error.kind, ErrorKind::Persistence);
}
