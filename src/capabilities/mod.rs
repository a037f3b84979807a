mod store;

pub use self::store::{
    DocumentStore, StoreConfig, StoreError, StoreOperation, StoreOutput, StoreResult, COLLECTION,
};

pub use crux_core::render::Render;

use self::store::DocumentStore as Store;
use crate::app::App;
use crate::event::Event;

pub type AppRender = Render<Event>;
pub type AppStore = DocumentStore<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub store: Store<Event>,
}
