use std::sync::Arc;

use crate::interview::archive::SessionArchive;
use crate::interview::registry::SessionRegistry;
use crate::llm_client::TextCompletion;
use crate::store::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Flat-file document store. Every persisted document goes through this one handle.
    pub store: Arc<FileStore>,
    pub archive: SessionArchive,
    /// Text-completion collaborator. `LlmClient` in production, stubs in tests.
    pub llm: Arc<dyn TextCompletion>,
    /// Interviews currently in progress, keyed by id.
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(store: Arc<FileStore>, llm: Arc<dyn TextCompletion>) -> Self {
        Self {
            archive: SessionArchive::new(store.clone()),
            store,
            llm,
            sessions: SessionRegistry::new(),
        }
    }
}
