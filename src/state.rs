//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::repositories::UrlStore;

/// Per-process application state.
///
/// Built once at startup around the store handle and cloned into each
/// request; it carries no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
}

impl AppState {
    /// Wires the services around an already connected store.
    pub fn new(store: Arc<dyn UrlStore>) -> Self {
        Self {
            url_service: Arc::new(UrlService::new(store)),
        }
    }

    /// The store handle shared by all services.
    pub fn store(&self) -> &Arc<dyn UrlStore> {
        self.url_service.store()
    }
}
