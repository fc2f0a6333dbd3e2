//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes of the upload plugin
//! - Multipart request extraction
//! - Error response mapping

pub mod error;
pub mod extractors;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use depot_core::storage::StorageService;
use depot_core::upload::{
    FileRepository, FileService, SettingsService, SettingsStore, StorageProvider, UploadConfig,
    UploadHandler,
};
use depot_shared::config::UploadDefaults;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload request handler.
    pub uploads: Arc<UploadHandler>,
    /// Upload settings per environment.
    pub settings: Arc<SettingsService>,
    /// File queries and removal.
    pub files: Arc<FileService>,
    /// Object storage, also used to serve local files.
    pub storage: Arc<StorageService>,
    /// Environment this server runs under.
    pub environment: String,
}

impl AppState {
    /// Wire the upload services around a storage service and the selected
    /// persistence backend.
    #[must_use]
    pub fn new(
        storage: Arc<StorageService>,
        files: Arc<dyn FileRepository>,
        store: Arc<dyn SettingsStore>,
        defaults: &UploadDefaults,
    ) -> Self {
        let descriptor = storage.descriptor();
        let default_config = UploadConfig::new(&descriptor, defaults.enabled, defaults.size_limit);
        let settings = Arc::new(SettingsService::new(store, vec![descriptor], default_config));

        let provider: Arc<dyn StorageProvider> = storage.clone();
        let uploads = Arc::new(UploadHandler::new(settings.clone(), provider.clone()));
        let file_service = Arc::new(FileService::new(
            files,
            provider,
            settings.clone(),
            defaults.environment.clone(),
        ));

        Self {
            uploads,
            settings,
            files: file_service,
            storage,
            environment: defaults.environment.clone(),
        }
    }
}

/// Creates the main application router.
///
/// `max_body_bytes` caps whole request bodies before any upload validation.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let mut router = routes::api_routes();

    let public_url = state.storage.config().public_url.clone();
    if public_url.len() > 1 && public_url.starts_with('/') {
        router = router.merge(routes::objects::routes(&public_url));
    }

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
