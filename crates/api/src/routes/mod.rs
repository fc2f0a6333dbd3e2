//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod files;
pub mod health;
pub mod objects;
pub mod settings;
pub mod upload;

/// Creates the API router with all upload plugin routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(upload::routes())
        .merge(settings::routes())
        .merge(files::routes())
}
