//! Serving stored objects under the public URL prefix.
//!
//! Only mounted when the public URL is a path on this server, as with the
//! local provider's default `/uploads`.

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use depot_core::storage::StorageError;
use tracing::error;

use crate::AppState;

/// Creates the object routes under `prefix`.
pub fn routes(prefix: &str) -> Router<AppState> {
    Router::new().route(&format!("{prefix}/{{*key}}"), get(serve_object))
}

/// GET `{prefix}/{key}`
async fn serve_object(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    if key.split('/').any(|segment| segment == "..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.storage.read(&key).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&key).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.to_string())],
                content,
            )
                .into_response()
        }
        Err(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(key = %key, error = %e, "Failed to read object");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
