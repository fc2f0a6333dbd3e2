//! File upload route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::info;

use crate::{AppState, error::upload_error_response, extractors::UploadForm};

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}

/// POST `/upload`
/// Validate the received files and store them with the active provider.
async fn upload(State(state): State<AppState>, form: UploadForm) -> Response {
    let received = form.files.len();

    match state
        .uploads
        .handle(&state.environment, form.body, form.files)
        .await
    {
        Ok(stored) => {
            info!(
                environment = %state.environment,
                received,
                stored = stored.len(),
                "Upload request completed"
            );
            (StatusCode::OK, Json(stored)).into_response()
        }
        Err(e) => upload_error_response(&e),
    }
}
