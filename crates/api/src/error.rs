//! Error responses.
//!
//! Every failure is rendered as
//!
//! ```json
//! { "statusCode": 400, "error": "DISABLED",
//!   "message": [{ "messages": [{ "id": "Upload.status.disabled",
//!                                "message": "File upload is disabled" }] }] }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use depot_core::upload::UploadError;
use depot_shared::AppError;
use serde_json::{Value, json};
use tracing::{debug, error};

/// Build an error response.
pub fn error_response(
    status: StatusCode,
    code: &str,
    id: &str,
    message: &str,
    values: Option<Value>,
) -> Response {
    let mut entry = json!({ "id": id, "message": message });
    if let Some(values) = values {
        entry["values"] = values;
    }

    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "error": code,
            "message": [{ "messages": [entry] }]
        })),
    )
        .into_response()
}

/// Map an upload error to its response.
///
/// Server-side failures are logged and answered with a generic message.
pub fn upload_error_response(err: &UploadError) -> Response {
    let app = AppError::from(err);
    let status =
        StatusCode::from_u16(app.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, code = app.error_code(), "Upload request failed");
        return error_response(
            status,
            app.error_code(),
            err.message_id(),
            "An error occurred",
            None,
        );
    }

    debug!(error = %err, code = app.error_code(), "Upload request rejected");
    error_response(
        status,
        app.error_code(),
        err.message_id(),
        &err.to_string(),
        err.values(),
    )
}

/// 404 for a file id that does not name a record.
pub fn file_not_found(id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        "file.notFound",
        &format!("file not found: {id}"),
        None,
    )
}
