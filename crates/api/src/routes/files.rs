//! File listing, lookup, removal and search routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use depot_core::upload::{FileQuery, UploadError};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{file_not_found, upload_error_response},
};

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload/files", get(list_files))
        .route("/upload/files/count", get(count_files))
        .route("/upload/files/{id}", get(get_file).delete(delete_file))
        .route("/upload/search/{id}", get(search_files))
}

/// GET `/upload/files`
async fn list_files(State(state): State<AppState>, Query(query): Query<FileQuery>) -> Response {
    match state.files.find(&query).await {
        Ok(files) => (StatusCode::OK, Json(files)).into_response(),
        Err(e) => upload_error_response(&e),
    }
}

/// GET `/upload/files/count`
async fn count_files(State(state): State<AppState>, Query(query): Query<FileQuery>) -> Response {
    match state.files.count(&query).await {
        Ok(count) => (StatusCode::OK, Json(json!({ "count": count }))).into_response(),
        Err(e) => upload_error_response(&e),
    }
}

/// GET `/upload/files/{id}`
async fn get_file(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(file_id) = Uuid::parse_str(&id) else {
        return file_not_found(&id);
    };

    match state.files.find_one(file_id).await {
        Ok(file) => (StatusCode::OK, Json(file)).into_response(),
        Err(UploadError::NotFound(_)) => file_not_found(&id),
        Err(e) => upload_error_response(&e),
    }
}

/// DELETE `/upload/files/{id}`
/// Remove the bytes and the record, returning the removed record.
async fn delete_file(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(file_id) = Uuid::parse_str(&id) else {
        return file_not_found(&id);
    };

    match state.files.destroy(file_id).await {
        Ok(file) => {
            info!(file_id = %file.id, name = %file.name, "File deleted");
            (StatusCode::OK, Json(file)).into_response()
        }
        Err(UploadError::NotFound(_)) => file_not_found(&id),
        Err(e) => upload_error_response(&e),
    }
}

/// GET `/upload/search/{id}`
/// Files whose hash or name contains the term, ignoring case.
async fn search_files(State(state): State<AppState>, Path(term): Path<String>) -> Response {
    match state.files.search(&term).await {
        Ok(files) => (StatusCode::OK, Json(files)).into_response(),
        Err(e) => upload_error_response(&e),
    }
}
