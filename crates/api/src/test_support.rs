//! Router fixtures for handler tests.

use std::sync::Arc;

use axum::{Router, body::Body, http::Request, response::Response};
use depot_core::storage::{StorageConfig, StorageService};
use depot_db::{MemoryFileRepository, MemorySettingsStore};
use depot_shared::config::{StorageProviderConfig, UploadDefaults};
use http_body_util::BodyExt;
use serde_json::Value;
use uuid::Uuid;

use crate::{AppState, create_router};

const BOUNDARY: &str = "depot-test-boundary";

/// State over the memory backend and a throwaway local directory.
pub(crate) fn test_state() -> AppState {
    let root = std::env::temp_dir().join(format!("depot-test-{}", Uuid::new_v4()));
    let files = Arc::new(MemoryFileRepository::new());
    let storage = StorageService::from_config(
        StorageConfig::new(StorageProviderConfig::local_fs(root)),
        files.clone(),
    )
    .expect("local storage");

    AppState::new(
        Arc::new(storage),
        files,
        Arc::new(MemorySettingsStore::new()),
        &UploadDefaults::default(),
    )
}

pub(crate) fn test_app() -> Router {
    create_router(test_state(), 10 * 1024 * 1024)
}

pub(crate) async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// One multipart part.
pub(crate) struct Part<'a> {
    name: &'a str,
    file_name: Option<&'a str>,
    content_type: &'a str,
    content: &'a [u8],
}

impl<'a> Part<'a> {
    pub(crate) fn file(
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        content: &'a [u8],
    ) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type,
            content,
        }
    }

    pub(crate) fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: "",
            content: value.as_bytes(),
        }
    }
}

pub(crate) fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if !part.content_type.is_empty() {
            body.extend_from_slice(format!("Content-Type: {}\r\n", part.content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub(crate) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
