//! Multipart upload form extraction.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header},
    response::Response,
};
use depot_core::upload::{RawFile, UploadBody};
use tracing::debug;

use crate::error::error_response;

/// Multipart field carrying file parts.
const FILES_FIELD: &str = "files";

/// Files and metadata of an upload request.
///
/// File parts are read from the `files` field; `refId`, `ref`, `source`,
/// `field` and `path` are read from text fields. A request that is not
/// `multipart/form-data` yields an empty form.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// Relation and path metadata.
    pub body: UploadBody,
    /// Received files, in request order.
    pub files: Vec<RawFile>,
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            return Ok(Self::default());
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| malformed(&e.to_string()))?;

        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| malformed(&e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILES_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().map(str::to_string);
                let content = field.bytes().await.map_err(|e| malformed(&e.to_string()))?;

                // Browsers send an empty nameless part for an untouched file input
                if file_name.is_empty() && content.is_empty() {
                    continue;
                }

                form.files.push(RawFile::new(file_name, mime, content));
                continue;
            }

            let value = field.text().await.map_err(|e| malformed(&e.to_string()))?;
            match name.as_str() {
                "refId" => form.body.ref_id = Some(value),
                "ref" => form.body.reference = Some(value),
                "source" => form.body.source = Some(value),
                "field" => form.body.field = Some(value),
                "path" => form.body.path = Some(value),
                other => debug!(field = other, "Ignoring multipart field"),
            }
        }

        Ok(form)
    }
}

fn malformed(message: &str) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Upload.status.malformed",
        &format!("Invalid multipart request: {message}"),
        None,
    )
}
