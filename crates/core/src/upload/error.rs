//! Upload error types.

use depot_shared::AppError;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Upload operation errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Uploads are disabled for the environment.
    #[error("File upload is disabled")]
    Disabled,

    /// No file was attached to the request.
    #[error("Files are empty")]
    EmptyInput,

    /// A file is larger than the configured limit.
    #[error("{name} file is bigger than limit size!")]
    SizeLimitExceeded {
        /// Name of the offending file.
        name: String,
    },

    /// File record not found.
    #[error("file not found: {0}")]
    NotFound(Uuid),

    /// Settings payload could not be accepted.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// Settings store operation failed.
    #[error("settings store error: {0}")]
    Settings(String),
}

impl UploadError {
    /// Create a size limit error.
    #[must_use]
    pub fn size_limit_exceeded(name: impl Into<String>) -> Self {
        Self::SizeLimitExceeded { name: name.into() }
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Create a settings store error.
    #[must_use]
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Stable message identifier for clients.
    #[must_use]
    pub const fn message_id(&self) -> &'static str {
        match self {
            Self::Disabled => "Upload.status.disabled",
            Self::EmptyInput => "Upload.status.empty",
            Self::SizeLimitExceeded { .. } => "Upload.status.sizeLimit",
            Self::NotFound(_) => "file.notFound",
            Self::InvalidSettings(_) => "Upload.settings.invalid",
            Self::Storage(_) => "Upload.status.storage",
            Self::Repository(_) | Self::Settings(_) => "Upload.status.internal",
        }
    }

    /// Error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        AppError::from(self).error_code()
    }

    /// Interpolation values for the client message.
    #[must_use]
    pub fn values(&self) -> Option<Value> {
        match self {
            Self::SizeLimitExceeded { name } => Some(json!({ "file": name })),
            _ => None,
        }
    }
}

impl From<&UploadError> for AppError {
    fn from(err: &UploadError) -> Self {
        let msg = err.to_string();
        match err {
            UploadError::Disabled => Self::UploadDisabled(msg),
            UploadError::EmptyInput => Self::EmptyInput(msg),
            UploadError::SizeLimitExceeded { .. } => Self::SizeLimitExceeded(msg),
            UploadError::NotFound(_) => Self::NotFound(msg),
            UploadError::InvalidSettings(_) => Self::Validation(msg),
            UploadError::Storage(_) => Self::Storage(msg),
            UploadError::Repository(_) | UploadError::Settings(_) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages() {
        assert_eq!(UploadError::Disabled.to_string(), "File upload is disabled");
        assert_eq!(UploadError::EmptyInput.to_string(), "Files are empty");
        assert_eq!(
            UploadError::size_limit_exceeded("rec.jpg").to_string(),
            "rec.jpg file is bigger than limit size!"
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let cases = [
            (UploadError::Disabled, 400, "DISABLED"),
            (UploadError::EmptyInput, 400, "EMPTY_INPUT"),
            (UploadError::size_limit_exceeded("a"), 400, "SIZE_LIMIT_EXCEEDED"),
            (UploadError::NotFound(Uuid::nil()), 404, "NOT_FOUND"),
            (UploadError::InvalidSettings("x".into()), 400, "VALIDATION_ERROR"),
            (UploadError::repository("x"), 500, "DATABASE_ERROR"),
        ];

        for (err, status, code) in cases {
            let app = AppError::from(&err);
            assert_eq!(app.status_code(), status, "{err}");
            assert_eq!(app.error_code(), code, "{err}");
        }
    }

    #[test]
    fn test_size_limit_values_name_the_file() {
        let values = UploadError::size_limit_exceeded("rec.jpg").values();
        assert_eq!(values, Some(json!({ "file": "rec.jpg" })));
        assert!(UploadError::Disabled.values().is_none());
    }
}
