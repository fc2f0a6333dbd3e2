//! Application-wide error types.

use thiserror::Error;

use crate::env::EnvError;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Uploads are switched off for the environment.
    #[error("Upload disabled: {0}")]
    UploadDisabled(String),

    /// Request carried no files.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A file exceeded the configured size limit.
    #[error("Size limit exceeded: {0}")]
    SizeLimitExceeded(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration value could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigParse(String),

    /// Storage provider error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UploadDisabled(_)
            | Self::EmptyInput(_)
            | Self::SizeLimitExceeded(_)
            | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::ConfigParse(_) | Self::Storage(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UploadDisabled(_) => "DISABLED",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::SizeLimitExceeded(_) => "SIZE_LIMIT_EXCEEDED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ConfigParse(_) => "CONFIG_PARSE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<EnvError> for AppError {
    fn from(err: EnvError) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
