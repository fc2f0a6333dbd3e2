//! File metadata queries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::error::UploadError;
use super::provider::StorageProvider;
use super::settings::SettingsService;
use super::types::{CreateFileInput, FileQuery, StoredFile};

/// Repository trait for file metadata persistence.
///
/// This trait is implemented by the db crate, once per storage backend.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Create a new file record.
    async fn create(&self, input: CreateFileInput) -> Result<StoredFile, UploadError>;

    /// List records matching the query.
    async fn fetch_all(&self, query: &FileQuery) -> Result<Vec<StoredFile>, UploadError>;

    /// Find a record by ID.
    async fn fetch(&self, id: Uuid) -> Result<Option<StoredFile>, UploadError>;

    /// Count records matching the query filters.
    async fn count(&self, query: &FileQuery) -> Result<u64, UploadError>;

    /// Records whose hash or name contains `term`, ignoring case.
    async fn search(&self, term: &str) -> Result<Vec<StoredFile>, UploadError>;

    /// Delete a record by ID.
    async fn delete(&self, id: Uuid) -> Result<bool, UploadError>;
}

/// Read, search and delete operations over stored files.
pub struct FileService {
    repo: Arc<dyn FileRepository>,
    provider: Arc<dyn StorageProvider>,
    settings: Arc<SettingsService>,
    environment: String,
}

impl FileService {
    /// Create a file service.
    ///
    /// `environment` selects the configuration handed to the provider when
    /// files are removed.
    #[must_use]
    pub fn new(
        repo: Arc<dyn FileRepository>,
        provider: Arc<dyn StorageProvider>,
        settings: Arc<SettingsService>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            provider,
            settings,
            environment: environment.into(),
        }
    }

    /// List files.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn find(&self, query: &FileQuery) -> Result<Vec<StoredFile>, UploadError> {
        self.repo.fetch_all(query).await
    }

    /// Get a file by ID.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NotFound`] if no such file exists.
    pub async fn find_one(&self, id: Uuid) -> Result<StoredFile, UploadError> {
        self.repo
            .fetch(id)
            .await?
            .ok_or(UploadError::NotFound(id))
    }

    /// Count files.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn count(&self, query: &FileQuery) -> Result<u64, UploadError> {
        self.repo.count(query).await
    }

    /// Remove a file through the storage provider and return its record.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NotFound`] if no such file exists, or the
    /// provider error.
    pub async fn destroy(&self, id: Uuid) -> Result<StoredFile, UploadError> {
        let config = self.settings.get_config(&self.environment).await?;
        let file = self.find_one(id).await?;

        self.provider.remove(&file, &config).await?;

        info!(file_id = %id, provider = %file.provider, "File removed");
        Ok(file)
    }

    /// Search files by hash or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn search(&self, term: &str) -> Result<Vec<StoredFile>, UploadError> {
        self.repo.search(term).await
    }
}
