//! Storage provider collaborator.

use async_trait::async_trait;

use super::error::UploadError;
use super::types::{ProviderDescriptor, StoredFile, UploadConfig, UploadFile};

/// Backend that physically stores uploaded bytes and owns the resulting
/// file records.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Identifier and display name of the provider.
    fn descriptor(&self) -> ProviderDescriptor;

    /// Store every file and return the created records, in input order.
    async fn upload(
        &self,
        files: Vec<UploadFile>,
        config: &UploadConfig,
    ) -> Result<Vec<StoredFile>, UploadError>;

    /// Delete the bytes and the record of a stored file.
    async fn remove(&self, file: &StoredFile, config: &UploadConfig) -> Result<(), UploadError>;
}
