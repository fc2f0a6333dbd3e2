//! Storage service implementation using Apache OpenDAL.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use depot_shared::config::StorageProviderConfig;
use opendal::{ErrorKind, Operator, services};
use tracing::{debug, warn};

use super::config::StorageConfig;
use super::error::StorageError;
use crate::upload::{
    CreateFileInput, FileRepository, ProviderDescriptor, StorageProvider, StoredFile,
    UploadConfig, UploadError, UploadFile, sanitize_filename,
};

/// Stores uploaded bytes in an OpenDAL backend and their metadata in a
/// [`FileRepository`].
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
    files: Arc<dyn FileRepository>,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(
        config: StorageConfig,
        files: Arc<dyn FileRepository>,
    ) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self {
            operator,
            config,
            files,
        })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProviderConfig) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProviderConfig::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder).map_err(config_error)?.finish()
            }
            StorageProviderConfig::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);
                Operator::new(builder).map_err(config_error)?.finish()
            }
            StorageProviderConfig::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );
                Operator::new(builder).map_err(config_error)?.finish()
            }
            StorageProviderConfig::Memory => Operator::new(services::Memory::default())
                .map_err(config_error)?
                .finish(),
        };

        Ok(operator)
    }

    /// Write bytes under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&self, key: &str, content: Bytes) -> Result<(), StorageError> {
        self.operator.write(key, content).await?;
        Ok(())
    }

    /// Read the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing is stored there.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        match self.operator.read(key).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the object under `key`. A missing object is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "Object already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

#[async_trait]
impl StorageProvider for StorageService {
    fn descriptor(&self) -> ProviderDescriptor {
        self.config.descriptor()
    }

    async fn upload(
        &self,
        files: Vec<UploadFile>,
        _config: &UploadConfig,
    ) -> Result<Vec<StoredFile>, UploadError> {
        let provider = self.config.descriptor().provider;
        let mut stored = Vec::with_capacity(files.len());

        for upload in files {
            let file = upload.file;
            let key = object_key(upload.path.as_deref(), &file.hash, &file.ext);
            self.write(&key, file.content).await?;

            debug!(key = %key, size = file.size, "Object written");

            let created = self
                .files
                .create(CreateFileInput {
                    url: self.config.url_for(&key),
                    name: file.name,
                    hash: file.hash,
                    sha256: file.sha256,
                    ext: file.ext,
                    mime: file.mime,
                    size: file.size,
                    provider: provider.clone(),
                    path: upload.path,
                    related: upload.related,
                })
                .await;

            match created {
                Ok(record) => stored.push(record),
                Err(e) => {
                    // No record points at the object, so drop it.
                    if let Err(cleanup) = self.delete(&key).await {
                        warn!(key = %key, error = %cleanup, "Failed to remove orphaned object");
                    }
                    return Err(e);
                }
            }
        }

        Ok(stored)
    }

    async fn remove(&self, file: &StoredFile, _config: &UploadConfig) -> Result<(), UploadError> {
        let key = object_key(file.path.as_deref(), &file.hash, &file.ext);
        self.delete(&key).await?;

        if !self.files.delete(file.id).await? {
            debug!(file_id = %file.id, "Record already absent");
        }
        Ok(())
    }
}

fn config_error(err: opendal::Error) -> StorageError {
    StorageError::configuration(err.to_string())
}

/// Object key of a file: `{path}/{hash}{ext}`.
///
/// Path segments are sanitized; empty, `.` and `..` segments are dropped.
#[must_use]
pub fn object_key(path: Option<&str>, hash: &str, ext: &str) -> String {
    let name = format!("{}{}", sanitize_filename(hash), sanitize_filename(ext));

    let folder = path
        .unwrap_or_default()
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(sanitize_filename)
        .collect::<Vec<_>>()
        .join("/");

    if folder.is_empty() {
        name
    } else {
        format!("{folder}/{name}")
    }
}
