//! In-process collaborators for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::error::UploadError;
use super::files::FileRepository;
use super::provider::StorageProvider;
use super::settings::{SettingsService, SettingsStore};
use super::types::{
    CreateFileInput, FileQuery, ProviderDescriptor, StoredFile, UploadConfig, UploadFile,
};

type SettingsKey = (String, String, String);

#[derive(Default)]
pub(crate) struct MockSettingsStore {
    values: Mutex<HashMap<SettingsKey, Value>>,
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
    async fn get(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
    ) -> Result<Option<Value>, UploadError> {
        let values = self.values.lock().unwrap();
        Ok(values
            .get(&(environment.into(), plugin.into(), key.into()))
            .cloned())
    }

    async fn set(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
        value: Value,
    ) -> Result<(), UploadError> {
        self.values
            .lock()
            .unwrap()
            .insert((environment.into(), plugin.into(), key.into()), value);
        Ok(())
    }

    async fn environments(&self, plugin: &str) -> Result<Vec<String>, UploadError> {
        let values = self.values.lock().unwrap();
        let mut envs: Vec<String> = values
            .keys()
            .filter(|(_, p, _)| p == plugin)
            .map(|(env, _, _)| env.clone())
            .collect();
        envs.sort();
        envs.dedup();
        Ok(envs)
    }
}

#[derive(Default)]
pub(crate) struct MockFileRepository {
    files: Mutex<HashMap<Uuid, StoredFile>>,
    reject_creates: bool,
}

impl MockFileRepository {
    /// A repository whose inserts always fail.
    pub(crate) fn rejecting_creates() -> Self {
        Self {
            reject_creates: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl FileRepository for MockFileRepository {
    async fn create(&self, input: CreateFileInput) -> Result<StoredFile, UploadError> {
        if self.reject_creates {
            return Err(UploadError::repository("insert rejected"));
        }
        let file = StoredFile::from_input(Uuid::new_v4(), input, Utc::now());
        self.files.lock().unwrap().insert(file.id, file.clone());
        Ok(file)
    }

    async fn fetch_all(&self, query: &FileQuery) -> Result<Vec<StoredFile>, UploadError> {
        let files = self.files.lock().unwrap();
        Ok(files.values().filter(|f| query.matches(f)).cloned().collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<StoredFile>, UploadError> {
        Ok(self.files.lock().unwrap().get(&id).cloned())
    }

    async fn count(&self, query: &FileQuery) -> Result<u64, UploadError> {
        let files = self.files.lock().unwrap();
        Ok(files.values().filter(|f| query.matches(f)).count() as u64)
    }

    async fn search(&self, term: &str) -> Result<Vec<StoredFile>, UploadError> {
        let term = term.to_lowercase();
        let files = self.files.lock().unwrap();
        Ok(files
            .values()
            .filter(|f| {
                f.hash.to_lowercase().contains(&term) || f.name.to_lowercase().contains(&term)
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UploadError> {
        Ok(self.files.lock().unwrap().remove(&id).is_some())
    }
}

/// Provider that records calls instead of storing bytes.
#[derive(Default)]
pub(crate) struct RecordingProvider {
    uploads: Mutex<Vec<Vec<UploadFile>>>,
    removed: Mutex<Vec<Uuid>>,
}

impl RecordingProvider {
    pub(crate) fn upload_calls(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub(crate) fn last_upload(&self) -> Vec<UploadFile> {
        self.uploads.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub(crate) fn removed(&self) -> Vec<Uuid> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageProvider for RecordingProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new("local", "Local server")
    }

    async fn upload(
        &self,
        files: Vec<UploadFile>,
        config: &UploadConfig,
    ) -> Result<Vec<StoredFile>, UploadError> {
        let now = Utc::now();
        let stored = files
            .iter()
            .map(|upload| {
                let input = CreateFileInput {
                    name: upload.file.name.clone(),
                    hash: upload.file.hash.clone(),
                    sha256: upload.file.sha256.clone(),
                    ext: upload.file.ext.clone(),
                    mime: upload.file.mime.clone(),
                    size: upload.file.size,
                    url: format!("/uploads/{}{}", upload.file.hash, upload.file.ext),
                    provider: config.provider.clone(),
                    path: upload.path.clone(),
                    related: upload.related.clone(),
                };
                StoredFile::from_input(Uuid::new_v4(), input, now)
            })
            .collect();

        self.uploads.lock().unwrap().push(files);
        Ok(stored)
    }

    async fn remove(&self, file: &StoredFile, _config: &UploadConfig) -> Result<(), UploadError> {
        self.removed.lock().unwrap().push(file.id);
        Ok(())
    }
}

/// Settings service backed by `store`, defaulting to the local provider with
/// a 1 MB limit.
pub(crate) fn local_settings(store: Arc<dyn SettingsStore>) -> SettingsService {
    let local = ProviderDescriptor::new("local", "Local server");
    let defaults = UploadConfig::new(&local, true, 1_000_000.0);
    SettingsService::new(store, vec![local], defaults)
}
