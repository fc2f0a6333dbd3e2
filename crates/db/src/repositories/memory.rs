//! Process-local document backend.
//!
//! Records are kept as whole documents in concurrent maps. Nothing survives
//! a restart.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use depot_core::upload::{
    CreateFileInput, FileQuery, FileRepository, SettingsStore, SortField, SortOrder, StoredFile,
    UploadError,
};

/// In-memory file repository.
#[derive(Debug, Default)]
pub struct MemoryFileRepository {
    files: DashMap<Uuid, StoredFile>,
}

impl MemoryFileRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(&self, keep: impl Fn(&StoredFile) -> bool) -> Vec<StoredFile> {
        self.files
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn create(&self, input: CreateFileInput) -> Result<StoredFile, UploadError> {
        let file = StoredFile::from_input(Uuid::new_v4(), input, Utc::now());
        self.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn fetch_all(&self, query: &FileQuery) -> Result<Vec<StoredFile>, UploadError> {
        let mut files = self.collect(|f| query.matches(f));

        let (field, order) = query.sort();
        files.sort_by(|a, b| {
            let ord = compare(a, b, field).then_with(|| a.id.cmp(&b.id));
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let start = usize::try_from(query.start.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(files.into_iter().skip(start).take(limit).collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<StoredFile>, UploadError> {
        Ok(self.files.get(&id).map(|entry| entry.value().clone()))
    }

    async fn count(&self, query: &FileQuery) -> Result<u64, UploadError> {
        let count = self.files.iter().filter(|e| query.matches(e.value())).count();
        Ok(count as u64)
    }

    async fn search(&self, term: &str) -> Result<Vec<StoredFile>, UploadError> {
        let term = term.to_lowercase();
        let mut files = self.collect(|f| {
            f.hash.to_lowercase().contains(&term) || f.name.to_lowercase().contains(&term)
        });
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UploadError> {
        Ok(self.files.remove(&id).is_some())
    }
}

fn compare(a: &StoredFile, b: &StoredFile, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Hash => a.hash.cmp(&b.hash),
        SortField::Size => a.size.cmp(&b.size),
        SortField::Mime => a.mime.cmp(&b.mime),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

type StoreKey = (String, String, String);

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: DashMap<StoreKey, Value>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
    ) -> Result<Option<Value>, UploadError> {
        let lookup = (environment.to_string(), plugin.to_string(), key.to_string());
        Ok(self.values.get(&lookup).map(|entry| entry.value().clone()))
    }

    async fn set(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
        value: Value,
    ) -> Result<(), UploadError> {
        self.values.insert(
            (environment.to_string(), plugin.to_string(), key.to_string()),
            value,
        );
        Ok(())
    }

    async fn environments(&self, plugin: &str) -> Result<Vec<String>, UploadError> {
        let mut envs: Vec<String> = self
            .values
            .iter()
            .filter(|entry| entry.key().1 == plugin)
            .map(|entry| entry.key().0.clone())
            .collect();
        envs.sort();
        envs.dedup();
        Ok(envs)
    }
}
