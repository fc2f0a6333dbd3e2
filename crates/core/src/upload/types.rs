//! Upload types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use depot_shared::env::parse_float;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Upload plugin configuration, stored per environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Provider identifier, e.g. `local`.
    #[serde(default)]
    pub provider: String,
    /// Human readable provider name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Only an explicit `false` disables uploads.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-file size limit in bytes. Accepts a number or a numeric string.
    #[serde(rename = "sizeLimit", deserialize_with = "deserialize_size_limit")]
    pub size_limit: f64,
    /// Provider specific options, kept as sent.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

fn deserialize_size_limit<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    };

    match parsed {
        Some(limit) if limit.is_finite() => Ok(limit),
        _ => Err(D::Error::custom(format!(
            "sizeLimit must be a finite number, got {value}"
        ))),
    }
}

impl UploadConfig {
    /// Create a config for the given provider.
    #[must_use]
    pub fn new(descriptor: &ProviderDescriptor, enabled: bool, size_limit: f64) -> Self {
        Self {
            provider: descriptor.provider.clone(),
            name: descriptor.name.clone(),
            enabled,
            size_limit,
            options: Map::new(),
        }
    }

    /// Whether a file of `size` bytes is over the limit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn exceeds_limit(&self, size: u64) -> bool {
        size as f64 > self.size_limit
    }
}

/// Identifies a storage provider in the settings listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub provider: String,
    /// Display name.
    pub name: String,
}

impl ProviderDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub fn new(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
        }
    }
}

/// Settings view returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSettings {
    /// Providers this server can store files with.
    pub providers: Vec<ProviderDescriptor>,
    /// Current configuration for the environment.
    pub config: UploadConfig,
}

/// Optional metadata sent alongside the files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadBody {
    /// Identifier of the record the files belong to.
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
    /// Model name of that record.
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    /// Plugin owning the model, if any.
    pub source: Option<String>,
    /// Field on the record holding the files.
    pub field: Option<String>,
    /// Destination folder for the files.
    pub path: Option<String>,
}

impl UploadBody {
    /// Relation described by the body, present only when `refId`, `ref` and
    /// `field` are all set.
    #[must_use]
    pub fn relation(&self) -> Option<RelationRef> {
        let ref_id = non_empty(self.ref_id.as_deref())?;
        let reference = non_empty(self.reference.as_deref())?;
        let field = non_empty(self.field.as_deref())?;

        Some(RelationRef {
            ref_id: ref_id.to_string(),
            reference: reference.to_string(),
            source: self.source.clone(),
            field: field.to_string(),
        })
    }

    /// Destination folder, if a non-empty one was sent.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        non_empty(self.path.as_deref()).map(String::from)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Link between an uploaded file and a field of another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRef {
    /// Related record identifier.
    #[serde(rename = "refId")]
    pub ref_id: String,
    /// Related model name.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Plugin owning the related model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Field name on the related record.
    pub field: String,
}

/// A file part as received from the client, before buffering.
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Client supplied file name.
    pub name: String,
    /// Client supplied content type.
    pub mime: Option<String>,
    /// File bytes.
    pub content: Bytes,
}

impl RawFile {
    /// Create a raw file.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: Option<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime,
            content: content.into(),
        }
    }
}

/// Buffered file with derived metadata.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Original file name.
    pub name: String,
    /// Unique storage-safe identifier.
    pub hash: String,
    /// Lowercase extension including the dot, empty when none.
    pub ext: String,
    /// MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// Hex SHA-256 of the content.
    pub sha256: String,
    /// File bytes.
    pub content: Bytes,
}

impl IncomingFile {
    /// Build the file handed to the storage provider.
    #[must_use]
    pub fn annotate(self, relation: Option<RelationRef>, path: Option<String>) -> UploadFile {
        UploadFile {
            file: self,
            related: relation.into_iter().collect(),
            path,
        }
    }
}

/// A validated file ready for the storage provider.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// The buffered file.
    pub file: IncomingFile,
    /// Records this file is attached to.
    pub related: Vec<RelationRef>,
    /// Destination folder.
    pub path: Option<String>,
}

/// Input for creating a file record.
#[derive(Debug, Clone)]
pub struct CreateFileInput {
    /// Original file name.
    pub name: String,
    /// Unique storage identifier.
    pub hash: String,
    /// Hex SHA-256 of the content.
    pub sha256: String,
    /// Extension including the dot.
    pub ext: String,
    /// MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// Public URL.
    pub url: String,
    /// Provider that stored the bytes.
    pub provider: String,
    /// Destination folder.
    pub path: Option<String>,
    /// Records this file is attached to.
    pub related: Vec<RelationRef>,
}

/// Persisted file record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Unique identifier.
    pub id: Uuid,
    /// Original file name.
    pub name: String,
    /// Unique storage identifier.
    pub hash: String,
    /// Hex SHA-256 of the content.
    pub sha256: String,
    /// Extension including the dot.
    pub ext: String,
    /// MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// Public URL.
    pub url: String,
    /// Provider that stored the bytes.
    pub provider: String,
    /// Destination folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Records this file is attached to.
    #[serde(default)]
    pub related: Vec<RelationRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl StoredFile {
    /// Build a record from creation input.
    #[must_use]
    pub fn from_input(id: Uuid, input: CreateFileInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            hash: input.hash,
            sha256: input.sha256,
            ext: input.ext,
            mime: input.mime,
            size: input.size,
            url: input.url,
            provider: input.provider,
            path: input.path,
            related: input.related,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sortable file columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// File name.
    Name,
    /// Storage hash.
    Hash,
    /// Size in bytes.
    Size,
    /// MIME type.
    Mime,
    /// Creation time.
    #[default]
    CreatedAt,
    /// Update time.
    UpdatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Filters and paging for file listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileQuery {
    /// Maximum number of records.
    #[serde(rename = "_limit")]
    pub limit: Option<u64>,
    /// Number of records to skip.
    #[serde(rename = "_start")]
    pub start: Option<u64>,
    /// `field:ASC` or `field:DESC`.
    #[serde(rename = "_sort")]
    pub sort: Option<String>,
    /// Exact file name.
    pub name: Option<String>,
    /// Exact MIME type.
    pub mime: Option<String>,
    /// Exact provider.
    pub provider: Option<String>,
    /// Exact hash.
    pub hash: Option<String>,
}

impl FileQuery {
    /// Parsed sort column and direction. Unknown columns fall back to
    /// `createdAt`, a missing direction means ascending.
    #[must_use]
    pub fn sort(&self) -> (SortField, SortOrder) {
        let Some(raw) = self.sort.as_deref() else {
            return (SortField::default(), SortOrder::default());
        };

        let (field, order) = raw.split_once(':').unwrap_or((raw, "ASC"));
        let field = match field.trim() {
            "name" => SortField::Name,
            "hash" => SortField::Hash,
            "size" => SortField::Size,
            "mime" => SortField::Mime,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            _ => SortField::CreatedAt,
        };
        let order = if order.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };

        (field, order)
    }

    /// Whether a record passes the exact-match filters.
    #[must_use]
    pub fn matches(&self, file: &StoredFile) -> bool {
        fn check(filter: Option<&String>, value: &str) -> bool {
            filter.is_none_or(|f| f == value)
        }

        check(self.name.as_ref(), &file.name)
            && check(self.mime.as_ref(), &file.mime)
            && check(self.provider.as_ref(), &file.provider)
            && check(self.hash.as_ref(), &file.hash)
    }
}
