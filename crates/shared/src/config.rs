//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::env;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Upload plugin defaults.
    #[serde(default)]
    pub upload: UploadDefaults,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Hard cap on a request body, applied before any upload validation.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1337
}

fn default_max_body_bytes() -> usize {
    100 * 1024 * 1024
}

/// Which backend holds file metadata and plugin settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseBackend {
    /// Relational database through SeaORM (Postgres or SQLite).
    #[default]
    Sql,
    /// Process-local document store. Nothing survives a restart.
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: DatabaseBackend,
    /// Database connection URL (ignored by the memory backend).
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://depot.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Storage provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProviderConfig {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory
    Memory,
}

impl Default for StorageProviderConfig {
    fn default() -> Self {
        Self::LocalFs {
            root: PathBuf::from("./public/uploads"),
        }
    }
}

impl StorageProviderConfig {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Provider backing the uploaded bytes.
    #[serde(default)]
    pub provider: StorageProviderConfig,
    /// Prefix prepended to object keys to build public URLs.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderConfig::default(),
            public_url: default_public_url(),
        }
    }
}

fn default_public_url() -> String {
    "/uploads".to_string()
}

/// Defaults written to the settings store the first time an environment is read.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadDefaults {
    /// Environment the server itself runs under.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Whether uploads are accepted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-file size limit in bytes.
    #[serde(default = "default_size_limit")]
    pub size_limit: f64,
}

impl Default for UploadDefaults {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            enabled: default_enabled(),
            size_limit: default_size_limit(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_size_limit() -> f64 {
    1_000_000.0
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// `RUN_MODE` picks the optional `config/{run_mode}` overlay and is the
    /// default upload environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE", Some("development")).unwrap_or_default();

        let config = config::Config::builder()
            .set_default("upload.environment", run_mode.clone())?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("DEPOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
