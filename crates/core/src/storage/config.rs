//! Storage configuration types.

use depot_shared::config::{StorageProviderConfig, StorageSettings};

use crate::upload::ProviderDescriptor;

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProviderConfig,
    /// Prefix of public file URLs, without trailing slash.
    pub public_url: String,
}

impl StorageConfig {
    /// Default public URL prefix.
    pub const DEFAULT_PUBLIC_URL: &'static str = "/uploads";

    /// Create a new storage config with the default public URL.
    #[must_use]
    pub fn new(provider: StorageProviderConfig) -> Self {
        Self {
            provider,
            public_url: Self::DEFAULT_PUBLIC_URL.to_string(),
        }
    }

    /// Set the public URL prefix.
    #[must_use]
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build from the application storage settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(settings.provider.clone()).with_public_url(settings.public_url.clone())
    }

    /// Identifier and display name of the configured provider.
    #[must_use]
    pub fn descriptor(&self) -> ProviderDescriptor {
        match &self.provider {
            StorageProviderConfig::S3 { .. } => {
                ProviderDescriptor::new("aws-s3", "Amazon Web Service S3")
            }
            StorageProviderConfig::AzureBlob { .. } => {
                ProviderDescriptor::new("azure-blob", "Azure Blob Storage")
            }
            StorageProviderConfig::LocalFs { .. } => {
                ProviderDescriptor::new("local", "Local server")
            }
            StorageProviderConfig::Memory => ProviderDescriptor::new("memory", "In-memory storage"),
        }
    }

    /// Public URL of an object key.
    #[must_use]
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.public_url)
    }
}
