//! Upload settings, persisted per environment in a key/value store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::error::UploadError;
use super::types::{ProviderDescriptor, UploadConfig, UploadSettings};

/// Plugin name the upload settings are stored under.
pub const PLUGIN_NAME: &str = "upload";

/// Key holding the provider configuration.
pub const CONFIG_KEY: &str = "provider";

/// Per-environment, per-plugin key/value persistence.
///
/// This trait is implemented by the db crate.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value.
    async fn get(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
    ) -> Result<Option<Value>, UploadError>;

    /// Write a value, replacing any previous one.
    async fn set(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
        value: Value,
    ) -> Result<(), UploadError>;

    /// Environments holding at least one value for the plugin.
    async fn environments(&self, plugin: &str) -> Result<Vec<String>, UploadError>;
}

/// Reads and writes the upload configuration.
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    providers: Vec<ProviderDescriptor>,
    defaults: UploadConfig,
}

impl SettingsService {
    /// Create a settings service.
    ///
    /// `defaults` answers reads of environments without stored
    /// configuration. See [`SettingsService::seed`].
    #[must_use]
    pub fn new(
        store: Arc<dyn SettingsStore>,
        providers: Vec<ProviderDescriptor>,
        defaults: UploadConfig,
    ) -> Self {
        Self {
            store,
            providers,
            defaults,
        }
    }

    /// Current configuration for an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or holds an unreadable value.
    pub async fn get_config(&self, environment: &str) -> Result<UploadConfig, UploadError> {
        match self.store.get(environment, PLUGIN_NAME, CONFIG_KEY).await? {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                UploadError::settings(format!(
                    "stored upload config for {environment} is unreadable: {e}"
                ))
            }),
            None => Ok(self.defaults.clone()),
        }
    }

    /// Write the defaults for `environment` unless it already has a stored
    /// configuration. Called once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn seed(&self, environment: &str) -> Result<bool, UploadError> {
        if self
            .store
            .get(environment, PLUGIN_NAME, CONFIG_KEY)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        debug!(environment, "Seeding default upload config");
        self.write(environment, &self.defaults).await?;
        Ok(true)
    }

    /// Providers plus the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read.
    pub async fn get_settings(&self, environment: &str) -> Result<UploadSettings, UploadError> {
        Ok(UploadSettings {
            providers: self.providers.clone(),
            config: self.get_config(environment).await?,
        })
    }

    /// Replace the configuration of an environment.
    ///
    /// `sizeLimit` may be sent as a number or a numeric string; it is stored
    /// as a number.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidSettings`] if the payload is not a
    /// valid configuration, or a store error.
    pub async fn update_settings(
        &self,
        environment: &str,
        payload: Value,
    ) -> Result<UploadConfig, UploadError> {
        let config: UploadConfig = serde_json::from_value(payload)
            .map_err(|e| UploadError::InvalidSettings(e.to_string()))?;

        self.write(environment, &config).await?;
        Ok(config)
    }

    /// Environments with stored configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn environments(&self) -> Result<Vec<String>, UploadError> {
        self.store.environments(PLUGIN_NAME).await
    }

    /// Providers this server can store files with.
    #[must_use]
    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    async fn write(&self, environment: &str, config: &UploadConfig) -> Result<(), UploadError> {
        let value = serde_json::to_value(config).map_err(|e| UploadError::settings(e.to_string()))?;
        self.store
            .set(environment, PLUGIN_NAME, CONFIG_KEY, value)
            .await
    }
}
