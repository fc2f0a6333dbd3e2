//! Upload request validation and delegation.

use std::sync::Arc;

use tracing::{info, warn};

use super::bufferize::bufferize;
use super::error::UploadError;
use super::provider::StorageProvider;
use super::settings::SettingsService;
use super::types::{IncomingFile, RawFile, StoredFile, UploadBody, UploadConfig};

/// Validates upload requests and hands accepted files to the storage provider.
pub struct UploadHandler {
    settings: Arc<SettingsService>,
    provider: Arc<dyn StorageProvider>,
}

impl UploadHandler {
    /// Create an upload handler.
    #[must_use]
    pub fn new(settings: Arc<SettingsService>, provider: Arc<dyn StorageProvider>) -> Self {
        Self { settings, provider }
    }

    /// Handle one upload request.
    ///
    /// Checks run in order and stop at the first failure: uploads enabled,
    /// at least one file, every file within the size limit. Nothing reaches
    /// the provider unless all of them pass.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Uploads are disabled for the environment
    /// - No file was attached
    /// - A file exceeds the size limit (the first one is reported)
    /// - The settings store or the storage provider fails
    pub async fn handle(
        &self,
        environment: &str,
        body: UploadBody,
        files: Vec<RawFile>,
    ) -> Result<Vec<StoredFile>, UploadError> {
        let config = self.settings.get_config(environment).await?;

        if !config.enabled {
            warn!(environment, "Upload rejected: disabled");
            return Err(UploadError::Disabled);
        }

        if files.is_empty() {
            return Err(UploadError::EmptyInput);
        }

        let buffers = bufferize(files);
        check_size_limit(&buffers, &config)?;

        let relation = body.relation();
        let path = body.path();
        let accepted = buffers
            .into_iter()
            .map(|file| file.annotate(relation.clone(), path.clone()))
            .collect();

        let stored = self.provider.upload(accepted, &config).await?;

        info!(
            environment,
            provider = %config.provider,
            count = stored.len(),
            "Files uploaded"
        );

        Ok(stored)
    }
}

/// Fail on the first file over the configured limit.
///
/// # Errors
///
/// Returns [`UploadError::SizeLimitExceeded`] naming the first oversized file.
pub fn check_size_limit(files: &[IncomingFile], config: &UploadConfig) -> Result<(), UploadError> {
    match files.iter().find(|f| config.exceeds_limit(f.size)) {
        Some(file) => {
            warn!(
                file = %file.name,
                size = file.size,
                limit = config.size_limit,
                "Upload rejected: size limit"
            );
            Err(UploadError::size_limit_exceeded(&file.name))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::testing::{MockSettingsStore, RecordingProvider, local_settings};
    use crate::upload::types::RelationRef;
    use serde_json::json;

    struct Fixture {
        handler: UploadHandler,
        settings: Arc<SettingsService>,
        provider: Arc<RecordingProvider>,
    }

    fn fixture() -> Fixture {
        let settings = Arc::new(local_settings(Arc::new(MockSettingsStore::default())));
        let provider = Arc::new(RecordingProvider::default());
        Fixture {
            handler: UploadHandler::new(settings.clone(), provider.clone()),
            settings,
            provider,
        }
    }

    async fn configure(settings: &SettingsService, enabled: bool, size_limit: f64) {
        settings
            .update_settings(
                "development",
                json!({
                    "provider": "local",
                    "name": "Local server",
                    "enabled": enabled,
                    "sizeLimit": size_limit
                }),
            )
            .await
            .unwrap();
    }

    fn jpg(name: &str, size: usize) -> RawFile {
        RawFile::new(name, Some("image/jpeg".into()), vec![7u8; size])
    }

    #[tokio::test]
    async fn test_upload_within_limit() {
        let f = fixture();
        configure(&f.settings, true, 1_000_000.0).await;

        let stored = f
            .handler
            .handle("development", UploadBody::default(), vec![jpg("rec.jpg", 50_000)])
            .await
            .unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "rec.jpg");
        assert_eq!(stored[0].provider, "local");
        assert_eq!(stored[0].size, 50_000);
        assert_eq!(f.provider.upload_calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_never_calls_provider() {
        let f = fixture();
        configure(&f.settings, false, 1_000_000.0).await;

        let err = f
            .handler
            .handle("development", UploadBody::default(), vec![jpg("rec.jpg", 10)])
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Disabled));
        assert_eq!(err.to_string(), "File upload is disabled");
        assert_eq!(f.provider.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_wins_over_empty() {
        let f = fixture();
        configure(&f.settings, false, 1_000_000.0).await;

        let err = f
            .handler
            .handle("development", UploadBody::default(), vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Disabled));
    }

    #[tokio::test]
    async fn test_empty_files() {
        let f = fixture();

        let err = f
            .handler
            .handle("development", UploadBody::default(), vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::EmptyInput));
        assert_eq!(err.to_string(), "Files are empty");
        assert_eq!(f.provider.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_size_limit_zero() {
        let f = fixture();
        configure(&f.settings, true, 0.0).await;

        let err = f
            .handler
            .handle("development", UploadBody::default(), vec![jpg("rec.jpg", 1)])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("rec.jpg file is bigger than limit size!"));
        assert_eq!(f.provider.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_first_oversized_file_short_circuits() {
        let f = fixture();
        configure(&f.settings, true, 100.0).await;

        let files = vec![jpg("ok.jpg", 10), jpg("big.jpg", 200), jpg("huge.jpg", 500)];
        let err = f
            .handler
            .handle("development", UploadBody::default(), files)
            .await
            .unwrap_err();

        match err {
            UploadError::SizeLimitExceeded { name } => assert_eq!(name, "big.jpg"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(f.provider.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_relation_and_path_are_attached() {
        let f = fixture();
        let body = UploadBody {
            ref_id: Some("42".into()),
            reference: Some("article".into()),
            source: None,
            field: Some("cover".into()),
            path: Some("articles/covers".into()),
        };

        f.handler
            .handle("development", body, vec![jpg("a.jpg", 1), jpg("b.jpg", 1)])
            .await
            .unwrap();

        let forwarded = f.provider.last_upload();
        assert_eq!(forwarded.len(), 2);
        for file in forwarded {
            assert_eq!(
                file.related,
                vec![RelationRef {
                    ref_id: "42".into(),
                    reference: "article".into(),
                    source: None,
                    field: "cover".into(),
                }]
            );
            assert_eq!(file.path.as_deref(), Some("articles/covers"));
        }
    }

    #[tokio::test]
    async fn test_partial_relation_is_ignored() {
        let f = fixture();
        let body = UploadBody {
            ref_id: Some("42".into()),
            reference: Some("article".into()),
            source: Some("content-manager".into()),
            field: None,
            path: None,
        };

        f.handler
            .handle("development", body, vec![jpg("a.jpg", 1)])
            .await
            .unwrap();

        let forwarded = f.provider.last_upload();
        assert!(forwarded[0].related.is_empty());
        assert!(forwarded[0].path.is_none());
    }
}
