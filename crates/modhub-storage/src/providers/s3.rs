//! S3-compatible link provider using presigned GET requests.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::{debug, info};

use modhub_core::config::storage::S3StorageConfig;
use modhub_core::error::{AppError, ErrorKind};
use modhub_core::result::AppResult;
use modhub_core::traits::storage::LinkProvider;

/// Produces presigned `GetObject` URLs. Signing is local; no request is
/// sent to the object store.
#[derive(Debug, Clone)]
pub struct S3LinkProvider {
    client: Client,
    bucket: String,
    link_ttl: Duration,
}

impl S3LinkProvider {
    /// Create a provider from configuration.
    ///
    /// Static credentials are used when `access_key` is set; otherwise the
    /// default AWS credential chain is loaded.
    pub async fn new(config: &S3StorageConfig, link_ttl: Duration) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must not be empty"));
        }

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 link provider"
        );

        let region = Region::new(config.region.clone());
        let mut builder = if config.access_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            aws_sdk_s3::config::Builder::from(&shared)
        } else {
            let credentials = Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "modhub-config",
            );
            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(credentials)
                .region(region)
        };

        builder = builder.force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone());
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            link_ttl,
        })
    }
}

#[async_trait]
impl LinkProvider for S3LinkProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn download_link(&self, key: &str) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(self.link_ttl).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid presigned link lifetime", e)
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to presign download for '{key}'"),
                    e,
                )
            })?;

        debug!(bucket = %self.bucket, key, "Presigned download link");
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3StorageConfig {
        S3StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            region: "us-east-1".to_string(),
            bucket: "mods".to_string(),
            access_key: "minio".to_string(),
            secret_key: "minio-secret".to_string(),
            force_path_style: true,
        }
    }

    #[tokio::test]
    async fn test_presigned_link_targets_bucket_and_key() {
        let provider = S3LinkProvider::new(&config(), Duration::from_secs(900))
            .await
            .unwrap();
        let url = provider.download_link("abc/1.0.0.zip").await.unwrap();

        assert!(url.starts_with("http://localhost:9000/mods/abc/1.0.0.zip?"));
        assert!(url.contains("X-Amz-Signature="));
        assert!(url.contains("X-Amz-Expires=900"));
    }

    #[tokio::test]
    async fn test_missing_bucket_is_rejected() {
        let mut config = config();
        config.bucket.clear();
        assert!(
            S3LinkProvider::new(&config, Duration::from_secs(60))
                .await
                .is_err()
        );
    }
}
