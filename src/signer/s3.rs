//! UrlSigner for S3 compatible object stores.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    config::Credentials, error::DisplayErrorContext, presigning::PresigningConfig, Client,
};

use super::{SignedUrl, SignerError, UrlSigner};
use crate::config::PresignConfig;

/// Signing configuration for the S3 object store.
#[derive(Debug, Clone)]
pub struct S3UrlSigner {
    client: Client,
}

impl S3UrlSigner {
    /// Create a new `S3UrlSigner` from the provided S3 SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new `S3UrlSigner` with static credentials for the endpoint
    /// and region in `config`.
    pub async fn from_config(config: &PresignConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key(),
            config.secret_key(),
            None,
            None,
            "presign-config",
        );
        let shared_conf = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region().to_owned()))
            .endpoint_url(config.endpoint().as_str().trim_end_matches('/'))
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_conf = aws_sdk_s3::config::Builder::from(&shared_conf)
            .force_path_style(config.force_path_style())
            .build();

        tracing::debug!(
            endpoint = %config.endpoint(),
            region = config.region(),
            force_path_style = config.force_path_style(),
            "configured s3 client"
        );
        Self::new(Client::from_conf(s3_conf))
    }
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn sign_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<SignedUrl, SignerError> {
        let presign_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| SignerError::new(DisplayErrorContext(&e).to_string()))?;

        let req = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presign_config.clone())
            .await
            .map_err(|e| SignerError::new(DisplayErrorContext(&e).to_string()))?;

        Ok(SignedUrl::new(
            req.uri().to_string(),
            presign_config.start_time().into(),
            presign_config.expires(),
        ))
    }
}
