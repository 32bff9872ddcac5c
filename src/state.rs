//! Presign server state.

use std::{sync::Arc, time::Duration};

use tracing::{info, Instrument};

use crate::{
    config::PresignConfig,
    error::{Result, ServerError},
    key::ObjectKey,
    response::PresignResponse,
    signer::UrlSigner,
};

/// State of the presign server.
///
/// Holds no mutable data, every request is served independently.
#[derive(Clone)]
pub struct PresignServerState {
    bucket: String,
    expires_in: Duration,
    signer: Arc<dyn UrlSigner>,
}

impl PresignServerState {
    /// Create a new presign server state.
    pub fn new(bucket: impl Into<String>, expires_in: Duration, signer: Arc<dyn UrlSigner>) -> Self {
        Self {
            bucket: bucket.into(),
            expires_in,
            signer,
        }
    }

    /// Create the state for the bucket and expiry in `config`.
    pub fn from_config(config: &PresignConfig, signer: Arc<dyn UrlSigner>) -> Self {
        Self::new(config.bucket(), config.expires_in(), signer)
    }

    /// The bucket urls are signed for.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Lifetime of every signed url.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Get the url signer from the state.
    pub fn signer(&self) -> Arc<dyn UrlSigner> {
        self.signer.clone()
    }

    /// Sign a GET url for `key`.
    ///
    /// Signer failures are logged and reported as `presign_failed` without
    /// the underlying detail.
    pub async fn presign(&self, key: &ObjectKey) -> Result<PresignResponse> {
        let span = tracing::info_span!("presign", bucket = %self.bucket, %key);
        let signed = self
            .signer
            .sign_url(&self.bucket, key, self.expires_in)
            .instrument(span)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %key, "presign_failed");
                ServerError::from(err)
            })?;

        info!(%key, expires_at = %signed.expires_at(), "signed url");
        Ok(PresignResponse::new(
            signed.into_url(),
            self.expires_in.as_secs(),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::ServerErrorKind,
        signer::{MockUrlSigner, SignedUrl, SignerError},
    };
    use chrono::Utc;
    use insta::assert_json_snapshot;
    use mockall::predicate::{always, eq};

    #[tokio::test]
    async fn presign() {
        let mut mock_signer = MockUrlSigner::new();
        mock_signer
            .expect_sign_url()
            .with(
                eq("lofiarts-digital"),
                eq("MLM-TEST.pdf"),
                eq(Duration::from_secs(900)),
            )
            .times(1)
            .returning(|bucket, key, expires_in| {
                Ok(SignedUrl::new(
                    format!("https://{bucket}.hel1.example.com/{key}?X-Amz-Expires=900"),
                    Utc::now(),
                    expires_in,
                ))
            });

        let state = PresignServerState::new(
            "lofiarts-digital",
            Duration::from_secs(900),
            Arc::new(mock_signer),
        );
        let response = state
            .presign(&ObjectKey::parse("MLM-TEST.pdf").unwrap())
            .await
            .unwrap();

        assert_json_snapshot!(response, @r###"
        {
          "url": "https://lofiarts-digital.hel1.example.com/MLM-TEST.pdf?X-Amz-Expires=900",
          "expiresIn": 900
        }
        "###);
    }

    #[tokio::test]
    async fn presign_reports_configured_expiry() {
        let mut mock_signer = MockUrlSigner::new();
        mock_signer
            .expect_sign_url()
            .with(always(), always(), eq(Duration::from_secs(60)))
            .returning(|_, _, expires_in| {
                Ok(SignedUrl::new("https://example.com/x", Utc::now(), expires_in))
            });

        let state =
            PresignServerState::new("bucket", Duration::from_secs(60), Arc::new(mock_signer));
        let response = state
            .presign(&ObjectKey::parse("x").unwrap())
            .await
            .unwrap();

        assert_eq!(response.expires_in(), 60);
    }

    #[tokio::test]
    async fn presign_failed() {
        let mut mock_signer = MockUrlSigner::new();
        mock_signer
            .expect_sign_url()
            .times(2)
            .returning(|_, _, _| Err(SignerError::new("dispatch failure: connection refused")));

        let state =
            PresignServerState::new("bucket", Duration::from_secs(900), Arc::new(mock_signer));
        let key = ObjectKey::parse("MLM-TEST.pdf").unwrap();

        // no retry, each request reaches the signer exactly once
        for _ in 0..2 {
            let err = state.presign(&key).await.unwrap_err();
            assert_eq!(err.kind(), ServerErrorKind::PresignFailed);
        }
    }
}
