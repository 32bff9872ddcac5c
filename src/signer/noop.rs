//! UrlSigner that does not sign.
//!
//! Produces deterministic urls without credentials, which is useful for
//! local runs and tests.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{SignedUrl, SignerError, UrlSigner};

/// Signer that returns `<base_url>/<bucket>/<key>?expires=<seconds>`.
#[derive(Debug, Clone)]
pub struct NoopSigner {
    base_url: String,
}

impl NoopSigner {
    /// Create a signer that builds urls under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for NoopSigner {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}

#[async_trait]
impl UrlSigner for NoopSigner {
    async fn sign_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<SignedUrl, SignerError> {
        let url = format!(
            "{}/{}/{}?expires={}",
            self.base_url,
            bucket,
            key,
            expires_in.as_secs()
        );
        Ok(SignedUrl::new(url, Utc::now(), expires_in))
    }
}
