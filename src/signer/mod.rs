//! Traits and types for creating pre-signed urls.

use std::{error::Error, fmt::Display, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod noop;
pub mod s3;

/// Trait implemented by object store clients to derive a pre-signed GET url
/// for an object in a bucket.
///
/// The signing algorithm itself is owned by the implementation, the server
/// only decides which object may be signed and for how long.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Create a presigned url for `key` in `bucket` that is valid for
    /// `expires_in`.
    async fn sign_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<SignedUrl, SignerError>;
}

/// A presigned url with a validity period.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    url: String,
    valid_from: DateTime<Utc>,
    valid_duration: Duration,
}

impl SignedUrl {
    /// Create a new signed url that became valid at `valid_from`.
    pub fn new(url: impl Into<String>, valid_from: DateTime<Utc>, valid_duration: Duration) -> Self {
        Self {
            url: url.into(),
            valid_from,
            valid_duration,
        }
    }

    /// Get the presigned url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the duration the presigned url is valid for.
    pub fn valid_duration(&self) -> Duration {
        self.valid_duration
    }

    /// Get the time the presigned url expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.valid_from
            + chrono::Duration::from_std(self.valid_duration).unwrap_or(chrono::Duration::zero())
    }

    /// Consume the signed url and return the url string.
    pub fn into_url(self) -> String {
        self.url
    }
}

/// Failure reported by a [`UrlSigner`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignerError {
    message: String,
}

impl SignerError {
    /// Create a new signer error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SignerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to sign url: {}", self.message)
    }
}

impl Error for SignerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn signed_url_expiry() {
        let valid_from = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let signed = SignedUrl::new(
            "https://bucket.example.com/a.pdf",
            valid_from,
            Duration::from_secs(900),
        );

        assert_eq!(signed.url(), "https://bucket.example.com/a.pdf");
        assert_eq!(
            signed.expires_at(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 15, 0).unwrap()
        );
    }

    #[test]
    fn signer_error_display() {
        let err = SignerError::new("connection refused");
        assert_eq!(err.to_string(), "failed to sign url: connection refused");
    }
}
