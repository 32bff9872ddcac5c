#![allow(dead_code)]

use async_trait::async_trait;
use s3_presign_server::auth::{ApiKey, API_KEY_HEADER};
use s3_presign_server::router::build_presign_router;
use s3_presign_server::signer::noop::NoopSigner;
use s3_presign_server::signer::{SignedUrl, SignerError, UrlSigner};
use s3_presign_server::state::PresignServerState;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_BUCKET: &str = "lofiarts-digital";

pub struct TestClient {
    client: reqwest::Client,
    addr: SocketAddr,
}

impl TestClient {
    pub async fn new() -> Self {
        Self::with_signer(Arc::new(NoopSigner::new("https://objects.test"))).await
    }

    pub async fn with_signer(signer: Arc<dyn UrlSigner>) -> Self {
        Self::with_state(PresignServerState::new(
            TEST_BUCKET,
            Duration::from_secs(900),
            signer,
        ))
        .await
    }

    pub async fn with_state(state: PresignServerState) -> Self {
        let svc = build_presign_router(Arc::new(state), ApiKey::new(TEST_API_KEY));
        let app = svc.layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind ephemeral socket");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        TestClient { client, addr }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder {
            builder: self.client.get(format!("http://{}{}", self.addr, url)),
        }
    }

    /// `GET` request carrying the valid api key.
    pub fn get_authorized(&self, url: &str) -> RequestBuilder {
        self.get(url).header(API_KEY_HEADER, TEST_API_KEY)
    }
}

pub struct RequestBuilder {
    builder: reqwest::RequestBuilder,
}

impl RequestBuilder {
    pub async fn send(self) -> TestResponse {
        TestResponse {
            response: self.builder.send().await.unwrap(),
        }
    }

    pub fn header(mut self, key: impl AsRef<str>, value: &str) -> Self {
        self.builder = self
            .builder
            .header(key.as_ref().to_string(), value.to_string());
        self
    }
}

/// A wrapper around [`reqwest::Response`] that provides common methods with internal `unwrap()`s.
///
/// This is conventient for tests where panics are what you want. For access to
/// non-panicking versions or the complete `Response` API use `into_inner()` or
/// `as_ref()`.
#[derive(Debug)]
pub struct TestResponse {
    response: reqwest::Response,
}

impl TestResponse {
    pub fn assert_status_ok(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::OK);
    }

    pub fn assert_status_bad_request(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    pub fn assert_status_unauthorized(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    pub fn assert_status_internal_server_error(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }

    pub fn assert_header_content_type_json(&self) {
        assert_eq!(
            self.response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .unwrap(),
            "application/json; charset=utf-8"
        );
    }

    pub async fn text(self) -> String {
        self.response.text().await.unwrap()
    }

    pub async fn json<T>(self) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        self.response.json().await.unwrap()
    }

    pub fn status(&self) -> reqwest::StatusCode {
        self.response.status()
    }

    /// Get the inner [`reqwest::Response`] for less convenient but more complete access.
    pub fn into_inner(self) -> reqwest::Response {
        self.response
    }
}

impl AsRef<reqwest::Response> for TestResponse {
    fn as_ref(&self) -> &reqwest::Response {
        &self.response
    }
}

/// Signer that always fails, counting how often it was asked.
#[derive(Debug, Default)]
pub struct FailingSigner {
    calls: AtomicUsize,
}

impl FailingSigner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlSigner for FailingSigner {
    async fn sign_url(
        &self,
        _bucket: &str,
        _key: &str,
        _expires_in: Duration,
    ) -> Result<SignedUrl, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SignerError::new("dispatch failure: connection refused"))
    }
}
