//! Response bodies of the presign endpoints.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body of a successful presign request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresignResponse {
    url: String,
    expires_in: u64,
}

impl PresignResponse {
    /// Create a response for a signed url valid for `expires_in` seconds.
    pub fn new(url: impl Into<String>, expires_in: u64) -> Self {
        Self {
            url: url.into(),
            expires_in,
        }
    }

    /// The signed url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lifetime of the url in seconds.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }
}

impl IntoResponse for PresignResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            Json(self),
        )
            .into_response()
    }
}
