//! Errors returned by the presign endpoints.

use std::fmt::Display;

use axum::{http::header, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::signer::SignerError;

/// Result type used by the request handlers.
pub type Result<T> = core::result::Result<T, ServerError>;

/// The category of a request failure.
///
/// Every kind maps to exactly one HTTP status code and one public error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    /// The `x-api-key` header is absent or does not match.
    Unauthorized,
    /// The `key` query parameter is absent, empty or repeated.
    MissingKey,
    /// The `key` query parameter was rejected by the object key checks.
    InvalidKey,
    /// The signing collaborator failed to produce a url.
    PresignFailed,
    /// No route matched the request.
    NotFound,
}

impl ServerErrorKind {
    /// The error code sent to the caller in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::MissingKey => "missing key",
            Self::InvalidKey => "invalid key",
            Self::PresignFailed => "presign_failed",
            Self::NotFound => "not_found",
        }
    }

    /// The HTTP status code for this kind of error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingKey | Self::InvalidKey => StatusCode::BAD_REQUEST,
            Self::PresignFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl Display for ServerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::MissingKey => write!(f, "MISSING_KEY"),
            Self::InvalidKey => write!(f, "INVALID_KEY"),
            Self::PresignFailed => write!(f, "PRESIGN_FAILED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// A request failure.
///
/// The message is only ever written to the server log, the caller receives
/// the code of the error kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    kind: ServerErrorKind,
    message: String,
}

impl ServerError {
    /// Create a new error of the given kind.
    pub fn new(kind: ServerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ServerErrorKind {
        self.kind
    }

    /// The server side description of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The api key was absent or did not match.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Unauthorized, message)
    }

    /// The object key was not supplied as a single, non-empty value.
    pub fn missing_key(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::MissingKey, message)
    }

    /// The object key was rejected.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::InvalidKey, message)
    }

    /// The url could not be signed.
    pub fn presign_failed(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::PresignFailed, message)
    }

    /// No route matched.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::NotFound, message)
    }

    /// Convert into the body that is returned to the caller.
    pub fn into_error_response(self) -> ErrorResponse {
        ErrorResponse {
            error: self.kind.code(),
        }
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ServerError {}

impl From<SignerError> for ServerError {
    fn from(err: SignerError) -> Self {
        ServerError::presign_failed(err.to_string())
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self.kind() {
            ServerErrorKind::PresignFailed => {
                tracing::error!(error = %self, "returning error response")
            }
            _ => tracing::debug!(error = %self, "returning error response"),
        }
        let status_code = self.kind().status_code();

        (
            status_code,
            [(
                header::CONTENT_TYPE.as_str(),
                "application/json; charset=utf-8",
            )],
            Json(self.into_error_response()),
        )
            .into_response()
    }
}
