//! # S3 Presign Server
//!
//! A small HTTP gateway that hands out time-limited, signed download urls
//! for objects stored in an S3 compatible object store. Callers authenticate
//! with a single shared api key and never see the storage credentials.
//!
//! ## Endpoints
//!
//! - `GET /` and `GET /health`: liveness probes, no authentication.
//! - `GET /presign?key=<object key>`: requires the `x-api-key` header and
//! returns `{"url": "...", "expiresIn": 900}`.
//!
//! ## Design
//!
//! The server is stateless. The configuration is loaded once from the
//! environment into a [`config::PresignConfig`] and the request handlers
//! only see the [`state::PresignServerState`] derived from it. Signing is
//! delegated to a [`signer::UrlSigner`], which allows swapping the S3 client
//! for a deterministic signer in tests.
//!

#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod key;
pub mod signer;

pub mod error;
mod extract;
pub mod response;
pub mod router;
pub mod state;
