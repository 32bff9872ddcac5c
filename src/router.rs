//! Router for the presign server.

use std::sync::Arc;

use axum::{debug_handler, extract::State, routing::get, Router};

use crate::{
    auth::{api_key::ApiKeyAuthLayer, ApiKey},
    error::{Result, ServerError},
    key::ObjectKey,
    response::PresignResponse,
    state::PresignServerState,
};

/// Builds the router for the presign server.
///
/// `/` and `/health` are liveness probes and never authenticated, `/presign`
/// requires the api key.
pub fn build_presign_router(state: Arc<PresignServerState>, api_key: ApiKey) -> Router {
    Router::new()
        .route("/presign", get(presign))
        .route_layer(ApiKeyAuthLayer::new(api_key))
        .route("/", get(root))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

async fn root() -> &'static str {
    "presign up"
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> ServerError {
    ServerError::not_found("no route matched")
}

#[debug_handler]
async fn presign(
    State(state): State<Arc<PresignServerState>>,
    key: ObjectKey,
) -> Result<PresignResponse> {
    state.presign(&key).await
}
