//! HTTP request handlers.

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use super::forward::handle_envelope;
use super::server::AppState;
use super::types::GenerationKind;
use crate::error::Error;

/// Response header: correlation ID (UUID v4), attached to every response.
pub const REQUEST_ID_HEADER: &str = "x-gembridge-request-id";

/// Handle `POST /api/generate`.
///
/// The body is taken as raw bytes rather than `Json<T>` so malformed
/// payloads surface as this service's own 400 error body instead of the
/// extractor's default rejection.
pub async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    let mut response =
        match handle_envelope(&state.http_client, &state.config.upstream, &body).await {
            Ok(json) => {
                tracing::info!(request_id = %request_id, "Relay request succeeded");
                (StatusCode::OK, Json(json)).into_response()
            }
            Err(err) => {
                tracing::warn!(request_id = %request_id, error = %err, "Relay request failed");
                err.into_response()
            }
        };

    response.headers_mut().insert(
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderValue::from_str(&request_id).unwrap(),
    );
    response
}

/// Fallback for non-POST methods on the relay route. Runs before any body
/// processing, so no upstream call can occur.
pub async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

/// Handle GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gembridge"
    }))
}

/// Handle GET /endpoints - the resolved type → upstream URL table, with the
/// credential reported only as present/absent.
pub async fn list_endpoints(State(state): State<AppState>) -> impl IntoResponse {
    let endpoints: Vec<serde_json::Value> = GenerationKind::ALL
        .iter()
        .map(|kind| {
            serde_json::json!({
                "type": kind.as_str(),
                "url": kind.upstream_url(&state.config.upstream),
            })
        })
        .collect();

    Json(serde_json::json!({
        "endpoints": endpoints,
        "credential_configured": state.config.upstream.api_key.is_some(),
    }))
}
