//! Event-record binding.
//!
//! Serverless hosts that hand over a parsed event record instead of an HTTP
//! request use this entry point. It implements the same contract as the
//! axum route: POST only, `{type, payload}` envelope in, upstream JSON or
//! `{"error": ...}` out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::forward::handle_envelope;
use super::server::AppState;
use crate::error::Error;

/// Inbound event record: the method and raw body an event-style host passes
/// to its function entry point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    pub http_method: String,
    /// Raw request body. Absent bodies are treated as empty (and therefore
    /// malformed for the relay contract).
    #[serde(default)]
    pub body: Option<String>,
}

/// Outbound event response record: status, content type, serialized body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl EventResponse {
    fn ok(json: &Value) -> Self {
        EventResponse {
            status_code: 200,
            content_type: "application/json",
            body: json.to_string(),
        }
    }

    fn from_error(err: &Error) -> Self {
        EventResponse {
            status_code: err.status().as_u16(),
            content_type: "application/json",
            body: err.to_body().to_string(),
        }
    }
}

/// Handle one event-record invocation.
///
/// Method matching is case-insensitive: event-style hosts report uppercase
/// methods, but nothing in the contract depends on that.
pub async fn handle_event(state: &AppState, event: HttpEvent) -> EventResponse {
    if !event.http_method.eq_ignore_ascii_case("POST") {
        return EventResponse::from_error(&Error::MethodNotAllowed);
    }

    let body = event.body.unwrap_or_default();

    match handle_envelope(&state.http_client, &state.config.upstream, body.as_bytes()).await {
        Ok(json) => EventResponse::ok(&json),
        Err(err) => {
            tracing::warn!(error = %err, "Event relay request failed");
            EventResponse::from_error(&err)
        }
    }
}
