//! The relay core: one inbound envelope, one outbound call.

use reqwest::{header, Client};
use serde_json::Value;

use crate::config::{ApiKey, UpstreamConfig};
use crate::error::{Error, Result};

use super::types::{GenerationKind, RelayRequest};

/// Forward `payload` to the upstream endpoint for `kind`.
///
/// The credential is passed in explicitly so the core stays testable without
/// environment manipulation; it is attached as the `key` query parameter and
/// never appears in the URL we log. Exactly one outbound POST is made per
/// call and failures are never retried.
pub async fn relay(
    client: &Client,
    upstream: &UpstreamConfig,
    credential: &ApiKey,
    kind: GenerationKind,
    payload: &Value,
) -> Result<Value> {
    let url = kind.upstream_url(upstream);

    tracing::debug!(kind = %kind, url = %url, "Forwarding generation request");

    let response = client
        .post(&url)
        .query(&[("key", credential.expose_secret())])
        .header(header::CONTENT_TYPE, "application/json")
        .json(payload)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(kind = %kind, error = %e, "Failed to reach upstream");
            Error::Upstream(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(kind = %kind, status = %status, body = %body, "Upstream returned error");
        return Err(Error::UpstreamFailure {
            status: status.as_u16(),
            body,
        });
    }

    let json = response.json().await.map_err(|e| {
        tracing::error!(kind = %kind, error = %e, "Failed to parse upstream response");
        Error::Upstream(e)
    })?;

    Ok(json)
}

/// Decode an inbound envelope body and run it through [`relay`].
///
/// Shared by both hosting bindings. The credential check comes first: a
/// misconfigured deployment answers 500 for any body, valid or not, before
/// any parsing or network activity.
pub async fn handle_envelope(
    client: &Client,
    upstream: &UpstreamConfig,
    body: &[u8],
) -> Result<Value> {
    let credential = upstream.api_key.as_ref().ok_or(Error::MissingCredential)?;

    let request = RelayRequest::from_slice(body)?;
    let kind = request.resolve_kind()?;

    tracing::info!(kind = %kind, "Received generation request");

    relay(client, upstream, credential, kind, &request.payload).await
}
