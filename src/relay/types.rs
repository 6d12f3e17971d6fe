//! Relay envelope and the request-type → upstream-endpoint table.

use serde::Deserialize;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::error::Error;

/// Inbound relay envelope: `{"type": "...", "payload": ...}`.
///
/// `payload` is opaque: its shape belongs to the upstream API's contract
/// and is forwarded without validation or transformation.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
}

impl RelayRequest {
    /// Decode an inbound body. Syntactically invalid JSON and envelope-shape
    /// mismatches (missing `type` or `payload`) both surface as 400.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedBody(e.to_string()))
    }

    /// Resolve the `type` field against the supported set.
    pub fn resolve_kind(&self) -> Result<GenerationKind, Error> {
        GenerationKind::parse(&self.kind).ok_or_else(|| Error::InvalidType(self.kind.clone()))
    }
}

/// Supported generation request types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Text,
    Image,
    Tts,
}

impl GenerationKind {
    pub const ALL: [GenerationKind; 3] =
        [GenerationKind::Text, GenerationKind::Image, GenerationKind::Tts];

    /// Parse a wire-format type string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(GenerationKind::Text),
            "image" => Some(GenerationKind::Image),
            "tts" => Some(GenerationKind::Tts),
            _ => None,
        }
    }

    /// Wire-format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Text => "text",
            GenerationKind::Image => "image",
            GenerationKind::Tts => "tts",
        }
    }

    /// Model id for this kind.
    pub fn model<'a>(&self, upstream: &'a UpstreamConfig) -> &'a str {
        match self {
            GenerationKind::Text => &upstream.text_model,
            GenerationKind::Image => &upstream.image_model,
            GenerationKind::Tts => &upstream.tts_model,
        }
    }

    /// Upstream RPC verb. Image generation goes through `:predict` and
    /// expects an `{instances, parameters}` payload; the rest go through
    /// `:generateContent`.
    fn action(&self) -> &'static str {
        match self {
            GenerationKind::Image => "predict",
            _ => "generateContent",
        }
    }

    /// Full upstream URL for this kind, credential not included.
    pub fn upstream_url(&self, upstream: &UpstreamConfig) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            upstream.base_url.trim_end_matches('/'),
            self.model(upstream),
            self.action()
        )
    }
}

impl std::fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
