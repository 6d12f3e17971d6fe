//! Error types for gembridge.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Result type alias for gembridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gembridge.
///
/// Every variant resolves within a single request scope; nothing is retried
/// or deferred. The caller always receives a JSON body, either the upstream
/// response or `{"error": ...}` built by [`Error::to_body`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("API key not configured")]
    MissingCredential,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Invalid request type: '{0}'")]
    InvalidType(String),

    #[error("Upstream request failed with status {status}")]
    UpstreamFailure { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status this error maps to.
    ///
    /// Upstream failures forward the upstream's own status so the caller can
    /// tell a quota error (429) from a rejected payload (400). Transport and
    /// decode failures surface as 502.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            Error::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Error::InvalidType(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamFailure { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error body: `{"error": ...}`, plus `details` carrying the
    /// upstream's own error text when one was received.
    pub fn to_body(&self) -> serde_json::Value {
        match self {
            Error::UpstreamFailure { body, .. } => serde_json::json!({
                "error": self.to_string(),
                "details": body,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self.to_body())).into_response()
    }
}
