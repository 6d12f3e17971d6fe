//! Configuration parsing and validation for gembridge.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Conventional environment variable consulted when `upstream.api_key` is
/// omitted from the config file.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Upstream generative API configuration.
///
/// The defaults target the Google Generative Language API; `base_url` is
/// overridable so tests can point the relay at a local mock server.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Resolved credential, if any. Absence is not fatal here: the relay
    /// rejects requests with 500 until a key is provided.
    pub api_key: Option<ApiKey>,
    pub text_model: String,
    pub image_model: String,
    pub tts_model: String,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-tts".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the gembridge target when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// API key wrapper that redacts in Debug/Display/Serialize and zeroizes on drop.
///
/// The inner `SecretString` ensures the key value is:
/// - Zeroized in memory when dropped
/// - Never exposed via Debug or Display
/// - Only accessible via `.expose_secret()` (grep-auditable)
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Access the raw key value. Every call site is auditable via `grep expose_secret`.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> serde::Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| ApiKey(SecretString::from(s)))
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// How the upstream API key was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Key was a literal string in config (no ${} references)
    Literal,
    /// Key contained ${VAR} references expanded from environment
    EnvExpanded,
    /// Key was discovered from the conventional GEMINI_API_KEY variable
    Convention,
    /// No key available
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention => write!(f, "environment ({})", API_KEY_ENV_VAR),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Raw upstream config deserialized directly from TOML.
/// api_key is `Option<String>` so it may contain `${VAR}` references not yet expanded.
#[derive(Deserialize)]
pub struct RawUpstreamConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    api_key: Option<String>,
    #[serde(default = "default_text_model")]
    text_model: String,
    #[serde(default = "default_image_model")]
    image_model: String,
    #[serde(default = "default_tts_model")]
    tts_model: String,
}

impl Default for RawUpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            text_model: default_text_model(),
            image_model: default_image_model(),
            tts_model: default_tts_model(),
        }
    }
}

/// Raw configuration deserialized directly from TOML.
/// The api_key value may contain `${VAR}` references not yet expanded.
#[derive(Deserialize, Default)]
pub struct RawConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    upstream: RawUpstreamConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    EnvVar(String),
}

/// Expand all `${VAR}` references in a string using a custom lookup function.
///
/// The closure-based design makes this testable without touching global env
/// state. Supports multiple `${VAR}` in one string. Fails on first missing
/// variable, unclosed `${`, or empty variable name.
fn expand_env_refs<F>(input: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| {
            ConfigError::EnvVar(format!("Unclosed '${{' in config value: {}", input))
        })?;

        let var_name = &after[..end];
        if var_name.is_empty() {
            return Err(ConfigError::EnvVar(
                "Empty variable name in '${}' reference".to_string(),
            ));
        }

        let value = lookup(var_name).ok_or_else(|| {
            ConfigError::EnvVar(format!(
                "Environment variable '{}' is not set (referenced in upstream.api_key)",
                var_name
            ))
        })?;

        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

impl Config {
    /// Convert raw (deserialized) config to final config, resolving the
    /// credential through `lookup`:
    /// - `api_key` contains `${VAR}`: expand, source = `EnvExpanded`
    /// - `api_key` is a literal string: wrap directly, source = `Literal`
    /// - `api_key` absent: consult `GEMINI_API_KEY`, source = `Convention`
    ///   or `KeySource::None`
    pub fn resolve_with<F>(raw: RawConfig, lookup: F) -> Result<(Self, KeySource), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (api_key, source) = match raw.upstream.api_key {
            Some(ref raw_key) if raw_key.contains("${") => {
                let expanded = expand_env_refs(raw_key, &lookup)?;
                (Some(ApiKey::from(expanded)), KeySource::EnvExpanded)
            }
            Some(ref raw_key) => (Some(ApiKey::from(raw_key.as_str())), KeySource::Literal),
            None => match lookup(API_KEY_ENV_VAR) {
                Some(value) => (Some(ApiKey::from(value)), KeySource::Convention),
                None => (None, KeySource::None),
            },
        };

        let config = Config {
            server: raw.server,
            upstream: UpstreamConfig {
                base_url: raw.upstream.base_url.trim_end_matches('/').to_string(),
                api_key,
                text_model: raw.upstream.text_model,
                image_model: raw.upstream.image_model,
                tts_model: raw.upstream.tts_model,
            },
            logging: raw.logging,
        };
        config.validate()?;

        Ok((config, source))
    }

    /// Resolve a raw config against the real process environment.
    pub fn resolve(raw: RawConfig) -> Result<(Self, KeySource), ConfigError> {
        Self::resolve_with(raw, |name| std::env::var(name).ok())
    }

    /// Build a config from defaults and the process environment alone,
    /// for deployments that carry no config file.
    pub fn from_env() -> Result<(Self, KeySource), ConfigError> {
        Self::resolve(RawConfig::default())
    }

    /// Parse configuration from a TOML string, resolving the credential
    /// against the process environment.
    pub fn parse_str(content: &str) -> Result<(Self, KeySource), ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        Self::resolve(raw)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, KeySource), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::parse_str(&content)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "upstream.base_url must not be empty".to_string(),
            ));
        }

        for (field, value) in [
            ("upstream.text_model", &self.upstream.text_model),
            ("upstream.image_model", &self.upstream.image_model),
            ("upstream.tts_model", &self.upstream.tts_model),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        Ok(())
    }
}
