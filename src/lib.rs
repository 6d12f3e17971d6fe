//! gembridge - secret-injecting relay for the Google Generative Language API
//!
//! This library provides the core functionality for the gembridge relay:
//! configuration, the error taxonomy, and the forwarding pipeline with its
//! two hosting bindings.

pub mod config;
pub mod error;
pub mod relay;

pub use config::Config;
pub use error::{Error, Result};
