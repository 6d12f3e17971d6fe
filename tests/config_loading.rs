//! Integration tests for the Config::load pipeline.
//!
//! Exercises the end-to-end flow: TOML file -> raw parse -> credential
//! resolution -> final Config with KeySource metadata. Env-dependent
//! resolution paths are covered by closure-based unit tests in src/config.rs;
//! these tests stick to literal keys so they stay safe under parallel
//! execution.

use gembridge::config::{Config, KeySource};

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("write temp config");
    path
}

#[test]
fn test_load_literal_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
listen = "127.0.0.1:19876"

[upstream]
base_url = "https://mock.test"
api_key = "gm-literal-key"
"#,
    );

    let (config, source) = Config::load(&path).expect("load should succeed");
    assert_eq!(config.server.listen, "127.0.0.1:19876");
    assert_eq!(config.upstream.base_url, "https://mock.test");
    assert_eq!(source, KeySource::Literal);
    assert_eq!(
        config.upstream.api_key.as_ref().unwrap().expose_secret(),
        "gm-literal-key"
    );
}

#[test]
fn test_load_minimal_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[upstream]\napi_key = \"k\"\n");

    let (config, _) = Config::load(&path).expect("load should succeed");
    assert_eq!(config.server.listen, "127.0.0.1:8080");
    assert_eq!(
        config.upstream.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.upstream.text_model, "gemini-2.5-flash");
}

#[test]
fn test_load_missing_file_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let err = Config::load(&path).unwrap_err();
    assert!(
        err.to_string().contains("does-not-exist.toml"),
        "Error should name the file: {}",
        err
    );
}

#[test]
fn test_load_invalid_toml_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[server\nlisten = ");

    let err = Config::load(&path).unwrap_err();
    assert!(
        err.to_string().contains("parse"),
        "Error should mention parsing: {}",
        err
    );
}

#[test]
fn test_load_validation_failure_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[upstream]
base_url = ""
api_key = "k"
"#,
    );

    let err = Config::load(&path).unwrap_err();
    assert!(
        err.to_string().contains("base_url"),
        "Error should name the field: {}",
        err
    );
}
