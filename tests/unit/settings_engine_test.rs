//! Unit tests for SettingsEngine.

use std::fs;

use smartbookmarks::services::settings_engine::SettingsEngine;
use smartbookmarks::types::errors::ConfigError;
use smartbookmarks::types::settings::{BackendConfig, ClientConfig, DEFAULT_REALTIME_CHANNEL};
use smartbookmarks::types::user::OAuthProvider;
use tempfile::TempDir;

fn engine_in(dir: &TempDir) -> SettingsEngine {
    SettingsEngine::new(Some(dir.path().join("nested").join("config.json")))
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);

    let config = engine.load().unwrap();

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.realtime_channel, DEFAULT_REALTIME_CHANNEL);
    assert_eq!(config.oauth_provider, OAuthProvider::Google);
    assert!(matches!(config.backend, BackendConfig::Sqlite { .. }));
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    let config = ClientConfig {
        backend: BackendConfig::Rest {
            base_url: "https://proj.supabase.co".to_string(),
            api_key: "anon-key".to_string(),
        },
        realtime_channel: "team-bookmarks".to_string(),
        oauth_provider: OAuthProvider::Github,
    };
    engine.replace(config.clone()).unwrap();
    engine.save().unwrap();

    let mut reloaded = engine_in(&dir);
    assert_eq!(reloaded.load().unwrap(), config);
    assert_eq!(reloaded.settings(), &config);
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"oauth_provider": "github"}"#).unwrap();

    let config = SettingsEngine::new(Some(path)).load().unwrap();

    assert_eq!(config.oauth_provider, OAuthProvider::Github);
    assert_eq!(config.realtime_channel, DEFAULT_REALTIME_CHANNEL);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let result = SettingsEngine::new(Some(path)).load();

    assert!(matches!(result, Err(ConfigError::Serialization(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);

    let empty_channel = ClientConfig {
        realtime_channel: "  ".to_string(),
        ..ClientConfig::default()
    };
    assert!(matches!(
        engine.replace(empty_channel),
        Err(ConfigError::InvalidValue(_))
    ));

    let bad_rest = ClientConfig {
        backend: BackendConfig::Rest {
            base_url: "nope".to_string(),
            api_key: String::new(),
        },
        ..ClientConfig::default()
    };
    assert!(matches!(engine.replace(bad_rest), Err(ConfigError::InvalidValue(_))));

    let path = dir.path().join("sqlite.json");
    fs::write(&path, r#"{"backend": {"kind": "sqlite", "path": ""}}"#).unwrap();
    assert!(matches!(
        SettingsEngine::new(Some(path)).load(),
        Err(ConfigError::InvalidValue(_))
    ));

    assert_eq!(engine.settings(), &ClientConfig::default());
}
