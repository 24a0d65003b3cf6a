use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::user::OAuthProvider;

/// Environment variable that overrides the data directory for the embedded backend.
pub const DATA_DIR_ENV: &str = "SMARTBOOKMARKS_DATA_DIR";

/// Default realtime channel name.
pub const DEFAULT_REALTIME_CHANNEL: &str = "bookmarks-realtime";

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub realtime_channel: String,
    pub oauth_provider: OAuthProvider,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            realtime_channel: DEFAULT_REALTIME_CHANNEL.to_string(),
            oauth_provider: OAuthProvider::default(),
        }
    }
}

/// Where the `bookmarks` table lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Embedded SQLite table.
    Sqlite { path: String },
    /// PostgREST endpoint (e.g. a Supabase project URL) plus its anon key.
    Rest { base_url: String, api_key: String },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Sqlite {
            path: default_data_dir()
                .join("smartbookmarks.db")
                .to_string_lossy()
                .to_string(),
        }
    }
}

/// `$SMARTBOOKMARKS_DATA_DIR`, falling back to the platform data dir, then the working directory.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("smartbookmarks"))
        .unwrap_or_else(|| PathBuf::from("."))
}
