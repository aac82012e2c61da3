//! Client Configuration
//!
//! Where the API lives and where durable client state is kept.

use std::env;
use std::path::PathBuf;

/// Default API base URL for local development
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Default key under which the bearer token is stored
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "token";

/// Platform configuration shared by all client crates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Sirona API (no trailing slash required)
    pub api_base_url: String,
    /// File backing durable client storage
    pub storage_path: PathBuf,
    /// Storage key holding the raw bearer token
    pub token_storage_key: String,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: PathBuf::from(".sirona").join("storage.json"),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            user_agent: format!("sirona-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Configuration for local development against a dev server
    pub fn development() -> Self {
        Self {
            storage_path: env::temp_dir().join("sirona-dev").join("storage.json"),
            ..Self::default()
        }
    }

    /// Read overrides from the environment
    ///
    /// - `SIRONA_API_URL`
    /// - `SIRONA_STORAGE_PATH`
    /// - `SIRONA_TOKEN_KEY`
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_base_url: non_blank("SIRONA_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            storage_path: non_blank("SIRONA_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            token_storage_key: non_blank("SIRONA_TOKEN_KEY").unwrap_or(defaults.token_storage_key),
            user_agent: defaults.user_agent,
        }
    }
}
