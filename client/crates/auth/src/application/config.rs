//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::config::{ClientConfig, DEFAULT_TOKEN_STORAGE_KEY};

/// Auth application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Durable storage key holding the raw bearer token
    pub token_storage_key: String,
    /// Landing page after a successful login
    pub home_path: String,
    /// Where unauthenticated visitors are sent
    pub login_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            home_path: "/".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

impl From<&ClientConfig> for AuthConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            token_storage_key: config.token_storage_key.clone(),
            ..Self::default()
        }
    }
}
