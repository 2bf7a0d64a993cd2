//! Client configuration.
//!
//! `ClientConfig` carries the backend endpoint and the identity-pool settings.
//! It is assembled once at startup (defaults, optional TOML file, environment)
//! and treated as read-only afterwards.

use serde::{Deserialize, Serialize};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Process-wide configuration for the backend client and identity provider.
///
/// Empty strings mean "not configured"; the components that need a value
/// validate it when they are initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat backend (e.g., `https://api.example.com/prod`).
    #[serde(default)]
    pub api_endpoint: String,

    /// Identity pool id (e.g., `eu-west-1_AbCdEf123`).
    #[serde(default)]
    pub user_pool_id: String,

    /// App client id registered with the identity pool.
    #[serde(default)]
    pub user_pool_client_id: String,

    /// Region hosting the identity pool.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            user_pool_id: String::new(),
            user_pool_client_id: String::new(),
            region: default_region(),
        }
    }
}
