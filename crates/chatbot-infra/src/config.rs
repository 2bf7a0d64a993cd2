//! Client configuration loader.
//!
//! Builds a [`ClientConfig`] from built-in defaults, an optional TOML file
//! and `CHATBOT_*` environment variables, in that order of precedence. A
//! broken config file never stops the client: it is reported and the
//! defaults are used instead.

use std::path::Path;

use chatbot_types::config::ClientConfig;
use chatbot_types::error::ConfigError;

pub const ENV_API_ENDPOINT: &str = "CHATBOT_API_ENDPOINT";
pub const ENV_USER_POOL_ID: &str = "CHATBOT_USER_POOL_ID";
pub const ENV_USER_POOL_CLIENT_ID: &str = "CHATBOT_USER_POOL_CLIENT_ID";
pub const ENV_REGION: &str = "CHATBOT_REGION";

/// Load the client configuration.
///
/// - Without `file`, or when the file does not exist, starts from
///   [`ClientConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   starts from the default.
/// - Environment variables are applied last.
pub async fn load_client_config(file: Option<&Path>) -> ClientConfig {
    let base = match file {
        Some(path) => match read_config_file(path).await {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) if !path.exists() => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                ClientConfig::default()
            }
            Err(err) => {
                tracing::warn!("{err}, using defaults");
                ClientConfig::default()
            }
        },
        None => ClientConfig::default(),
    };

    apply_env(base, |key| std::env::var(key).ok())
}

/// Read and parse a TOML config file.
pub async fn read_config_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Overlay environment values onto `config`. Empty values count as unset.
pub fn apply_env<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_API_ENDPOINT) {
        config.api_endpoint = v;
    }
    if let Some(v) = get(ENV_USER_POOL_ID) {
        config.user_pool_id = v;
    }
    if let Some(v) = get(ENV_USER_POOL_CLIENT_ID) {
        config.user_pool_client_id = v;
    }
    if let Some(v) = get(ENV_REGION) {
        config.region = v;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn read_config_file_valid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chatbot.toml");
        tokio::fs::write(
            &path,
            r#"
api_endpoint = "https://api.example.com/prod"
user_pool_id = "eu-west-1_AbCdEf123"
user_pool_client_id = "client-123"
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(&path).await.unwrap();
        assert_eq!(config.api_endpoint, "https://api.example.com/prod");
        assert_eq!(config.user_pool_id, "eu-west-1_AbCdEf123");
        assert_eq!(config.user_pool_client_id, "client-123");
        assert_eq!(config.region, "eu-west-1");
    }

    #[tokio::test]
    async fn read_config_file_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        assert!(matches!(
            read_config_file(&missing).await,
            Err(ConfigError::Read { .. })
        ));

        let bad = tmp.path().join("bad.toml");
        tokio::fs::write(&bad, "this is not { valid toml !!!")
            .await
            .unwrap();
        assert!(matches!(
            read_config_file(&bad).await,
            Err(ConfigError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn load_client_config_invalid_toml_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("chatbot.toml");
        tokio::fs::write(&path, "region = [").await.unwrap();

        let config = load_client_config(Some(&path)).await;
        // Only the environment can have contributed values.
        assert_eq!(config, apply_env(ClientConfig::default(), |k| std::env::var(k).ok()));
    }

    #[tokio::test]
    async fn load_client_config_missing_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(Some(&tmp.path().join("nope.toml"))).await;
        assert_eq!(config, apply_env(ClientConfig::default(), |k| std::env::var(k).ok()));
    }

    #[test]
    fn apply_env_overrides_file_values() {
        let base = ClientConfig {
            api_endpoint: "https://file.example.com".to_string(),
            region: "us-east-1".to_string(),
            ..ClientConfig::default()
        };
        let config = apply_env(
            base,
            env(&[
                (ENV_API_ENDPOINT, "https://env.example.com"),
                (ENV_USER_POOL_CLIENT_ID, "env-client"),
            ]),
        );
        assert_eq!(config.api_endpoint, "https://env.example.com");
        assert_eq!(config.user_pool_client_id, "env-client");
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn apply_env_ignores_empty_values() {
        let config = apply_env(
            ClientConfig::default(),
            env(&[(ENV_REGION, ""), (ENV_USER_POOL_ID, "  ")]),
        );
        assert_eq!(config.region, "eu-west-1");
        assert!(config.user_pool_id.is_empty());
    }
}
