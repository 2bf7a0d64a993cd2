//! Amazon Cognito user-pool identity provider.

pub mod client;
pub mod jwt;
pub mod types;

pub use client::CognitoIdentityProvider;

use chatbot_types::config::ClientConfig;
use chatbot_types::error::ConfigError;

/// Build the identity provider from configuration.
///
/// Called once at startup, before any identity operation.
pub fn init_identity_provider(
    config: &ClientConfig,
) -> Result<CognitoIdentityProvider, ConfigError> {
    let provider = CognitoIdentityProvider::new(config)?;
    tracing::info!(
        user_pool_id = %provider.user_pool_id(),
        region = %provider.region(),
        "identity provider initialized"
    );
    Ok(provider)
}
