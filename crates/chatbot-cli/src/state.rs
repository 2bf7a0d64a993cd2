//! Application state wiring the identity service and backend client together.

use std::sync::Arc;

use chatbot_core::identity::AuthService;
use chatbot_infra::api::BackendApiClient;
use chatbot_infra::cognito::{init_identity_provider, CognitoIdentityProvider};
use chatbot_types::config::ClientConfig;

/// Identity service pinned to the Cognito provider.
pub type ConcreteAuthService = AuthService<CognitoIdentityProvider>;

/// Backend client that authenticates with the concrete identity service.
pub type ConcreteApiClient = BackendApiClient<ConcreteAuthService>;

/// Shared state for commands that need an identity.
pub struct AppState {
    pub config: ClientConfig,
    pub auth: Arc<ConcreteAuthService>,
}

impl AppState {
    /// Initialize the identity provider from `config`.
    pub fn init(config: ClientConfig) -> anyhow::Result<Self> {
        let provider = init_identity_provider(&config)?;
        Ok(Self {
            config,
            auth: Arc::new(AuthService::new(provider)),
        })
    }

    /// Backend client whose requests carry this state's session token.
    pub fn api_client(&self) -> anyhow::Result<ConcreteApiClient> {
        Ok(BackendApiClient::new(&self.config, Arc::clone(&self.auth))?)
    }
}
