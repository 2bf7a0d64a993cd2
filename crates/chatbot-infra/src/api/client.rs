//! BackendApiClient -- HTTP client for the chat backend.
//!
//! Every request asks the [`TokenSource`] for a bearer token right before it
//! is sent. Responses are decoded and validated at the boundary; callers only
//! ever see fully populated records or an [`ApiError`]. Each call runs in a
//! `backend.*` span.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use chatbot_core::token::TokenSource;
use chatbot_core::validation::{decode_response, Validate};
use chatbot_types::chat::{
    ChatRequest, ChatResponse, HealthStatus, HistoryResult, DEFAULT_HISTORY_LIMIT,
};
use chatbot_types::config::ClientConfig;
use chatbot_types::error::ApiError;

/// Client for the `/chat`, `/history` and `/health` endpoints.
pub struct BackendApiClient<S: TokenSource> {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<S>,
}

impl<S: TokenSource> BackendApiClient<S> {
    /// Create a client bound to `config.api_endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEndpoint`] unless the endpoint is an
    /// absolute `http`/`https` URL.
    pub fn new(config: &ClientConfig, tokens: Arc<S>) -> Result<Self, ApiError> {
        let base_url = Self::validate_endpoint(&config.api_endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("chatbot-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn validate_endpoint(endpoint: &str) -> Result<String, ApiError> {
        let endpoint = endpoint.trim();
        let invalid = |reason: String| ApiError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        if endpoint.is_empty() {
            return Err(invalid("no endpoint configured".to_string()));
        }
        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        Ok(endpoint.trim_end_matches('/').to_string())
    }

    /// Attach the bearer token, if the token source has one right now.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.auth_token().await {
            Some(token) => request.bearer_auth(token),
            None => {
                tracing::debug!("no auth token available, sending request unauthenticated");
                request
            }
        }
    }

    /// Send a prepared request and decode its body as `T`.
    async fn execute<T>(&self, path: &str, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(path = %path, status = %status, bytes = body.len(), "backend response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        decode_response(path, &body)
    }

    /// `POST /chat`.
    ///
    /// Without a `conversation_id` the backend starts a new conversation and
    /// returns its id.
    #[tracing::instrument(
        name = "backend.send_message",
        skip_all,
        fields(conversation_id = request.conversation_id.as_deref().unwrap_or(""))
    )]
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let request_builder = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(request);
        self.execute("/chat", request_builder).await
    }

    /// `GET /history`.
    #[tracing::instrument(
        name = "backend.get_history",
        skip_all,
        fields(limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    )]
    pub async fn get_history(
        &self,
        conversation_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<HistoryResult, ApiError> {
        let request_builder = self
            .client
            .get(format!("{}/history", self.base_url))
            .query(&history_query(conversation_id, limit));
        self.execute("/history", request_builder).await
    }

    /// `GET /health`.
    #[tracing::instrument(name = "backend.health_check", skip_all)]
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let request_builder = self.client.get(format!("{}/health", self.base_url));
        self.execute("/health", request_builder).await
    }
}

/// Query pairs for `/history`. `conversation_id` is left out entirely when
/// absent or empty.
fn history_query(
    conversation_id: Option<&str>,
    limit: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("limit", limit.unwrap_or(DEFAULT_HISTORY_LIMIT).to_string())];
    if let Some(id) = conversation_id.filter(|id| !id.is_empty()) {
        query.push(("conversation_id", id.to_string()));
    }
    query
}
