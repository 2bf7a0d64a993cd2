//! CognitoIdentityProvider -- concrete [`IdentityProvider`] for Amazon Cognito
//! user pools.
//!
//! Talks to the user-pool JSON API (`AWSCognitoIdentityProviderService.*`
//! actions) with an app client that allows `USER_PASSWORD_AUTH`. Tokens
//! issued at sign-in are held in memory for the life of the provider; there
//! is no refresh and nothing is written to disk.
//!
//! Passwords and tokens are wrapped in [`secrecy::SecretString`] and are
//! never logged.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::RwLock;

use chatbot_core::identity::IdentityProvider;
use chatbot_types::config::ClientConfig;
use chatbot_types::error::{AuthError, AuthErrorKind, ConfigError};
use chatbot_types::identity::{
    AuthSession, AuthTokens, AuthUser, CodeDelivery, SignInResult, SignInStep, SignUpRequest,
    SignUpResult,
};

use super::jwt::decode_claims;
use super::types::{
    error_kind, CognitoAttribute, CognitoErrorBody, ConfirmSignUpBody, InitiateAuthBody,
    InitiateAuthResponse, PasswordAuthParameters, RevokeTokenBody, SignUpBody, SignUpResponse,
    USER_PASSWORD_AUTH,
};

/// Tokens and username held after a successful sign-in.
struct CognitoSession {
    username: String,
    id_token: SecretString,
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_in: Option<u64>,
}

/// Amazon Cognito user-pool identity provider.
pub struct CognitoIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    user_pool_id: String,
    region: String,
    session: RwLock<Option<CognitoSession>>,
}

impl CognitoIdentityProvider {
    /// Value of the `X-Amz-Target` header prefix.
    const TARGET_PREFIX: &'static str = "AWSCognitoIdentityProviderService";

    /// Content type of the user-pool JSON protocol.
    const CONTENT_TYPE: &'static str = "application/x-amz-json-1.1";

    /// Create a provider from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the pool id, client id or region
    /// is empty, and [`ConfigError::Invalid`] when the HTTP client cannot be
    /// built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        if config.user_pool_id.trim().is_empty() {
            return Err(ConfigError::Missing("user_pool_id"));
        }
        if config.user_pool_client_id.trim().is_empty() {
            return Err(ConfigError::Missing("user_pool_client_id"));
        }
        if config.region.trim().is_empty() {
            return Err(ConfigError::Missing("region"));
        }

        let region = Self::effective_region(&config.user_pool_id, &config.region);
        let client = reqwest::Client::builder()
            .user_agent(concat!("chatbot-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "http_client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: format!("https://cognito-idp.{region}.amazonaws.com"),
            client_id: config.user_pool_client_id.trim().to_string(),
            user_pool_id: config.user_pool_id.trim().to_string(),
            region,
            session: RwLock::new(None),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Pick the region hosting the pool.
    ///
    /// Pool ids are `<region>_<suffix>`. When the prefix disagrees with the
    /// configured region the prefix wins (with a warning), since requests to
    /// any other region fail with `ResourceNotFoundException`.
    fn effective_region(user_pool_id: &str, configured: &str) -> String {
        let configured = configured.trim();
        match user_pool_id.trim().split_once('_') {
            Some((prefix, _)) if !prefix.is_empty() && prefix != configured => {
                tracing::warn!(
                    configured = %configured,
                    pool_region = %prefix,
                    "Configured region does not match the user pool id, using the pool's region"
                );
                prefix.to_string()
            }
            _ => configured.to_string(),
        }
    }

    /// Send one user-pool action and decode the response body.
    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| AuthError::unknown(format!("failed to encode request: {e}")))?;

        tracing::debug!(action = %action, url = %self.base_url, "Cognito request");

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .header("Content-Type", Self::CONTENT_TYPE)
            .header("X-Amz-Target", format!("{}.{action}", Self::TARGET_PREFIX))
            .body(payload)
            .send()
            .await
            .map_err(|e| AuthError::network(format!("identity provider unreachable: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthError::network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let error_body: Option<CognitoErrorBody> = serde_json::from_slice(&bytes).ok();
            let (kind, name) = match error_body.as_ref().and_then(|b| b.name()) {
                Some(name) => (error_kind(name), name.to_string()),
                None => (AuthErrorKind::Unknown, format!("HTTP {status}")),
            };
            let message = error_body
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| name.clone());

            tracing::debug!(
                action = %action,
                status = %status,
                error = %name,
                "Cognito error response"
            );
            return Err(AuthError::new(kind, message));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            AuthError::unknown(format!("unexpected response from identity provider: {e}"))
        })
    }
}

// CognitoIdentityProvider intentionally does NOT derive Debug: it holds
// session tokens.

impl IdentityProvider for CognitoIdentityProvider {
    fn name(&self) -> &str {
        "cognito"
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpResult, AuthError> {
        let body = SignUpBody {
            client_id: &self.client_id,
            username: &request.username,
            password: request.password.expose_secret(),
            user_attributes: request
                .attributes
                .iter()
                .map(|a| CognitoAttribute {
                    name: &a.name,
                    value: &a.value,
                })
                .collect(),
        };

        let resp: SignUpResponse = self.call("SignUp", &body).await?;

        Ok(SignUpResult {
            user_id: resp.user_sub,
            user_confirmed: resp.user_confirmed,
            code_delivery: resp.code_delivery_details.map(|d| CodeDelivery {
                destination: d.destination,
                delivery_medium: d.delivery_medium,
                attribute_name: d.attribute_name,
            }),
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AuthError> {
        let body = ConfirmSignUpBody {
            client_id: &self.client_id,
            username,
            confirmation_code: code,
        };
        let _: IgnoredAny = self.call("ConfirmSignUp", &body).await?;
        Ok(())
    }

    async fn sign_in(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SignInResult, AuthError> {
        if self.session.read().await.is_some() {
            return Err(AuthError::already_signed_in());
        }

        let body = InitiateAuthBody {
            auth_flow: USER_PASSWORD_AUTH,
            client_id: &self.client_id,
            auth_parameters: PasswordAuthParameters {
                username,
                password: password.expose_secret(),
            },
        };

        let resp: InitiateAuthResponse = self.call("InitiateAuth", &body).await?;

        if let Some(result) = resp.authentication_result {
            let (Some(id_token), Some(access_token)) = (result.id_token, result.access_token)
            else {
                return Err(AuthError::unknown(
                    "identity provider returned an incomplete token set",
                ));
            };

            *self.session.write().await = Some(CognitoSession {
                username: username.to_string(),
                id_token: SecretString::from(id_token),
                access_token: SecretString::from(access_token),
                refresh_token: result.refresh_token.map(SecretString::from),
                expires_in: result.expires_in,
            });
            return Ok(SignInResult::signed_in());
        }

        match resp.challenge_name {
            Some(name) => Ok(SignInResult {
                is_signed_in: false,
                next_step: SignInStep::Challenge {
                    name,
                    parameters: resp.challenge_parameters,
                },
            }),
            None => Err(AuthError::unknown(
                "identity provider returned neither tokens nor a challenge",
            )),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // The local session is dropped even if revocation fails below.
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        if let Some(refresh_token) = &session.refresh_token {
            let body = RevokeTokenBody {
                token: refresh_token.expose_secret(),
                client_id: &self.client_id,
            };
            let _: IgnoredAny = self.call("RevokeToken", &body).await?;
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<AuthUser, AuthError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or_else(AuthError::no_session)?;

        let claims = decode_claims(session.id_token.expose_secret())
            .ok_or_else(|| AuthError::unknown("identity token could not be decoded"))?;

        Ok(AuthUser {
            username: claims.username.unwrap_or_else(|| session.username.clone()),
            user_id: claims.sub,
            email: claims.email,
        })
    }

    async fn fetch_session(&self) -> Result<AuthSession, AuthError> {
        let guard = self.session.read().await;
        let tokens = guard.as_ref().map(|s| AuthTokens {
            id_token: SecretString::from(s.id_token.expose_secret().to_string()),
            access_token: SecretString::from(s.access_token.expose_secret().to_string()),
            refresh_token: s
                .refresh_token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret().to_string())),
            expires_in: s.expires_in,
        });
        Ok(AuthSession { tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use base64::Engine;
    use serde_json::{json, Value};

    use chatbot_types::identity::UserAttribute;

    /// (X-Amz-Target, Content-Type, body) of every request the fake received.
    type Captured = Arc<Mutex<Vec<(String, String, Value)>>>;

    fn jwt(claims: Value) -> String {
        let enc = |v: &str| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(v);
        format!(
            "{}.{}.signature",
            enc(r#"{"alg":"RS256","kid":"test"}"#),
            enc(&claims.to_string())
        )
    }

    fn error(name: &str, message: &str) -> (StatusCode, String) {
        (
            StatusCode::BAD_REQUEST,
            json!({"__type": name, "message": message}).to_string(),
        )
    }

    /// Fake user-pool endpoint with one confirmed account.
    async fn fake_cognito(
        State(captured): State<Captured>,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let target = header("x-amz-target");
        let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        captured
            .lock()
            .unwrap()
            .push((target.clone(), header("content-type"), body.clone()));

        match target.as_str() {
            "AWSCognitoIdentityProviderService.SignUp" => {
                if body["Username"] == "ada@example.com" {
                    return error("UsernameExistsException", "User already exists");
                }
                (
                    StatusCode::OK,
                    json!({
                        "UserSub": "5f1c-new-sub",
                        "UserConfirmed": false,
                        "CodeDeliveryDetails": {
                            "Destination": "g***@e***",
                            "DeliveryMedium": "EMAIL",
                            "AttributeName": "email"
                        }
                    })
                    .to_string(),
                )
            }
            "AWSCognitoIdentityProviderService.ConfirmSignUp" => {
                if body["ConfirmationCode"] == "123456" {
                    (StatusCode::OK, "{}".to_string())
                } else {
                    error(
                        "CodeMismatchException",
                        "Invalid verification code provided, please try again.",
                    )
                }
            }
            "AWSCognitoIdentityProviderService.InitiateAuth" => {
                let params = &body["AuthParameters"];
                if params["PASSWORD"] != "correct horse" {
                    return error("NotAuthorizedException", "Incorrect username or password.");
                }
                if params["USERNAME"] == "temp@example.com" {
                    return (
                        StatusCode::OK,
                        json!({
                            "ChallengeName": "NEW_PASSWORD_REQUIRED",
                            "Session": "opaque",
                            "ChallengeParameters": {"USER_ID_FOR_SRP": "temp"}
                        })
                        .to_string(),
                    );
                }
                let id_token = jwt(json!({
                    "sub": "ada-sub",
                    "cognito:username": "ada-sub",
                    "email": params["USERNAME"]
                }));
                (
                    StatusCode::OK,
                    json!({
                        "AuthenticationResult": {
                            "IdToken": id_token,
                            "AccessToken": "access-token",
                            "RefreshToken": "refresh-token",
                            "ExpiresIn": 3600,
                            "TokenType": "Bearer"
                        },
                        "ChallengeParameters": {}
                    })
                    .to_string(),
                )
            }
            "AWSCognitoIdentityProviderService.RevokeToken" => (StatusCode::OK, "{}".to_string()),
            _ => (StatusCode::BAD_REQUEST, "not json".to_string()),
        }
    }

    async fn spawn_fake() -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/", post(fake_cognito))
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn test_config() -> ClientConfig {
        ClientConfig {
            api_endpoint: "https://api.example.com".to_string(),
            user_pool_id: "eu-west-1_TestPool".to_string(),
            user_pool_client_id: "test-client-id".to_string(),
            region: "eu-west-1".to_string(),
        }
    }

    async fn make_provider() -> (CognitoIdentityProvider, Captured) {
        let (url, captured) = spawn_fake().await;
        let provider = CognitoIdentityProvider::new(&test_config())
            .unwrap()
            .with_base_url(url);
        (provider, captured)
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_new_requires_pool_settings() {
        let mut config = test_config();
        config.user_pool_client_id = String::new();
        assert!(matches!(
            CognitoIdentityProvider::new(&config),
            Err(ConfigError::Missing("user_pool_client_id"))
        ));

        let mut config = test_config();
        config.user_pool_id = "  ".to_string();
        assert!(matches!(
            CognitoIdentityProvider::new(&config),
            Err(ConfigError::Missing("user_pool_id"))
        ));
    }

    #[test]
    fn test_endpoint_url_from_region() {
        let provider = CognitoIdentityProvider::new(&test_config()).unwrap();
        assert_eq!(provider.base_url, "https://cognito-idp.eu-west-1.amazonaws.com");
        assert_eq!(provider.region(), "eu-west-1");
        assert_eq!(provider.user_pool_id(), "eu-west-1_TestPool");
    }

    #[test]
    fn test_pool_id_region_wins() {
        let mut config = test_config();
        config.user_pool_id = "us-east-1_Other".to_string();
        let provider = CognitoIdentityProvider::new(&config).unwrap();
        assert_eq!(provider.region(), "us-east-1");
        assert!(provider.base_url.contains("us-east-1"));
    }

    #[tokio::test]
    async fn test_sign_up_sends_email_attribute() {
        let (provider, captured) = make_provider().await;
        let request = SignUpRequest {
            username: "grace@example.com".to_string(),
            password: secret("correct horse"),
            attributes: vec![UserAttribute {
                name: "email".to_string(),
                value: "grace@example.com".to_string(),
            }],
        };

        let result = provider.sign_up(&request).await.unwrap();
        assert_eq!(result.user_id, "5f1c-new-sub");
        assert!(!result.user_confirmed);
        assert_eq!(
            result.code_delivery.unwrap().delivery_medium.as_deref(),
            Some("EMAIL")
        );

        let captured = captured.lock().unwrap();
        let (target, content_type, body) = &captured[0];
        assert_eq!(target, "AWSCognitoIdentityProviderService.SignUp");
        assert_eq!(content_type, "application/x-amz-json-1.1");
        assert_eq!(body["ClientId"], "test-client-id");
        assert_eq!(body["Username"], "grace@example.com");
        assert_eq!(
            body["UserAttributes"],
            json!([{"Name": "email", "Value": "grace@example.com"}])
        );
    }

    #[tokio::test]
    async fn test_sign_up_existing_user() {
        let (provider, _) = make_provider().await;
        let request = SignUpRequest {
            username: "ada@example.com".to_string(),
            password: secret("correct horse"),
            attributes: Vec::new(),
        };
        let err = provider.sign_up(&request).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::UserExists);
        assert_eq!(err.message, "User already exists");
    }

    #[tokio::test]
    async fn test_confirm_sign_up() {
        let (provider, captured) = make_provider().await;
        provider
            .confirm_sign_up("grace@example.com", "123456")
            .await
            .unwrap();
        assert_eq!(captured.lock().unwrap()[0].2["ConfirmationCode"], "123456");

        let err = provider
            .confirm_sign_up("grace@example.com", "999999")
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidCode);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let (provider, _) = make_provider().await;
        let err = provider
            .sign_in("ada@example.com", &secret("wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);
        assert_eq!(err.message, "Incorrect username or password.");
        assert!(provider.fetch_session().await.unwrap().tokens.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_holds_session() {
        let (provider, captured) = make_provider().await;
        let result = provider
            .sign_in("ada@example.com", &secret("correct horse"))
            .await
            .unwrap();
        assert!(result.is_signed_in);
        assert_eq!(result.next_step, SignInStep::Done);
        assert_eq!(
            captured.lock().unwrap()[0].2["AuthFlow"],
            "USER_PASSWORD_AUTH"
        );

        let session = provider.fetch_session().await.unwrap();
        let tokens = session.tokens.unwrap();
        assert_eq!(tokens.access_token.expose_secret(), "access-token");
        assert!(tokens.id_token.expose_secret().ends_with(".signature"));
        assert_eq!(tokens.expires_in, Some(3600));

        let user = provider.current_user().await.unwrap();
        assert_eq!(user.user_id, "ada-sub");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_second_sign_in_refused_until_sign_out() {
        let (provider, captured) = make_provider().await;
        provider
            .sign_in("ada@example.com", &secret("correct horse"))
            .await
            .unwrap();

        let err = provider
            .sign_in("grace@example.com", &secret("correct horse"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::AlreadySignedIn);

        let initiate_count = |captured: &Captured| {
            captured
                .lock()
                .unwrap()
                .iter()
                .filter(|(target, _, _)| target.ends_with(".InitiateAuth"))
                .count()
        };
        assert_eq!(initiate_count(&captured), 1);
        let user = provider.current_user().await.unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));

        provider.sign_out().await.unwrap();
        provider
            .sign_in("grace@example.com", &secret("correct horse"))
            .await
            .unwrap();
        assert_eq!(initiate_count(&captured), 2);
        let user = provider.current_user().await.unwrap();
        assert_eq!(user.email.as_deref(), Some("grace@example.com"));
    }

    #[tokio::test]
    async fn test_sign_in_challenge_not_signed_in() {
        let (provider, _) = make_provider().await;
        let result = provider
            .sign_in("temp@example.com", &secret("correct horse"))
            .await
            .unwrap();
        assert!(!result.is_signed_in);
        match result.next_step {
            SignInStep::Challenge { name, parameters } => {
                assert_eq!(name, "NEW_PASSWORD_REQUIRED");
                assert_eq!(parameters.get("USER_ID_FOR_SRP").map(String::as_str), Some("temp"));
            }
            other => panic!("expected challenge, got {other:?}"),
        }
        let err = provider.current_user().await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::NoSession);
    }

    #[tokio::test]
    async fn test_sign_out_revokes_and_clears() {
        let (provider, captured) = make_provider().await;
        provider
            .sign_in("ada@example.com", &secret("correct horse"))
            .await
            .unwrap();
        provider.sign_out().await.unwrap();

        {
            let captured = captured.lock().unwrap();
            let (target, _, body) = captured.last().unwrap();
            assert_eq!(target, "AWSCognitoIdentityProviderService.RevokeToken");
            assert_eq!(body["Token"], "refresh-token");
        }
        assert!(provider.fetch_session().await.unwrap().tokens.is_none());
        assert!(provider.current_user().await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_ok() {
        let (provider, captured) = make_provider().await;
        provider.sign_out().await.unwrap();
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_failure() {
        let provider = CognitoIdentityProvider::new(&test_config())
            .unwrap()
            .with_base_url("http://127.0.0.1:1".to_string());
        let err = provider
            .sign_in("ada@example.com", &secret("correct horse"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::NetworkFailure);
        assert!(!err.message.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let (provider, _) = make_provider().await;
        let err: AuthError = provider
            .call::<_, IgnoredAny>("DeleteUser", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::Unknown);
        assert_eq!(err.message, "HTTP 400 Bad Request");
    }
}
