//! Session/identity service.
//!
//! `AuthService` is the façade the rest of the client talks to. It turns
//! email/password calls into provider requests and reports every outcome as
//! a `Result<T, AuthError>`; nothing panics or escapes past it.
//!
//! Each operation runs in an `auth.*` span tagged with the provider name.
//! Failures are logged at `warn` with the operation name. The current-user
//! lookup is the exception: "nobody signed in" is a normal answer there, so it
//! logs at `debug`.

use secrecy::{ExposeSecret, SecretString};

use chatbot_types::error::AuthError;
use chatbot_types::identity::{
    AuthUser, SignInResult, SignUpRequest, SignUpResult, UserAttribute,
};

use super::provider::IdentityProvider;
use crate::token::TokenSource;

/// Identity façade over an [`IdentityProvider`].
pub struct AuthService<P: IdentityProvider> {
    provider: P,
}

impl<P: IdentityProvider> AuthService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Register a new user. `email` is both the username and the `email`
    /// attribute.
    #[tracing::instrument(
        name = "auth.sign_up",
        skip_all,
        fields(provider = self.provider.name())
    )]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SignUpResult, AuthError> {
        let request = SignUpRequest {
            username: email.to_string(),
            password: SecretString::from(password.expose_secret().to_string()),
            attributes: vec![UserAttribute {
                name: "email".to_string(),
                value: email.to_string(),
            }],
        };

        self.provider
            .sign_up(&request)
            .await
            .inspect(|result| tracing::info!(user_id = %result.user_id, "user registered"))
            .inspect_err(|e| tracing::warn!(kind = %e.kind, error = %e, "sign up failed"))
    }

    /// Submit the verification code for a pending registration.
    #[tracing::instrument(
        name = "auth.confirm_sign_up",
        skip_all,
        fields(provider = self.provider.name())
    )]
    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError> {
        self.provider
            .confirm_sign_up(email, code)
            .await
            .inspect_err(|e| {
                tracing::warn!(kind = %e.kind, error = %e, "confirm sign up failed")
            })
    }

    /// Authenticate. The provider's result (including any further-step
    /// challenge) is passed through uninterpreted.
    #[tracing::instrument(
        name = "auth.sign_in",
        skip_all,
        fields(provider = self.provider.name())
    )]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SignInResult, AuthError> {
        self.provider
            .sign_in(email, password)
            .await
            .inspect(|result| tracing::info!(signed_in = result.is_signed_in, "sign in completed"))
            .inspect_err(|e| tracing::warn!(kind = %e.kind, error = %e, "sign in failed"))
    }

    /// End the current session.
    #[tracing::instrument(
        name = "auth.sign_out",
        skip_all,
        fields(provider = self.provider.name())
    )]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider
            .sign_out()
            .await
            .inspect(|_| tracing::info!("signed out"))
            .inspect_err(|e| tracing::warn!(kind = %e.kind, error = %e, "sign out failed"))
    }

    /// The signed-in user, or an error when there is none.
    #[tracing::instrument(
        name = "auth.get_current_user",
        skip_all,
        fields(provider = self.provider.name())
    )]
    pub async fn get_current_user(&self) -> Result<AuthUser, AuthError> {
        self.provider
            .current_user()
            .await
            .inspect_err(|e| tracing::debug!(kind = %e.kind, error = %e, "no current user"))
    }

    /// The current identity token, or `None` when it cannot be obtained.
    ///
    /// `None` is not an error: callers send their request unauthenticated.
    #[tracing::instrument(
        name = "auth.get_auth_token",
        skip_all,
        fields(provider = self.provider.name())
    )]
    pub async fn get_auth_token(&self) -> Option<String> {
        match self.provider.fetch_session().await {
            Ok(session) => session
                .tokens
                .map(|tokens| tokens.id_token.expose_secret().to_string()),
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e, "get auth token failed");
                None
            }
        }
    }

    /// Whether a user is signed in; derived solely from [`Self::get_current_user`].
    pub async fn is_authenticated(&self) -> bool {
        self.get_current_user().await.is_ok()
    }
}

impl<P: IdentityProvider> TokenSource for AuthService<P> {
    async fn auth_token(&self) -> Option<String> {
        self.get_auth_token().await
    }
}
