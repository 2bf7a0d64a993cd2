//! IdentityProvider trait definition.
//!
//! The port every identity backend implements. Uses native async fn in
//! traits (RPITIT) with `Send` futures so services can be shared across
//! tokio tasks.

use secrecy::SecretString;

use chatbot_types::error::AuthError;
use chatbot_types::identity::{AuthSession, AuthUser, SignInResult, SignUpRequest, SignUpResult};

/// Trait for external identity providers.
///
/// Implementations hold whatever session state the provider needs (tokens
/// issued at sign-in) and report every failure as an [`AuthError`].
///
/// Implementations live in chatbot-infra (e.g., `CognitoIdentityProvider`).
pub trait IdentityProvider: Send + Sync {
    /// Human-readable provider name (e.g., "cognito").
    fn name(&self) -> &str;

    /// Register a new identity.
    fn sign_up(
        &self,
        request: &SignUpRequest,
    ) -> impl std::future::Future<Output = Result<SignUpResult, AuthError>> + Send;

    /// Submit the verification code for a pending registration.
    fn confirm_sign_up(
        &self,
        username: &str,
        code: &str,
    ) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;

    /// Authenticate and, when no further step is required, hold the session.
    fn sign_in(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl std::future::Future<Output = Result<SignInResult, AuthError>> + Send;

    /// Terminate the current session.
    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;

    /// The signed-in identity, or `AuthErrorKind::NoSession`.
    fn current_user(&self) -> impl std::future::Future<Output = Result<AuthUser, AuthError>> + Send;

    /// Snapshot of the current session's tokens.
    fn fetch_session(
        &self,
    ) -> impl std::future::Future<Output = Result<AuthSession, AuthError>> + Send;
}
