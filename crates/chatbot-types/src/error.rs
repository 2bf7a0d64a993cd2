use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of an identity-operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    /// Wrong password or unknown user.
    InvalidCredentials,
    /// The account exists but the sign-up code was never confirmed.
    UserNotConfirmed,
    /// An account with this username already exists.
    UserExists,
    /// Wrong or expired confirmation code.
    InvalidCode,
    /// Rejected input (password policy, malformed email, ...).
    InvalidParameter,
    /// The provider throttled the request.
    RateLimited,
    /// Nobody is signed in.
    NoSession,
    /// A session is already held; sign out first.
    AlreadySignedIn,
    /// The provider could not be reached.
    NetworkFailure,
    Unknown,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthErrorKind::InvalidCredentials => write!(f, "invalid_credentials"),
            AuthErrorKind::UserNotConfirmed => write!(f, "user_not_confirmed"),
            AuthErrorKind::UserExists => write!(f, "user_exists"),
            AuthErrorKind::InvalidCode => write!(f, "invalid_code"),
            AuthErrorKind::InvalidParameter => write!(f, "invalid_parameter"),
            AuthErrorKind::RateLimited => write!(f, "rate_limited"),
            AuthErrorKind::NoSession => write!(f, "no_session"),
            AuthErrorKind::AlreadySignedIn => write!(f, "already_signed_in"),
            AuthErrorKind::NetworkFailure => write!(f, "network_failure"),
            AuthErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Failure of an identity operation.
///
/// `message` is the provider's own message, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// No signed-in session is held.
    pub fn no_session() -> Self {
        Self::new(AuthErrorKind::NoSession, "User needs to be authenticated to call this API.")
    }

    /// Sign-in attempted while a session is held.
    pub fn already_signed_in() -> Self {
        Self::new(AuthErrorKind::AlreadySignedIn, "There is already a signed in user.")
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::NetworkFailure, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unknown, message)
    }
}

/// Errors from chat backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from {endpoint}: {message}")]
    Validation { endpoint: String, message: String },
}

/// Errors from loading configuration or initializing a component from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },
}
