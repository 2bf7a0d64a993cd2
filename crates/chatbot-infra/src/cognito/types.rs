//! Cognito user-pool JSON wire types.
//!
//! Request bodies borrow from the caller; responses own their data. Field
//! names are PascalCase on the wire.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use chatbot_types::error::AuthErrorKind;

/// `AuthFlow` value for username/password sign-in.
pub const USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CognitoAttribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpBody<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub user_attributes: Vec<CognitoAttribute<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpResponse {
    pub user_sub: String,
    #[serde(default)]
    pub user_confirmed: bool,
    pub code_delivery_details: Option<CodeDeliveryDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDeliveryDetails {
    pub destination: Option<String>,
    pub delivery_medium: Option<String>,
    pub attribute_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfirmSignUpBody<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub confirmation_code: &'a str,
}

#[derive(Serialize)]
pub struct PasswordAuthParameters<'a> {
    #[serde(rename = "USERNAME")]
    pub username: &'a str,
    #[serde(rename = "PASSWORD")]
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthBody<'a> {
    pub auth_flow: &'a str,
    pub client_id: &'a str,
    pub auth_parameters: PasswordAuthParameters<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthResponse {
    pub authentication_result: Option<AuthenticationResult>,
    pub challenge_name: Option<String>,
    #[serde(default)]
    pub challenge_parameters: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

impl fmt::Debug for AuthenticationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AuthenticationResult")
            .field("id_token", &redact(&self.id_token))
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevokeTokenBody<'a> {
    pub token: &'a str,
    pub client_id: &'a str,
}

/// Error body returned with non-2xx responses.
///
/// `__type` is either a bare name or `namespace#Name`; the message key is
/// `message` or `Message` depending on the error.
#[derive(Debug, Deserialize)]
pub struct CognitoErrorBody {
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

impl CognitoErrorBody {
    /// The error name without its namespace prefix.
    pub fn name(&self) -> Option<&str> {
        self.error_type
            .as_deref()
            .map(|t| t.rsplit('#').next().unwrap_or(t))
    }
}

/// Classify a Cognito error name.
pub fn error_kind(name: &str) -> AuthErrorKind {
    match name {
        "NotAuthorizedException" | "UserNotFoundException" => AuthErrorKind::InvalidCredentials,
        "UserNotConfirmedException" => AuthErrorKind::UserNotConfirmed,
        "UsernameExistsException" | "AliasExistsException" => AuthErrorKind::UserExists,
        "CodeMismatchException" | "ExpiredCodeException" => AuthErrorKind::InvalidCode,
        "InvalidParameterException" | "InvalidPasswordException" => {
            AuthErrorKind::InvalidParameter
        }
        "TooManyRequestsException"
        | "LimitExceededException"
        | "TooManyFailedAttemptsException" => AuthErrorKind::RateLimited,
        _ => AuthErrorKind::Unknown,
    }
}
