//! Identity records produced by the identity adapter.
//!
//! Session tokens are wrapped in [`SecretString`] and never appear in
//! `Debug` output. None of the token-bearing types implement `Serialize`.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthErrorKind};

/// A user attribute sent with a registration (e.g., `email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

/// Registration request handed to an identity provider.
#[derive(Debug)]
pub struct SignUpRequest {
    pub username: String,
    pub password: SecretString,
    pub attributes: Vec<UserAttribute>,
}

/// Where a confirmation code was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDelivery {
    /// Masked destination, e.g. `a***@e***.com`.
    pub destination: Option<String>,
    /// `EMAIL` or `SMS`.
    pub delivery_medium: Option<String>,
    pub attribute_name: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResult {
    /// Identifier of the new user.
    pub user_id: String,
    /// Whether the account is usable without a confirmation code.
    pub user_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_delivery: Option<CodeDelivery>,
}

/// What the caller has to do after a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sign_in_step", rename_all = "snake_case")]
pub enum SignInStep {
    /// Signed in; a session is held.
    Done,
    /// The provider asked for a further step (e.g., `NEW_PASSWORD_REQUIRED`).
    /// Passed through uninterpreted.
    Challenge {
        name: String,
        #[serde(default)]
        parameters: HashMap<String, String>,
    },
}

/// Result of a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResult {
    pub is_signed_in: bool,
    pub next_step: SignInStep,
}

impl SignInResult {
    pub fn signed_in() -> Self {
        Self {
            is_signed_in: true,
            next_step: SignInStep::Done,
        }
    }
}

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub username: String,
    /// Stable subject identifier.
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Tokens issued at sign-in.
#[derive(Debug)]
pub struct AuthTokens {
    /// Identity token; the bearer token sent to the chat backend.
    pub id_token: SecretString,
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Lifetime in seconds reported by the provider.
    pub expires_in: Option<u64>,
}

/// Snapshot of the current session.
#[derive(Debug, Default)]
pub struct AuthSession {
    /// `None` when nobody is signed in.
    pub tokens: Option<AuthTokens>,
}

/// Uniform `{success, ...}` shape of an identity operation.
///
/// Serializes as `{"success": true, ...payload}` or
/// `{"success": false, "error": "<message>", "kind": "<kind>"}`. The payload
/// must serialize as a map (or unit).
#[derive(Debug, Serialize)]
pub struct AuthOutcome<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AuthErrorKind>,
}

impl<T> From<Result<T, AuthError>> for AuthOutcome<T> {
    fn from(result: Result<T, AuthError>) -> Self {
        match result {
            Ok(payload) => Self {
                success: true,
                payload: Some(payload),
                error: None,
                kind: None,
            },
            Err(err) => Self {
                success: false,
                payload: None,
                error: Some(err.message),
                kind: Some(err.kind),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_success_flattens_payload() {
        let outcome: AuthOutcome<_> = Ok::<_, AuthError>(json!({"userId": "u-1"})).into();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"success": true, "userId": "u-1"}));
    }

    #[test]
    fn test_outcome_unit_payload() {
        let outcome: AuthOutcome<()> = Ok(()).into();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({"success": true}));
    }

    #[test]
    fn test_outcome_failure() {
        let outcome: AuthOutcome<()> = Err(AuthError::new(
            AuthErrorKind::InvalidCredentials,
            "Incorrect username or password.",
        ))
        .into();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "Incorrect username or password.",
                "kind": "invalid_credentials"
            })
        );
    }

    #[test]
    fn test_sign_in_step_serialization() {
        let result = SignInResult {
            is_signed_in: false,
            next_step: SignInStep::Challenge {
                name: "NEW_PASSWORD_REQUIRED".to_string(),
                parameters: HashMap::new(),
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["next_step"]["sign_in_step"], "challenge");
        assert_eq!(value["next_step"]["name"], "NEW_PASSWORD_REQUIRED");
    }

    #[test]
    fn test_sign_up_outcome_uses_user_id_key() {
        let outcome: AuthOutcome<SignUpResult> = Ok(SignUpResult {
            user_id: "5f1c-sub".to_string(),
            user_confirmed: false,
            code_delivery: None,
        })
        .into();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "userId": "5f1c-sub", "userConfirmed": false})
        );
    }

    #[test]
    fn test_user_outcome_uses_user_id_key() {
        let outcome: AuthOutcome<AuthUser> = Ok(AuthUser {
            username: "ada-sub".to_string(),
            user_id: "ada-sub".to_string(),
            email: None,
        })
        .into();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["userId"], "ada-sub");
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn test_tokens_debug_is_redacted() {
        let tokens = AuthTokens {
            id_token: SecretString::from("id-token-value"),
            access_token: SecretString::from("access-token-value"),
            refresh_token: None,
            expires_in: Some(3600),
        };
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("id-token-value"));
        assert!(!debug.contains("access-token-value"));
    }
}
