//! Minimal JWT payload decoding for identity tokens.
//!
//! Only reads the claims section; the signature is not verified because the
//! token was just received from the provider over TLS and is only used to
//! describe the signed-in user locally.

use base64::Engine;
use serde::Deserialize;

/// Claims read from an identity token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(rename = "cognito:username")]
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Decode the payload of a compact-serialized JWT.
///
/// Returns `None` when the token is not three dot-separated segments or the
/// payload is not base64url-encoded JSON with a `sub` claim.
pub fn decode_claims(token: &str) -> Option<IdTokenClaims> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
