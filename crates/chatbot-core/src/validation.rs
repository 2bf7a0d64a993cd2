//! Boundary validation of backend response bodies.
//!
//! Bodies are decoded into their declared type and then checked for the
//! fields callers depend on. Any mismatch surfaces as
//! [`ApiError::Validation`] instead of a half-filled value.

use serde::de::DeserializeOwned;

use chatbot_types::chat::{ChatResponse, HealthStatus, HistoryResult};
use chatbot_types::error::ApiError;

/// Field-level checks run after a body has been decoded.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ChatResponse {
    fn validate(&self) -> Result<(), String> {
        if self.conversation_id.trim().is_empty() {
            return Err("conversation_id is empty".to_string());
        }
        Ok(())
    }
}

impl Validate for HistoryResult {
    fn validate(&self) -> Result<(), String> {
        for (i, item) in self.history.iter().enumerate() {
            if item.conversation_id.trim().is_empty() {
                return Err(format!("history[{i}].conversationId is empty"));
            }
        }
        Ok(())
    }
}

impl Validate for HealthStatus {
    fn validate(&self) -> Result<(), String> {
        if self.status.trim().is_empty() {
            return Err("status is empty".to_string());
        }
        Ok(())
    }
}

/// Decode and validate a response body received from `endpoint`.
pub fn decode_response<T>(endpoint: &str, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| ApiError::Validation {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    value.validate().map_err(|message| ApiError::Validation {
        endpoint: endpoint.to_string(),
        message,
    })?;

    Ok(value)
}
