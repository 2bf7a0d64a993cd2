//! Chat backend request/response records.
//!
//! These model the JSON bodies of the `/chat`, `/history` and `/health`
//! endpoints. Field names follow the backend's wire format.

use serde::{Deserialize, Deserializer, Serialize};

/// Page size used by `/history` when the caller does not pass one.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl ChatRequest {
    /// A request that starts a new conversation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
            system_prompt: None,
        }
    }

    /// Continue an existing conversation.
    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Conversation id; newly assigned by the backend when the request had none.
    pub conversation_id: String,
    pub timestamp: String,
}

/// One stored exchange returned by `GET /history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub user_id: String,
    pub conversation_id: String,
    /// Milliseconds since the Unix epoch.
    ///
    /// The backend stringifies stored numbers, so both `1700000000000` and
    /// `"1700000000000"` are accepted.
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub timestamp: i64,
    pub user_message: String,
    pub ai_response: String,
    pub created_at: String,
}

/// Body returned by `GET /history`.
///
/// `count` is reported by the backend and is not guaranteed to equal
/// `history.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResult {
    pub history: Vec<HistoryItem>,
    pub count: u64,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub version: String,
}

fn int_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) if v.fract() == 0.0 => Ok(v as i64),
        Raw::Float(v) => Err(serde::de::Error::custom(format!(
            "timestamp must be an integer, got {v}"
        ))),
        Raw::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| {
                    // Stringified decimals such as "1700000000000.0"
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0)
                        .map(|f| f as i64)
                        .ok_or(())
                })
                .map_err(|_| {
                    serde::de::Error::custom(format!("timestamp is not numeric: '{s}'"))
                })
        }
    }
}
