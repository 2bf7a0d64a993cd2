//! One-shot `chatbot send`.

use anyhow::Result;
use console::style;

use chatbot_types::chat::ChatRequest;

use crate::state::AppState;

use super::auth::{sign_in_as, sign_out};
use super::output::{print_json, spinner, OutputMode};

/// Build the request for a message, optionally continuing a conversation.
pub fn build_request(
    message: &str,
    conversation: Option<&str>,
    system: Option<&str>,
) -> ChatRequest {
    let mut request = ChatRequest::new(message);
    if let Some(id) = conversation.filter(|id| !id.is_empty()) {
        request = request.with_conversation_id(id);
    }
    if let Some(prompt) = system {
        request = request.with_system_prompt(prompt);
    }
    request
}

pub async fn send(
    state: &AppState,
    request: ChatRequest,
    email: Option<&str>,
    password: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    let api = state.api_client()?;
    let signed_in = match email {
        Some(email) => sign_in_as(state, email, password).await?,
        None => false,
    };

    let progress = spinner(mode, "thinking...");
    let result = api.send_message(&request).await;
    progress.finish_and_clear();

    if signed_in {
        sign_out(state).await;
    }
    let response = result?;

    if mode.json {
        return print_json(&response);
    }

    println!("{}", response.response);
    if mode.decorated() {
        println!();
        println!(
            "  {} {}",
            style("Conversation:").dim(),
            style(&response.conversation_id).cyan()
        );
    }
    Ok(())
}
