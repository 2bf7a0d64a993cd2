//! `chatbot history`: stored exchanges as a table.

use anyhow::Result;
use chrono::DateTime;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatbot_types::chat::HistoryItem;

use crate::state::{AppState, ConcreteApiClient};

use super::auth::{sign_in_as, sign_out};
use super::output::{print_json, spinner, truncate, OutputMode};

pub async fn show_history(
    state: &AppState,
    conversation: Option<&str>,
    limit: Option<u32>,
    email: Option<&str>,
    password: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    let api = state.api_client()?;
    let signed_in = match email {
        Some(email) => sign_in_as(state, email, password).await?,
        None => false,
    };

    let result = print_history(&api, conversation, limit, mode).await;

    if signed_in {
        sign_out(state).await;
    }
    result
}

/// Fetch and print history with an existing client (also used by `/history`
/// in the chat loop).
pub async fn print_history(
    api: &ConcreteApiClient,
    conversation: Option<&str>,
    limit: Option<u32>,
    mode: OutputMode,
) -> Result<()> {
    let progress = spinner(mode, "loading history...");
    let result = api.get_history(conversation, limit).await;
    progress.finish_and_clear();
    let history = result?;

    if mode.json {
        return print_json(&history);
    }

    if history.history.is_empty() {
        println!();
        println!("  {} No history yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!("{}", history_table(&history.history));
    if mode.decorated() {
        println!(
            "  {} {} of {} shown",
            style("i").blue().bold(),
            history.history.len(),
            history.count
        );
    }
    Ok(())
}

fn history_table(items: &[HistoryItem]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("When").fg(Color::Cyan),
            Cell::new("Conversation").fg(Color::Cyan),
            Cell::new("You").fg(Color::Cyan),
            Cell::new("Assistant").fg(Color::Cyan),
        ]);

    for item in items {
        table.add_row(vec![
            Cell::new(format_timestamp(item.timestamp)),
            Cell::new(truncate(&item.conversation_id, 12)),
            Cell::new(truncate(&item.user_message, 40)),
            Cell::new(truncate(&item.ai_response, 60)),
        ]);
    }
    table
}

/// Render epoch milliseconds as `YYYY-MM-DD HH:MM` (UTC).
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
