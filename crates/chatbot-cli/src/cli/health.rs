//! `chatbot health`: backend liveness check. Never signs in.

use std::sync::Arc;

use anyhow::Result;
use console::style;

use chatbot_core::token::Anonymous;
use chatbot_infra::api::BackendApiClient;
use chatbot_types::config::ClientConfig;

use super::output::{print_json, spinner, OutputMode};

pub async fn health(config: &ClientConfig, mode: OutputMode) -> Result<()> {
    let api = BackendApiClient::new(config, Arc::new(Anonymous))?;

    let progress = spinner(mode, "checking backend...");
    let result = api.health_check().await;
    progress.finish_and_clear();
    let status = result?;

    if mode.json {
        return print_json(&status);
    }

    let mark = if status.status.eq_ignore_ascii_case("healthy") {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    println!();
    println!(
        "  {} {} is {}",
        mark,
        style(&status.service).cyan().bold(),
        style(&status.status).bold()
    );
    println!("  {}  {}", style("Version:").bold(), style(&status.version).dim());
    println!("  {}     {}", style("Time:").bold(), style(&status.timestamp).dim());
    println!("  {} {}", style("Endpoint:").bold(), style(api.base_url()).dim());
    println!();
    Ok(())
}
