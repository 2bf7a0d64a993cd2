//! Main chat loop.

use console::style;
use tracing::info;

use crate::cli::auth::{sign_in_as, sign_out};
use crate::cli::history::print_history;
use crate::cli::output::{spinner, OutputMode};
use crate::cli::send::build_request;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run an interactive session until Ctrl+D or `/exit`.
///
/// With `email`, signs in first and signs out when the loop ends.
pub async fn run_chat_loop(
    state: &AppState,
    email: Option<&str>,
    password: Option<&str>,
    conversation: Option<String>,
    system: Option<String>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let api = state.api_client()?;
    let signed_in = match email {
        Some(email) => sign_in_as(state, email, password).await?,
        None => false,
    };

    let mut conversation_id = conversation.filter(|id| !id.is_empty());
    let mut system_prompt = system;

    print_welcome_banner(api.base_url(), email, conversation_id.as_deref());

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::New => {
                    conversation_id = None;
                    println!(
                        "\n  {} Started a new conversation.\n",
                        style("*").cyan().bold()
                    );
                }
                ChatCommand::History => match conversation_id.as_deref() {
                    Some(id) => {
                        if let Err(e) = print_history(&api, Some(id), None, mode).await {
                            eprintln!(
                                "\n  {} Could not load history: {e}\n",
                                style("!").red().bold()
                            );
                        }
                    }
                    None => println!(
                        "\n  {} No conversation yet. Send a message first.\n",
                        style("i").blue().bold()
                    ),
                },
                ChatCommand::WhoAmI => match state.auth.get_current_user().await {
                    Ok(user) => println!(
                        "\n  {} {} ({})\n",
                        style("*").cyan().bold(),
                        user.email.as_deref().unwrap_or(&user.username),
                        style(&user.user_id).dim()
                    ),
                    Err(e) => println!("\n  {} {e}\n", style("i").blue().bold()),
                },
                ChatCommand::System(prompt) => {
                    let label = if prompt.is_some() { "set" } else { "cleared" };
                    system_prompt = prompt;
                    println!("\n  {} System prompt {label}.\n", style("*").cyan().bold());
                }
                ChatCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let request = build_request(&text, conversation_id.as_deref(), system_prompt.as_deref());
        let progress = spinner(mode, "thinking...");
        let result = api.send_message(&request).await;
        progress.finish_and_clear();

        match result {
            Ok(response) => {
                if conversation_id.as_deref() != Some(response.conversation_id.as_str()) {
                    info!(conversation_id = %response.conversation_id, "conversation started");
                }
                conversation_id = Some(response.conversation_id);
                println!("\n  {} {}\n", style("Bot >").cyan().bold(), response.response.trim());
            }
            Err(e) => {
                eprintln!("\n  {} {e}", style("!").red().bold());
                eprintln!("  {}\n", style("Type a message to retry, /exit to quit.").dim());
            }
        }
    }

    chat_input.flush();
    if signed_in {
        sign_out(state).await;
    }
    Ok(())
}
