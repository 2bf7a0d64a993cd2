//! Slash command parsing for the chat loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Start a new conversation.
    New,
    /// Show stored history for the current conversation.
    History,
    /// Show the signed-in user.
    WhoAmI,
    /// Set the system prompt, or clear it when `None`.
    System(Option<String>),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), Some(arg.trim().to_string())),
        None => (trimmed.to_lowercase(), None),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/history" => Some(ChatCommand::History),
        "/whoami" => Some(ChatCommand::WhoAmI),
        "/system" => Some(ChatCommand::System(arg.filter(|a| !a.is_empty()))),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
        ("/new", "Start a new conversation"),
        ("/history", "Show history of this conversation"),
        ("/whoami", "Show the signed-in user"),
        ("/system", "Set the system prompt (no text clears it)"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, help) in rows {
        println!("  {:<10} {}", style(cmd).cyan(), help);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
