//! Welcome banner for chat sessions.

use console::style;

/// Print the banner shown when a chat session starts.
pub fn print_welcome_banner(endpoint: &str, user: Option<&str>, conversation: Option<&str>) {
    println!();
    println!("  {} {}", style("*").cyan(), style("Chatbot").cyan().bold());
    println!();
    println!("  {}     {}", style("Backend:").bold(), style(endpoint).dim());
    println!(
        "  {} {}",
        style("Signed in as:").bold(),
        style(user.unwrap_or("nobody (anonymous)")).dim()
    );
    if let Some(id) = conversation {
        println!("  {} {}", style("Conversation:").bold(), style(id).dim());
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
