//! CLI command definitions for the `chatbot` binary.
//!
//! Uses clap derive macros for argument parsing. Commands that talk to the
//! backend accept `--email` to sign in first; without it they run
//! unauthenticated.

pub mod auth;
pub mod chat;
pub mod health;
pub mod history;
pub mod output;
pub mod send;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Talk to the chatbot backend from the terminal.
#[derive(Parser)]
#[command(name = "chatbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// TOML file with endpoint and identity pool settings.
    #[arg(long, global = true, env = "CHATBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and environment.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new account. A confirmation code is sent to the email.
    Signup {
        /// Email address; also the username.
        email: String,
    },

    /// Confirm a registration with the emailed code.
    Confirm {
        email: String,
        /// Verification code from the confirmation email.
        code: String,
    },

    /// Check credentials by signing in.
    Signin { email: String },

    /// Show the signed-in user.
    Whoami {
        /// Sign in as this user first.
        #[arg(long)]
        email: Option<String>,
    },

    /// Send a single message and print the reply.
    Send {
        /// Message text.
        message: String,

        /// Continue an existing conversation.
        #[arg(short, long)]
        conversation: Option<String>,

        /// System prompt for this message.
        #[arg(short, long)]
        system: Option<String>,

        /// Sign in as this user first.
        #[arg(long)]
        email: Option<String>,
    },

    /// Show stored conversation history.
    History {
        /// Only show this conversation.
        #[arg(short, long)]
        conversation: Option<String>,

        /// Maximum number of exchanges (backend default: 50).
        #[arg(short, long)]
        limit: Option<u32>,

        /// Sign in as this user first.
        #[arg(long)]
        email: Option<String>,
    },

    /// Start an interactive chat session.
    Chat {
        /// Continue an existing conversation.
        #[arg(short, long)]
        conversation: Option<String>,

        /// System prompt sent with every message.
        #[arg(short, long)]
        system: Option<String>,

        /// Sign in as this user first.
        #[arg(long)]
        email: Option<String>,
    },

    /// Check that the backend is up.
    Health,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
