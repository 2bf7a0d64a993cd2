//! Chatbot command-line client.
//!
//! Binary name: `chatbot`
//!
//! Parses CLI arguments, loads configuration, initializes the identity
//! provider, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use chatbot_infra::config::load_client_config;
use chatbot_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::output::OutputMode;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatbot", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_client_config(cli.config.as_deref()).await;
    if let Some(endpoint) = cli.endpoint {
        config.api_endpoint = endpoint;
    }

    let mode = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
    };
    let password = cli::auth::password_from_env(|key| std::env::var(key).ok());
    let password = password.as_deref();

    if let Commands::Health = cli.command {
        return cli::health::health(&config, mode).await;
    }

    let state = AppState::init(config)?;

    match cli.command {
        Commands::Signup { email } => {
            cli::auth::sign_up(&state, &email, password, mode).await?;
        }

        Commands::Confirm { email, code } => {
            cli::auth::confirm(&state, &email, &code, mode).await?;
        }

        Commands::Signin { email } => {
            cli::auth::sign_in(&state, &email, password, mode).await?;
        }

        Commands::Whoami { email } => {
            cli::auth::whoami(&state, email.as_deref(), password, mode).await?;
        }

        Commands::Send {
            message,
            conversation,
            system,
            email,
        } => {
            let request =
                cli::send::build_request(&message, conversation.as_deref(), system.as_deref());
            cli::send::send(&state, request, email.as_deref(), password, mode).await?;
        }

        Commands::History {
            conversation,
            limit,
            email,
        } => {
            cli::history::show_history(
                &state,
                conversation.as_deref(),
                limit,
                email.as_deref(),
                password,
                mode,
            )
            .await?;
        }

        Commands::Chat {
            conversation,
            system,
            email,
        } => {
            cli::chat::loop_runner::run_chat_loop(
                &state,
                email.as_deref(),
                password,
                conversation,
                system,
                mode,
            )
            .await?;
        }

        // Dispatched before the identity provider is needed.
        Commands::Health | Commands::Completions { .. } => {}
    }

    Ok(())
}
