//! Covo - Streaming chat client CLI
//!
#![doc = "Covo - Streaming chat client for an agent/LLM backend"]
#![doc = "Main entry point for the Covo application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use covo::cli::{Cli, Commands, ConversationCommand};
use covo::commands;
use covo::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.config, &cli)?;

    match cli.command {
        Commands::Chat {
            conversation,
            model,
            agent,
        } => {
            if let Some(id) = &conversation {
                tracing::debug!("Resuming conversation: {}", id);
            }
            commands::chat::run_chat(config, conversation, model, agent).await
        }
        Commands::Conversations { command } => match command {
            ConversationCommand::List => commands::conversations::run_list(config).await,
            ConversationCommand::Show { id } => {
                commands::conversations::run_show(config, id).await
            }
            ConversationCommand::New => commands::conversations::run_new(config).await,
        },
        Commands::Models => commands::catalog::run_models(config).await,
        Commands::Tools => commands::catalog::run_tools(config).await,
        Commands::Agents => commands::catalog::run_agents(config).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "covo=debug" } else { "covo=info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
