//! Command-line interface definition for Covo
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat command plus catalog and conversation
//! listing commands.

use clap::{Parser, Subcommand};

/// Covo - Streaming chat client for an agent/LLM backend
///
/// Talk to a conversation backend whose assistant replies arrive
/// incrementally over a streamed HTTP response.
#[derive(Parser, Debug, Clone)]
#[command(name = "covo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Override the backend base URL from config
    #[arg(long, env = "COVO_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Covo
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat mode
    Chat {
        /// Resume an existing conversation by id instead of starting new
        #[arg(short = 'r', long)]
        conversation: Option<String>,

        /// Model deployment id to use for replies
        #[arg(short, long)]
        model: Option<String>,

        /// Agent to route turns through
        #[arg(short, long)]
        agent: Option<String>,
    },

    /// Manage conversations
    Conversations {
        /// Conversation subcommand
        #[command(subcommand)]
        command: ConversationCommand,
    },

    /// List available models
    Models,

    /// List the tool catalog
    Tools,

    /// List the agent catalog
    Agents,
}

/// Conversation management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConversationCommand {
    /// List your conversations, newest first
    List,

    /// Show one conversation's message thread
    Show {
        /// Conversation id
        id: String,
    },

    /// Create a new, empty conversation
    New,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_with_model() {
        let cli = Cli::try_parse_from(["covo", "chat", "--model", "gpt-4o"]).unwrap();
        match cli.command {
            Commands::Chat { model, .. } => assert_eq!(model.as_deref(), Some("gpt-4o")),
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_conversations_show() {
        let cli = Cli::try_parse_from(["covo", "conversations", "show", "conv-1"]).unwrap();
        match cli.command {
            Commands::Conversations {
                command: ConversationCommand::Show { id },
            } => assert_eq!(id, "conv-1"),
            _ => panic!("expected conversations show command"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["covo", "models"]).unwrap();
        assert_eq!(cli.config, "config/config.yaml");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_api_url_override() {
        let cli =
            Cli::try_parse_from(["covo", "--api-url", "http://remote:9000", "tools"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://remote:9000"));
    }
}
