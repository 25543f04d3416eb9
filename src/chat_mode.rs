//! Chat session state and slash-command parsing
//!
//! This module holds the per-session selections made during interactive
//! chat (model, agent, tool set, open conversation) and the parser for
//! slash commands that modify them. Commands are prefixed with `/` and
//! are case-insensitive on the command word.

use colored::Colorize;
use thiserror::Error;

use crate::api::types::LlmModel;
use crate::completion::ToolSelection;

/// Errors that can occur when parsing slash commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Slash commands that can be executed during interactive chat
///
/// These commands modify the session state or print information rather
/// than being sent as a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// List available models
    ListModels,

    /// Switch the model used for replies, by deployment id
    SwitchModel(String),

    /// List the tool catalog with current selection marks
    ListTools,

    /// Toggle one tool in or out of the selection, by id
    ToggleTool(String),

    /// Route subsequent turns through an agent, or `None` to go direct
    SwitchAgent(Option<String>),

    /// Start a new, empty conversation
    NewConversation,

    /// Display the session's current selections
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a slash command; send as a regular turn
    None,
}

/// Parse a user input line into a slash command
///
/// Non-command input returns `Ok(ChatCommand::None)`; bare `exit` and
/// `quit` are accepted without the slash.
///
/// # Examples
///
/// ```
/// use covo::chat_mode::{parse_chat_command, ChatCommand};
///
/// let cmd = parse_chat_command("/model gpt-4o").unwrap();
/// assert_eq!(cmd, ChatCommand::SwitchModel("gpt-4o".to_string()));
///
/// let cmd = parse_chat_command("hello there").unwrap();
/// assert_eq!(cmd, ChatCommand::None);
///
/// assert!(parse_chat_command("/frobnicate").is_err());
/// ```
pub fn parse_chat_command(input: &str) -> Result<ChatCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(ChatCommand::None);
    }

    match lower.as_str() {
        "/models" => Ok(ChatCommand::ListModels),
        "/tools" => Ok(ChatCommand::ListTools),
        "/new" => Ok(ChatCommand::NewConversation),
        "/status" => Ok(ChatCommand::ShowStatus),
        "/help" | "/?" => Ok(ChatCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(ChatCommand::Exit),

        "/model" => Err(CommandError::MissingArgument {
            command: "/model".to_string(),
            usage: "/model <deployment_id>".to_string(),
        }),
        _ if lower.starts_with("/model ") => {
            Ok(ChatCommand::SwitchModel(trimmed[7..].trim().to_string()))
        }

        _ if lower.starts_with("/tools ") => {
            Ok(ChatCommand::ToggleTool(trimmed[7..].trim().to_string()))
        }

        "/agent" => Err(CommandError::MissingArgument {
            command: "/agent".to_string(),
            usage: "/agent <agent_id|off>".to_string(),
        }),
        _ if lower.starts_with("/agent ") => {
            let arg = trimmed[7..].trim();
            if arg.eq_ignore_ascii_case("off") || arg.eq_ignore_ascii_case("none") {
                Ok(ChatCommand::SwitchAgent(None))
            } else {
                Ok(ChatCommand::SwitchAgent(Some(arg.to_string())))
            }
        }

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Per-session selections for interactive chat
#[derive(Debug, Clone)]
pub struct ChatState {
    /// The open conversation's id
    pub conversation_id: String,
    /// Model used for replies
    pub model: LlmModel,
    /// Agent turns are routed through, if any
    pub agent_id: Option<String>,
    /// Tools attached to the next outgoing turn
    pub tools: ToolSelection,
}

impl ChatState {
    /// Creates session state for a freshly opened conversation
    pub fn new(conversation_id: String, model: LlmModel) -> Self {
        Self {
            conversation_id,
            model,
            agent_id: None,
            tools: ToolSelection::new(),
        }
    }

    /// One-line colored prompt reflecting the current model
    pub fn format_prompt(&self) -> String {
        format!("{} > ", self.model.deployment_id.cyan())
    }

    /// Multi-line status display of all current selections
    pub fn status_display(&self) -> String {
        let mut lines = vec![
            format!("Conversation: {}", self.conversation_id),
            format!(
                "Model:        {} ({})",
                self.model.deployment_id, self.model.issuer
            ),
        ];
        match &self.agent_id {
            Some(agent_id) => lines.push(format!("Agent:        {}", agent_id)),
            None => lines.push("Agent:        none".to_string()),
        }
        if self.tools.is_empty() {
            lines.push("Tools:        none selected".to_string());
        } else {
            lines.push(format!("Tools:        {} selected", self.tools.len()));
        }
        lines.join("\n")
    }
}

/// Print the slash-command reference
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  /models              List available models");
    println!("  /model <id>          Switch the reply model");
    println!("  /tools               List tools and current selection");
    println!("  /tools <id>          Toggle a tool for the next turns");
    println!("  /agent <id|off>      Route turns through an agent, or go direct");
    println!("  /new                 Start a new conversation");
    println!("  /status              Show current session selections");
    println!("  /help                Show this help");
    println!("  /exit                Leave the session");
}
