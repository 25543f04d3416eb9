//! Interactive chat mode handler
//!
//! Opens (or resumes) a conversation, then runs a readline-based loop
//! that submits user input as streaming completion turns and renders the
//! assistant reply incrementally as frames arrive.

use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::types::{LlmModel, Message, Role};
use crate::api::{ApiClient, ConversationService};
use crate::chat_mode::{parse_chat_command, print_help, ChatCommand, ChatState};
use crate::completion::{CompletionClient, TurnDriver};
use crate::config::Config;
use crate::error::{CovoError, Result};
use crate::store::MessageStore;

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `conversation` - Existing conversation id to resume, or `None` for new
/// * `model` - Optional deployment id overriding the configured default
/// * `agent` - Optional agent id to route turns through
pub async fn run_chat(
    config: Config,
    conversation: Option<String>,
    model: Option<String>,
    agent: Option<String>,
) -> Result<()> {
    tracing::info!("Starting interactive chat mode");

    let api = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_seconds),
    )?;
    let completion = CompletionClient::new(
        &config.api.base_url,
        config.completion.idle_timeout_seconds,
    )?;
    let mut driver = TurnDriver::new(completion);
    let mut store = MessageStore::new();

    let me = api.get_me().await?;
    let models = me.llms;

    let wanted = model.or(config.chat.default_model.clone());
    let selected = select_model(&models, wanted.as_deref())?;

    let conversation_id = match conversation {
        Some(id) => {
            let response = api.get_conversation(&id).await?;
            store.replace_all(response.messages);
            id
        }
        None => api.new_conversation().await?.conversation_id,
    };

    let show_status = config.chat.show_status;
    let mut state = ChatState::new(conversation_id, selected);
    state.agent_id = agent.or(config.chat.default_agent.clone());

    let mut rl = DefaultEditor::new()
        .map_err(|e| CovoError::Config(format!("failed to initialize readline: {}", e)))?;

    print_welcome_banner(&state);
    print_thread(store.messages().iter().map(|stored| &stored.message));

    loop {
        let prompt = state.format_prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_chat_command(trimmed) {
                    Ok(ChatCommand::None) => {
                        send_turn(&mut driver, &api, &mut store, &state, trimmed, show_status)
                            .await;
                    }
                    Ok(ChatCommand::Exit) => break,
                    Ok(ChatCommand::Help) => print_help(),
                    Ok(ChatCommand::ShowStatus) => println!("{}\n", state.status_display()),
                    Ok(ChatCommand::ListModels) => print_models(&models, &state),
                    Ok(ChatCommand::SwitchModel(deployment_id)) => {
                        match select_model(&models, Some(&deployment_id)) {
                            Ok(model) => {
                                println!("Switched to {}\n", model.deployment_id.green());
                                state.model = model;
                            }
                            Err(e) => println!("{}", e.to_string().red()),
                        }
                    }
                    Ok(ChatCommand::ListTools) => match api.get_tools().await {
                        Ok(response) => {
                            if response.tools.is_empty() {
                                println!("No tools available\n");
                            }
                            for tool in &response.tools {
                                let mark = if state.tools.contains(&tool.tool_id) {
                                    "[x]".green().to_string()
                                } else {
                                    "[ ]".to_string()
                                };
                                println!("  {} {} - {}", mark, tool.tool_id, tool.tool_name);
                            }
                        }
                        Err(e) => println!("{}", format!("Failed to list tools: {}", e).red()),
                    },
                    Ok(ChatCommand::ToggleTool(tool_id)) => {
                        if state.tools.toggle(&tool_id) {
                            println!("Tool {} selected\n", tool_id.green());
                        } else {
                            println!("Tool {} deselected\n", tool_id.yellow());
                        }
                    }
                    Ok(ChatCommand::SwitchAgent(agent_id)) => {
                        match &agent_id {
                            Some(id) => println!("Routing turns through agent {}\n", id.green()),
                            None => println!("Agent routing disabled\n"),
                        }
                        state.agent_id = agent_id;
                    }
                    Ok(ChatCommand::NewConversation) => match api.new_conversation().await {
                        Ok(response) => {
                            store.clear();
                            state.conversation_id = response.conversation_id;
                            println!("Started conversation {}\n", state.conversation_id.green());
                        }
                        Err(e) => {
                            println!("{}", format!("Failed to create conversation: {}", e).red())
                        }
                    },
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Run one turn and render the reply incrementally
///
/// All turn failures end up as a printed notice here; the loop keeps
/// running so the user can retry or inspect state.
async fn send_turn(
    driver: &mut TurnDriver,
    api: &ApiClient,
    store: &mut MessageStore,
    state: &ChatState,
    text: &str,
    show_status: bool,
) {
    let mut printer = StreamPrinter::new();
    let result = driver
        .send_message(
            api,
            store,
            &state.conversation_id,
            text,
            &state.model,
            state.agent_id.as_deref(),
            &state.tools,
            |content, is_status| {
                if is_status && !show_status {
                    return;
                }
                printer.render(content)
            },
        )
        .await;
    printer.finish();

    match result {
        Ok(outcome) => {
            if !outcome.refreshed {
                println!(
                    "{}",
                    "Note: conversation refresh failed; showing local state".yellow()
                );
            }
        }
        Err(e) => println!("{}", format!("Turn failed: {}", e).red()),
    }
}

/// Incremental terminal renderer for a growing reply
///
/// The turn driver reports the full visible text on every change; this
/// prints only the new suffix when the text grows, and reprints from a
/// fresh line when it is replaced wholesale (status swaps, done
/// overrides).
struct StreamPrinter {
    printed: String,
}

impl StreamPrinter {
    fn new() -> Self {
        Self {
            printed: String::new(),
        }
    }

    fn render(&mut self, content: &str) {
        if let Some(suffix) = content.strip_prefix(self.printed.as_str()) {
            print!("{}", suffix);
        } else {
            if !self.printed.is_empty() {
                println!();
            }
            print!("{}", content);
        }
        let _ = std::io::stdout().flush();
        self.printed = content.to_string();
    }

    fn finish(&mut self) {
        if !self.printed.is_empty() {
            println!();
        }
    }
}

fn select_model(models: &[LlmModel], wanted: Option<&str>) -> Result<LlmModel> {
    let first = models
        .first()
        .ok_or_else(|| CovoError::Api("backend reports no available models".to_string()))?;
    match wanted {
        Some(deployment_id) => models
            .iter()
            .find(|model| model.deployment_id == deployment_id)
            .cloned()
            .ok_or_else(|| {
                CovoError::Config(format!("unknown model: {}", deployment_id)).into()
            }),
        None => Ok(first.clone()),
    }
}

fn print_models(models: &[LlmModel], state: &ChatState) {
    for model in models {
        let marker = if model.deployment_id == state.model.deployment_id {
            "*"
        } else {
            " "
        };
        let name = model.name.as_deref().unwrap_or(&model.deployment_id);
        println!("  {} {} ({}) - {}", marker, model.deployment_id, model.issuer, name);
    }
    println!();
}

fn print_welcome_banner(state: &ChatState) {
    println!("{}", "Covo interactive chat".bold());
    println!("Conversation {}", state.conversation_id);
    println!("Model {} | type /help for commands\n", state.model.deployment_id.cyan());
}

/// Print an already-loaded message thread, oldest first
pub(crate) fn print_thread<'a>(messages: impl Iterator<Item = &'a Message>) {
    for message in messages {
        let label = match message.role {
            Role::User => "you".cyan(),
            Role::Assistant => "assistant".green(),
        };
        println!("{}: {}", label, message.content.joined());
    }
}
