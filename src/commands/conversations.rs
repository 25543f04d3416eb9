//! Conversation listing, display, and creation handlers

use std::time::Duration;

use colored::Colorize;

use crate::api::{ApiClient, ConversationService};
use crate::commands::chat::print_thread;
use crate::config::Config;
use crate::error::Result;

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_seconds),
    )
}

/// List the current user's conversations, newest first
pub async fn run_list(config: Config) -> Result<()> {
    let api = client(&config)?;
    let response = api.get_conversations().await?;

    if response.conversations.is_empty() {
        println!("No conversations yet");
        return Ok(());
    }
    for conversation in &response.conversations {
        let title = if conversation.title.is_empty() {
            "(untitled)"
        } else {
            &conversation.title
        };
        println!(
            "{}  {}  {}",
            conversation.conversation_id,
            conversation.updated_at.format("%Y-%m-%d %H:%M"),
            title
        );
    }
    Ok(())
}

/// Print one conversation's message thread, oldest first
pub async fn run_show(config: Config, id: String) -> Result<()> {
    let api = client(&config)?;
    let response = api.get_conversation(&id).await?;

    if let Some(conversation) = &response.conversation {
        let title = if conversation.title.is_empty() {
            &conversation.conversation_id
        } else {
            &conversation.title
        };
        println!("{}\n", title.bold());
    }
    print_thread(response.messages.iter());
    Ok(())
}

/// Create a new, empty conversation and print its id
pub async fn run_new(config: Config) -> Result<()> {
    let api = client(&config)?;
    let response = api.new_conversation().await?;
    println!("{}", response.conversation_id);
    Ok(())
}
