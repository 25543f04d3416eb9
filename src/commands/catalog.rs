//! Model, tool, and agent catalog listing handlers

use std::time::Duration;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Result;

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_seconds),
    )
}

/// List the models available to the current user
pub async fn run_models(config: Config) -> Result<()> {
    let api = client(&config)?;
    let response = api.get_me().await?;

    if response.llms.is_empty() {
        println!("No models available");
        return Ok(());
    }
    for model in &response.llms {
        let name = model.name.as_deref().unwrap_or(&model.deployment_id);
        println!("{}  ({})  {}", model.deployment_id, model.issuer, name);
    }
    Ok(())
}

/// List the tool catalog
pub async fn run_tools(config: Config) -> Result<()> {
    let api = client(&config)?;
    let response = api.get_tools().await?;

    if response.tools.is_empty() {
        println!("No tools available");
        return Ok(());
    }
    for tool in &response.tools {
        println!("{}  {}", tool.tool_id, tool.tool_name);
    }
    Ok(())
}

/// List the agent catalog
pub async fn run_agents(config: Config) -> Result<()> {
    let api = client(&config)?;
    let response = api.get_agents().await?;

    if response.agents.is_empty() {
        println!("No agents available");
        return Ok(());
    }
    for agent in &response.agents {
        if agent.tags.is_empty() {
            println!("{}  {}", agent.agent_id, agent.name);
        } else {
            println!("{}  {}  [{}]", agent.agent_id, agent.name, agent.tags.join(", "));
        }
    }
    Ok(())
}
