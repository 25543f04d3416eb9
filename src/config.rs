//! Configuration management for Covo
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CovoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Covo
///
/// Holds everything needed to talk to the backend and to run the
/// interactive chat loop.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Streaming completion settings
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Chat mode settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for plain (non-streaming) API requests, in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

/// Streaming completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Maximum seconds to wait between stream chunks before the turn is
    /// aborted; 0 disables the idle timeout
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

fn default_idle_timeout() -> u64 {
    120
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

/// Chat mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Deployment id of the model to select at startup, if any
    #[serde(default)]
    pub default_model: Option<String>,

    /// Agent to route turns through at startup, if any
    #[serde(default)]
    pub default_agent: Option<String>,

    /// Whether to render status narration while waiting for tokens
    #[serde(default = "default_show_status")]
    pub show_status: bool,
}

fn default_show_status() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: None,
            default_agent: None,
            show_status: default_show_status(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or if the
    /// merged configuration fails validation
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CovoError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CovoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("COVO_API_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("COVO_API_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid COVO_API_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(idle) = std::env::var("COVO_IDLE_TIMEOUT_SECONDS") {
            if let Ok(value) = idle.parse() {
                self.completion.idle_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid COVO_IDLE_TIMEOUT_SECONDS: {}", idle);
            }
        }

        if let Ok(model) = std::env::var("COVO_DEFAULT_MODEL") {
            self.chat.default_model = Some(model);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(CovoError::Config("api.base_url must not be empty".to_string()).into());
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| CovoError::Config(format!("Invalid api.base_url: {}", e)))?;
        if self.api.timeout_seconds == 0 {
            return Err(
                CovoError::Config("api.timeout_seconds must be positive".to_string()).into(),
            );
        }
        Ok(())
    }
}
