//! Collaborator API client
//!
//! This module wraps the backend's plain request/response endpoints:
//! conversation listing and loading, conversation creation, and the
//! user/model/tool/agent catalogs. These calls are stateless collaborators
//! of the streaming core — the completion endpoint itself lives in
//! [`crate::completion`].

pub mod types;

pub use types::{
    AgentSummary, Content, Conversation, CreateConversationResponse, GetAgentsResponse,
    GetConversationResponse, GetConversationsResponse, GetMeResponse, GetToolsResponse, LlmModel,
    Message, Role, ToolSummary, User,
};

use crate::error::{CovoError, Result};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Conversation fetches needed by the turn driver
///
/// The turn driver re-fetches the authoritative conversation after a stream
/// settles. Keeping that dependency behind a trait lets tests drive a full
/// turn against a fake without a live backend.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Fetch a conversation's full message path, root first
    async fn get_conversation(&self, conversation_id: &str) -> Result<GetConversationResponse>;
}

/// HTTP client for the backend's collaborator endpoints
///
/// # Examples
///
/// ```no_run
/// use covo::api::ApiClient;
/// use std::time::Duration;
///
/// # fn example() -> covo::error::Result<()> {
/// let client = ApiClient::new("http://localhost:8000", Duration::from_secs(30))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: url::Url,
}

impl ApiClient {
    /// Construct a client targeting `base_url`
    ///
    /// The `/api/v1` prefix is appended per request; `base_url` is the bare
    /// server origin, e.g. `http://localhost:8000`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` does not parse or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = url::Url::parse(base_url)
            .map_err(|e| CovoError::Config(format!("invalid api base url: {}", e)))?;
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// The server origin this client talks to
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        self.base_url
            .join(&format!("/api/v1{}", path))
            .map_err(|e| CovoError::Api(format!("invalid endpoint path {}: {}", path, e)).into())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(CovoError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CovoError::Api(format!("GET {} returned HTTP {}", url, status)).into());
        }
        Ok(response.json::<T>().await.map_err(CovoError::Http)?)
    }

    /// Create a new, empty conversation
    ///
    /// # Returns
    ///
    /// The new conversation id and its initial thread tip (`None` until the
    /// first message lands).
    pub async fn new_conversation(&self) -> Result<CreateConversationResponse> {
        let url = self.endpoint("/conversations/new")?;
        let response = self
            .http_client
            .post(url.clone())
            .send()
            .await
            .map_err(CovoError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CovoError::Api(format!("POST {} returned HTTP {}", url, status)).into());
        }
        Ok(response.json().await.map_err(CovoError::Http)?)
    }

    /// List the current user's conversations
    pub async fn get_conversations(&self) -> Result<GetConversationsResponse> {
        self.get_json("/conversations").await
    }

    /// Fetch the current user profile and available models
    pub async fn get_me(&self) -> Result<GetMeResponse> {
        self.get_json("/user").await
    }

    /// List the tool catalog
    pub async fn get_tools(&self) -> Result<GetToolsResponse> {
        self.get_json("/tools").await
    }

    /// List the agent catalog
    pub async fn get_agents(&self) -> Result<GetAgentsResponse> {
        self.get_json("/agents").await
    }
}

#[async_trait]
impl ConversationService for ApiClient {
    async fn get_conversation(&self, conversation_id: &str) -> Result<GetConversationResponse> {
        self.get_json(&format!("/conversations/{}", conversation_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = ApiClient::new("not a url", Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_joins_api_prefix() {
        let client = ApiClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        let url = client.endpoint("/conversations/new").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/conversations/new");
    }

    #[test]
    fn test_endpoint_with_conversation_id() {
        let client = ApiClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        let url = client.endpoint("/conversations/conv-42").unwrap();
        assert!(url.as_str().ends_with("/api/v1/conversations/conv-42"));
    }
}
