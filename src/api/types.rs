//! Wire entities shared with the agent backend
//!
//! These structures mirror the JSON shapes the backend returns for
//! conversations, messages, models, and the agent/tool catalogs. The
//! collaborator endpoints wrap their payloads in a `{status, message,
//! request_id, ...}` envelope, modeled here as dedicated response structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message authored by the end user
    User,
    /// Message authored by the model/agent
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message content: an ordered sequence of text parts
///
/// For a settled message, concatenating `parts` yields the final text.
/// While a reply is streaming, `parts` holds exactly one element that is
/// replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Content type discriminator; the backend currently only emits `text`
    #[serde(rename = "type")]
    pub content_type: String,
    /// The text parts making up the content
    pub parts: Vec<String>,
}

impl Content {
    /// Build a text content with a single part
    pub fn text(part: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            parts: vec![part.into()],
        }
    }

    /// Empty text content, used for assistant placeholders
    pub fn empty() -> Self {
        Self::text("")
    }

    /// The full text, concatenating all parts in order
    pub fn joined(&self) -> String {
        self.parts.concat()
    }
}

/// An LLM model descriptor attached to requests and assistant messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmModel {
    /// Model issuer, e.g. `openai` or `anthropic`
    pub issuer: String,
    /// Deployment identifier for the model
    pub deployment_id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Icon URL, if any
    #[serde(default)]
    pub icon_link: Option<String>,
}

/// One message within a conversation
///
/// Messages form a forest rooted at `None`: each message references at most
/// one parent, and a conversation's active thread is the path from the most
/// recent leaf back to the root. `parent_message_id`, once set, never
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier within the conversation
    pub message_id: String,
    /// Causal parent, `None` for thread roots
    #[serde(default)]
    pub parent_message_id: Option<String>,
    /// Who authored the message
    pub role: Role,
    /// The message body
    pub content: Content,
    /// Model that produced an assistant message, if known
    #[serde(default)]
    pub llm: Option<LlmModel>,
    /// Agent that produced an assistant message, if any
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Conversation metadata as listed in the sidebar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier, the conversation's identity
    pub conversation_id: String,
    /// Conversation title
    pub title: String,
    /// Emoji or icon string, if set
    #[serde(default)]
    pub icon: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

/// Current user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Username
    pub username: String,
    /// Email address, if known
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar URL, if any
    #[serde(default)]
    pub icon_link: Option<String>,
    /// Whether the user has admin privileges
    #[serde(default)]
    pub is_superuser: bool,
}

/// Tool catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    /// Unique tool identifier
    pub tool_id: String,
    /// Display name
    pub tool_name: String,
    /// Icon URL, if any
    #[serde(default)]
    pub icon_link: Option<String>,
    /// Last update timestamp, if known
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Agent catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Unique agent identifier
    pub agent_id: String,
    /// Display name
    pub name: String,
    /// Tags attached to the agent
    #[serde(default)]
    pub tags: Vec<String>,
    /// Icon URL, if any
    #[serde(default)]
    pub icon_link: Option<String>,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Response from `POST /conversations/new`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationResponse {
    /// `success` or `error`
    pub status: String,
    /// Human-readable status message
    #[serde(default)]
    pub message: Option<String>,
    /// The newly created conversation id
    pub conversation_id: String,
    /// Initial thread tip; `None` for an empty conversation
    #[serde(default)]
    pub parent_message_id: Option<String>,
}

/// Response from `GET /conversations`
#[derive(Debug, Clone, Deserialize)]
pub struct GetConversationsResponse {
    /// `success` or `error`
    pub status: String,
    /// Human-readable status message
    #[serde(default)]
    pub message: Option<String>,
    /// Conversation list, newest first
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// Response from `GET /conversations/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct GetConversationResponse {
    /// `success` or `error`
    pub status: String,
    /// Human-readable status message
    #[serde(default)]
    pub message: Option<String>,
    /// Conversation metadata, when included
    #[serde(default)]
    pub conversation: Option<Conversation>,
    /// Full message path for the conversation, root first
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Response from `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct GetMeResponse {
    /// `success` or `error`
    pub status: String,
    /// The current user
    pub user: User,
    /// Models available to this user
    #[serde(default)]
    pub llms: Vec<LlmModel>,
}

/// Response from `GET /tools`
#[derive(Debug, Clone, Deserialize)]
pub struct GetToolsResponse {
    /// `success` or `error`
    pub status: String,
    /// Tool catalog entries
    #[serde(default)]
    pub tools: Vec<ToolSummary>,
}

/// Response from `GET /agents`
#[derive(Debug, Clone, Deserialize)]
pub struct GetAgentsResponse {
    /// `success` or `error`
    pub status: String,
    /// Agent catalog entries
    #[serde(default)]
    pub agents: Vec<AgentSummary>,
}
