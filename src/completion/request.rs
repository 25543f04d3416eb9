//! Outbound completion request body
//!
//! One request is POSTed to the completion endpoint per turn. The body
//! carries the conversation identity, the causal parent of the turn, the
//! user's text, the selected model, and the optional agent and tool
//! selection for this request only.

use crate::api::types::{Content, LlmModel};

use serde::Serialize;
use std::collections::BTreeSet;

/// Slim model reference sent on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlmRef {
    /// Model issuer, e.g. `openai`
    pub issuer: String,
    /// Deployment identifier
    pub deployment_id: String,
}

impl From<&LlmModel> for LlmRef {
    fn from(model: &LlmModel) -> Self {
        Self {
            issuer: model.issuer.clone(),
            deployment_id: model.deployment_id.clone(),
        }
    }
}

/// Tool reference sent on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRef {
    /// Unique tool identifier
    pub tool_id: String,
}

/// Set of tool identifiers attached to the next outgoing request only
///
/// Order-irrelevant and deduplicated; not persisted as conversation state.
#[derive(Debug, Clone, Default)]
pub struct ToolSelection {
    ids: BTreeSet<String>,
}

impl ToolSelection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a tool id: absent ids are added, present ids removed
    ///
    /// # Returns
    ///
    /// `true` if the id is selected after the toggle.
    pub fn toggle(&mut self, tool_id: &str) -> bool {
        if self.ids.remove(tool_id) {
            false
        } else {
            self.ids.insert(tool_id.to_string());
            true
        }
    }

    /// Whether a tool id is currently selected
    pub fn contains(&self, tool_id: &str) -> bool {
        self.ids.contains(tool_id)
    }

    /// Number of selected tools
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the selection is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Wire representation of the selection
    pub fn to_refs(&self) -> Vec<ToolRef> {
        self.ids
            .iter()
            .map(|id| ToolRef {
                tool_id: id.clone(),
            })
            .collect()
    }
}

/// One outgoing message in the completion body
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    /// The user's text as a single-part content
    pub content: Content,
}

/// The completion request body
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Always `next`; `stop` is reserved by the backend for cancellation
    pub action: String,
    /// Conversation this turn belongs to
    pub conversation_id: String,
    /// Causal parent of the turn; `None` for the first message
    pub parent_message_id: Option<String>,
    /// The user's new message(s); one per turn in practice
    pub messages: Vec<MessageRequest>,
    /// Selected model reference
    pub llm: LlmRef,
    /// Agent to route the request to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Tools selected for this request only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolRef>,
}

impl CompletionRequest {
    /// Build the body for one turn
    ///
    /// # Arguments
    ///
    /// * `conversation_id` - Conversation the turn belongs to
    /// * `parent_message_id` - Thread tip before the optimistic insert
    /// * `text` - The user's message text
    /// * `llm` - Selected model
    /// * `agent_id` - Optional agent routing
    /// * `tools` - Tool selection for this request
    pub fn next_turn(
        conversation_id: &str,
        parent_message_id: Option<&str>,
        text: &str,
        llm: &LlmModel,
        agent_id: Option<&str>,
        tools: &ToolSelection,
    ) -> Self {
        Self {
            action: "next".to_string(),
            conversation_id: conversation_id.to_string(),
            parent_message_id: parent_message_id.map(str::to_string),
            messages: vec![MessageRequest {
                content: Content::text(text),
            }],
            llm: LlmRef::from(llm),
            agent_id: agent_id.map(str::to_string),
            tools: tools.to_refs(),
        }
    }
}
