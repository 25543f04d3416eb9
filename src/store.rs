//! In-session message store
//!
//! Holds the messages of the currently open conversation as a
//! parent-linked forest in arrival order. While a turn is streaming, the
//! store carries two locally fabricated messages (the echoed user prompt
//! and the growing assistant reply); once the turn settles, the whole
//! store is replaced with the server's authoritative message list.
//!
//! Every message is tagged with its [`MessageOrigin`] so callers can tell
//! a provisional local echo from settled server state.

use chrono::Utc;
use uuid::Uuid;

use crate::api::types::{Content, LlmModel, Message, Role};
use crate::error::{CovoError, Result};

/// Where a stored message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    /// Fabricated locally during an in-flight turn; identifiers are
    /// temporary and never survive settlement
    Local,
    /// Fetched from the server after a turn settled
    Server,
}

/// A message together with its provenance tag
#[derive(Debug, Clone)]
pub struct StoredMessage {
    /// The message itself
    pub message: Message,
    /// Whether it is a local echo or settled server state
    pub origin: MessageOrigin,
}

/// Message list for one open conversation
///
/// Messages are kept in arrival order; the last message is the thread
/// tip and becomes the parent of the next turn's user message.
///
/// # Examples
///
/// ```
/// use covo::store::MessageStore;
///
/// let mut store = MessageStore::new();
/// let user_id = store.append_user_message("hello", None).unwrap();
/// let reply_id = store.append_assistant_placeholder(&user_id, None, None).unwrap();
/// store.update_content(&reply_id, "Hi there").unwrap();
/// assert_eq!(store.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<StoredMessage>,
}

impl MessageStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in arrival order
    pub fn messages(&self) -> &[StoredMessage] {
        &self.messages
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any
    ///
    /// This is the thread tip: the next user message is parented on it.
    pub fn tip(&self) -> Option<&Message> {
        self.messages.last().map(|stored| &stored.message)
    }

    /// Looks up a message by identifier
    pub fn get(&self, message_id: &str) -> Option<&Message> {
        self.messages
            .iter()
            .map(|stored| &stored.message)
            .find(|message| message.message_id == message_id)
    }

    /// Appends the locally echoed user message of a new turn
    ///
    /// The message is parented on the current thread tip and carries a
    /// temporary identifier. Returns that identifier.
    pub fn append_user_message(&mut self, text: &str, llm: Option<LlmModel>) -> Result<String> {
        let parent_message_id = self.tip().map(|tip| tip.message_id.clone());
        let now = Utc::now();
        let message = Message {
            message_id: Uuid::new_v4().to_string(),
            parent_message_id,
            role: Role::User,
            content: Content::text(text),
            llm,
            agent_id: None,
            created_at: now,
            updated_at: now,
        };
        self.push_local(message)
    }

    /// Appends the empty assistant placeholder a streaming turn fills in
    ///
    /// The placeholder is parented on the turn's user message so the
    /// reply stays attached to its prompt even if frames never arrive.
    /// Model and agent metadata are attached up front so the reply can be
    /// labelled before the first token lands.
    pub fn append_assistant_placeholder(
        &mut self,
        parent_message_id: &str,
        llm: Option<LlmModel>,
        agent_id: Option<String>,
    ) -> Result<String> {
        if self.get(parent_message_id).is_none() {
            return Err(CovoError::Store(format!(
                "parent message not found: {}",
                parent_message_id
            ))
            .into());
        }
        let now = Utc::now();
        let message = Message {
            message_id: Uuid::new_v4().to_string(),
            parent_message_id: Some(parent_message_id.to_string()),
            role: Role::Assistant,
            content: Content::empty(),
            llm,
            agent_id,
            created_at: now,
            updated_at: now,
        };
        self.push_local(message)
    }

    /// Replaces a message's content in place
    ///
    /// Only the content and the update timestamp change; identifier,
    /// parent link and role are immutable once appended.
    pub fn update_content(&mut self, message_id: &str, text: &str) -> Result<()> {
        let stored = self
            .messages
            .iter_mut()
            .find(|stored| stored.message.message_id == message_id)
            .ok_or_else(|| {
                CovoError::Store(format!("message not found: {}", message_id))
            })?;
        stored.message.content = Content::text(text);
        stored.message.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the whole store with the server's settled message list
    ///
    /// Local echoes and their temporary identifiers are discarded; the
    /// server list is authoritative.
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages
            .into_iter()
            .map(|message| StoredMessage {
                message,
                origin: MessageOrigin::Server,
            })
            .collect();
    }

    /// Drops all messages, e.g. when switching conversations
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push_local(&mut self, message: Message) -> Result<String> {
        if self.get(&message.message_id).is_some() {
            return Err(CovoError::Store(format!(
                "duplicate message id: {}",
                message.message_id
            ))
            .into());
        }
        let message_id = message.message_id.clone();
        self.messages.push(StoredMessage {
            message,
            origin: MessageOrigin::Local,
        });
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_message(id: &str, parent: Option<&str>, role: Role, text: &str) -> Message {
        let now = Utc::now();
        Message {
            message_id: id.to_string(),
            parent_message_id: parent.map(str::to_string),
            role,
            content: Content::text(text),
            llm: None,
            agent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_store_has_no_tip() {
        let store = MessageStore::new();
        assert!(store.is_empty());
        assert!(store.tip().is_none());
    }

    #[test]
    fn test_user_message_parented_on_tip() {
        let mut store = MessageStore::new();
        let first = store.append_user_message("first", None).unwrap();
        let reply = store.append_assistant_placeholder(&first, None, None).unwrap();
        let second = store.append_user_message("second", None).unwrap();

        let message = store.get(&second).unwrap();
        assert_eq!(message.parent_message_id.as_deref(), Some(reply.as_str()));
    }

    #[test]
    fn test_first_user_message_is_thread_root() {
        let mut store = MessageStore::new();
        let id = store.append_user_message("hello", None).unwrap();
        assert!(store.get(&id).unwrap().parent_message_id.is_none());
    }

    #[test]
    fn test_placeholder_starts_empty_and_links_to_user() {
        let mut store = MessageStore::new();
        let user_id = store.append_user_message("hello", None).unwrap();
        let reply_id = store.append_assistant_placeholder(&user_id, None, None).unwrap();

        let placeholder = store.get(&reply_id).unwrap();
        assert_eq!(placeholder.role, Role::Assistant);
        assert_eq!(placeholder.parent_message_id.as_deref(), Some(user_id.as_str()));
        assert!(placeholder.content.joined().is_empty());
    }

    #[test]
    fn test_placeholder_carries_model_metadata() {
        let mut store = MessageStore::new();
        let user_id = store.append_user_message("hello", None).unwrap();
        let llm = LlmModel {
            issuer: "openai".to_string(),
            deployment_id: "gpt-4".to_string(),
            name: None,
            description: None,
            icon_link: None,
        };
        let reply_id = store
            .append_assistant_placeholder(&user_id, Some(llm), Some("agent-1".to_string()))
            .unwrap();
        let placeholder = store.get(&reply_id).unwrap();
        assert_eq!(
            placeholder.llm.as_ref().unwrap().deployment_id,
            "gpt-4"
        );
        assert_eq!(placeholder.agent_id.as_deref(), Some("agent-1"));
    }

    #[test]
    fn test_placeholder_requires_existing_parent() {
        let mut store = MessageStore::new();
        assert!(store.append_assistant_placeholder("missing", None, None).is_err());
    }

    #[test]
    fn test_update_content_mutates_only_content() {
        let mut store = MessageStore::new();
        let user_id = store.append_user_message("hello", None).unwrap();
        let reply_id = store.append_assistant_placeholder(&user_id, None, None).unwrap();

        store.update_content(&reply_id, "partial").unwrap();
        store.update_content(&reply_id, "partial reply").unwrap();

        let message = store.get(&reply_id).unwrap();
        assert_eq!(message.content.joined(), "partial reply");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.parent_message_id.as_deref(), Some(user_id.as_str()));
    }

    #[test]
    fn test_update_content_unknown_id_fails() {
        let mut store = MessageStore::new();
        assert!(store.update_content("missing", "text").is_err());
    }

    #[test]
    fn test_local_messages_are_tagged_local() {
        let mut store = MessageStore::new();
        store.append_user_message("hello", None).unwrap();
        assert_eq!(store.messages()[0].origin, MessageOrigin::Local);
    }

    #[test]
    fn test_replace_all_discards_local_echoes() {
        let mut store = MessageStore::new();
        let user_id = store.append_user_message("hello", None).unwrap();
        store.append_assistant_placeholder(&user_id, None, None).unwrap();

        store.replace_all(vec![
            server_message("srv-1", None, Role::User, "hello"),
            server_message("srv-2", Some("srv-1"), Role::Assistant, "Hi there"),
        ]);

        assert_eq!(store.len(), 2);
        assert!(store.get(&user_id).is_none());
        assert!(store
            .messages()
            .iter()
            .all(|stored| stored.origin == MessageOrigin::Server));
        assert_eq!(store.tip().unwrap().message_id, "srv-2");
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = MessageStore::new();
        store.append_user_message("hello", None).unwrap();
        store.clear();
        assert!(store.is_empty());
    }
}
