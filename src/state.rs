//! Conversation state shown by the chat surface.
//!
//! DESIGN
//! ======
//! `Conversation` owns the ordered message list. Model messages are created
//! empty with `is_streaming = true`, grow in place as fragments arrive, and
//! are closed by [`Conversation::finish`]. At most one message streams at a
//! time; opening a second is refused.

use serde::{Deserialize, Serialize};

use crate::llm::types::Role;
use crate::services::session::ChatError;

// =============================================================================
// MESSAGE
// =============================================================================

/// Opaque, creation-ordered message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

/// A single message in the chat surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub is_streaming: bool,
}

// =============================================================================
// CONVERSATION
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation opened by a finished model greeting.
    #[must_use]
    pub fn with_greeting(text: &str) -> Self {
        let mut conversation = Self::new();
        let id = conversation.alloc_id();
        conversation
            .messages
            .push(ChatMessage { id, role: Role::Model, text: text.to_string(), is_streaming: false });
        conversation
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// The model message currently receiving fragments, if any.
    #[must_use]
    pub fn streaming(&self) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.is_streaming)
    }

    /// Append an immutable user message.
    pub fn push_user(&mut self, text: &str) -> MessageId {
        let id = self.alloc_id();
        self.messages
            .push(ChatMessage { id, role: Role::User, text: text.to_string(), is_streaming: false });
        id
    }

    /// Open an empty, streaming model message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::StreamInProgress`] if another message is still streaming.
    pub fn begin_model(&mut self) -> Result<MessageId, ChatError> {
        if let Some(open) = self.streaming() {
            return Err(ChatError::StreamInProgress(open.id));
        }
        let id = self.alloc_id();
        self.messages
            .push(ChatMessage { id, role: Role::Model, text: String::new(), is_streaming: true });
        Ok(id)
    }

    /// Grow a streaming message. Returns `false` if `id` is unknown or closed.
    pub fn append(&mut self, id: MessageId, fragment: &str) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.is_streaming)
        {
            Some(message) => {
                message.text.push_str(fragment);
                true
            }
            None => false,
        }
    }

    /// Close a streaming message. Idempotent.
    pub fn finish(&mut self, id: MessageId) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.is_streaming = false;
        }
    }

    fn alloc_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
