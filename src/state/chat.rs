//! AI task-logger transcript and persisted conversation id.
//!
//! SYSTEM CONTEXT
//! ==============
//! The AI proxy keeps conversation history server-side keyed by a session id.
//! The id it returns is remembered in storage so a reload continues the same
//! conversation; clearing the transcript forgets it.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use crate::net::error::ApiError;
use crate::net::types::{AiReply, ChatRole};
use crate::util::storage::KeyValueStorage;

/// Storage key of the AI proxy conversation id.
pub const SESSION_ID_KEY: &str = "ai-task-logger-session-id";

/// A single transcript turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    fn new(role: ChatRole, content: String) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), role, content }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub turns: Vec<ChatTurn>,
    pub loading: bool,
    pub error: Option<String>,
    pub session_id: Option<String>,
    /// Bumped by `clear`; replies to prompts from an older conversation are dropped.
    generation: u64,
}

/// A prompt that has been recorded and is waiting for its reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingPrompt {
    pub text: String,
    generation: u64,
}

impl ChatState {
    /// Fresh transcript that continues the stored conversation, if any.
    pub fn restore(storage: &impl KeyValueStorage) -> Self {
        let session_id = storage.get_item(SESSION_ID_KEY).filter(|id| !id.is_empty());
        Self { session_id, ..Self::default() }
    }

    /// Record an outgoing prompt. Returns the trimmed prompt, or `None` when
    /// there is nothing to send or a reply is still pending.
    pub fn begin_prompt(&mut self, input: &str) -> Option<PendingPrompt> {
        let prompt = input.trim();
        if prompt.is_empty() || self.loading {
            return None;
        }
        self.turns.push(ChatTurn::new(ChatRole::User, prompt.to_owned()));
        self.error = None;
        self.loading = true;
        Some(PendingPrompt { text: prompt.to_owned(), generation: self.generation })
    }

    fn is_current(&self, pending: &PendingPrompt) -> bool {
        if pending.generation == self.generation {
            return true;
        }
        log::debug!("dropping ai reply from a cleared conversation");
        false
    }

    /// Append the assistant reply to `pending` and remember its conversation
    /// id. Returns whether the reply changed any tasks. A reply that arrives
    /// after `clear` changes nothing.
    pub fn record_reply(&mut self, pending: &PendingPrompt, reply: AiReply, storage: &impl KeyValueStorage) -> bool {
        if !self.is_current(pending) {
            return false;
        }
        self.loading = false;
        if let Some(id) = reply.session_id.as_deref().filter(|id| !id.is_empty())
            && self.session_id.as_deref() != Some(id)
        {
            if let Err(e) = storage.set_item(SESSION_ID_KEY, id) {
                log::warn!("failed to persist ai session id: {e}");
            }
            self.session_id = Some(id.to_owned());
        }
        let logged = reply.logged_tasks();
        self.turns.push(ChatTurn::new(ChatRole::Assistant, reply.message));
        logged
    }

    /// Show a failed prompt both as a banner and as an assistant turn.
    pub fn record_failure(&mut self, pending: &PendingPrompt, err: &ApiError) {
        if !self.is_current(pending) {
            return;
        }
        self.loading = false;
        let message = err.to_string();
        self.turns.push(ChatTurn::new(
            ChatRole::Assistant,
            format!("I encountered an error: {message}. Please try again or rephrase your request."),
        ));
        self.error = Some(message);
    }

    /// Start a new conversation. Replies still in flight are ignored.
    pub fn clear(&mut self, storage: &impl KeyValueStorage) {
        *self = Self { generation: self.generation + 1, ..Self::default() };
        if let Err(e) = storage.remove_item(SESSION_ID_KEY) {
            log::warn!("failed to forget ai session id: {e}");
        }
    }
}
