//! Role-tagged conversation history
//!
//! The history accumulates user and assistant turns across the whole
//! conversation. The system message is pinned: clearing the history
//! keeps it, so the robot's persona survives a "clear history" command.

use serde::{Deserialize, Serialize};

/// Persona instruction sent as the pinned system message
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful robot assistant. Reply clearly and concisely.";

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The conversation so far, system message first.
///
/// Owned by the conversation loop; pipelines only read it.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Drop everything except the pinned system message
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of user/assistant messages, not counting the system message
    pub fn turn_message_count(&self) -> usize {
        self.messages.len().saturating_sub(1)
    }

    /// The most recent user message, if any
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_starts_with_system_message() {
        let history = ChatHistory::default();
        assert_eq!(history.messages().len(), 1);
        assert_eq!(history.messages()[0].role, Role::System);
        assert_eq!(history.turn_message_count(), 0);
    }

    #[test]
    fn test_turns_accumulate_in_order() {
        let mut history = ChatHistory::default();
        history.push_user("hello robot");
        history.push_assistant("Hello! How can I help?");
        history.push_user("tell me about music");

        assert_eq!(history.turn_message_count(), 3);
        assert_eq!(history.last_user_message(), Some("tell me about music"));
    }

    #[test]
    fn test_clear_keeps_only_the_system_message() {
        let mut history = ChatHistory::new("stay helpful");
        history.push_user("hello");
        history.push_assistant("hi");

        history.clear();

        assert_eq!(history.messages().len(), 1);
        assert_eq!(history.messages()[0].role, Role::System);
        assert_eq!(history.messages()[0].content, "stay helpful");
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let message = ChatMessage::assistant("ok");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
