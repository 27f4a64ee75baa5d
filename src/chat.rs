//! Conversation turns handed to the chat persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a chat, as stored by the web layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }

    /// Assistant turn for a generation outcome.
    ///
    /// Exhaustion becomes the fixed user-facing message, so the chat always
    /// gets a reply.
    pub fn from_outcome(outcome: &Result<String, GenerationError>) -> Self {
        match outcome {
            Ok(answer) => Self::assistant(answer.as_str()),
            Err(e) => Self::assistant(e.user_message()),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            style: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompletionError, EXHAUSTED_MESSAGE};

    #[test]
    fn answer_becomes_assistant_turn() {
        let turn = ConversationTurn::from_outcome(&Ok("Привет.".to_string()));
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Привет.");
        assert!(turn.style.is_none());
    }

    #[test]
    fn exhaustion_becomes_fixed_message() {
        let outcome = Err(GenerationError::PoolExhausted {
            attempts: 1,
            last_error: CompletionError::EmptyResponse,
        });
        let turn = ConversationTurn::from_outcome(&outcome);
        assert_eq!(turn.content, EXHAUSTED_MESSAGE);
    }

    #[test]
    fn serializes_with_lowercase_role() {
        let turn = ConversationTurn::user("Нарисуй кота").with_style("anime");
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["style"], "anime");

        let plain = serde_json::to_value(ConversationTurn::assistant("Ответ.")).unwrap();
        assert!(plain.get("style").is_none());
    }
}
