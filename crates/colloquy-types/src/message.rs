use serde::{Deserialize, Serialize};

/// Fixed payload sent to warm remote per-thread state before any real content
pub const TRIGGER_MESSAGE: &str = "start-loading-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Anything else the remote history may carry (system, tool)
    #[serde(other)]
    Other,
}

/// A single entry of a thread transcript
///
/// The agent bridge names the text field `message`; older payloads used
/// `content`, which is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(rename = "message", alias = "content", default)]
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_trigger(&self) -> bool {
        self.text == TRIGGER_MESSAGE
    }
}
