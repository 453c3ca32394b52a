use serde::{Deserialize, Serialize};

/// Payload of a single `data: <json>` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental piece of the assistant reply
    Content {
        content: String,
    },

    /// The agent failed to produce a reply
    Error {
        #[serde(default)]
        message: String,
    },

    /// Frame types this client does not act on
    #[serde(other)]
    Unknown,
}
