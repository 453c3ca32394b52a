use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Remote source of truth for a thread
///
/// The agent bridge answers with a well-formed snapshot even when its own
/// storage is degraded, so a decode or transport failure means "unreachable",
/// never "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub exists: bool,
    pub is_empty: bool,
    pub has_user_messages: bool,
    pub message_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl HistorySnapshot {
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Thread exists remotely but never received a user message
    pub fn is_confirmed_empty(&self) -> bool {
        self.is_empty || !self.has_user_messages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearStatus {
    Deleted,
    NotFound,
}

/// Wire response of `DELETE /threads/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub status: ClearStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, alias = "checkpointsDeleted")]
    pub checkpoints_deleted: Option<u64>,
    #[serde(default, alias = "writesDeleted")]
    pub writes_deleted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearHistoryOutcome {
    pub deleted: bool,
    pub checkpoints_deleted: u64,
    pub writes_deleted: u64,
}

impl From<ClearHistoryResponse> for ClearHistoryOutcome {
    fn from(response: ClearHistoryResponse) -> Self {
        Self {
            deleted: response.status == ClearStatus::Deleted,
            checkpoints_deleted: response.checkpoints_deleted.unwrap_or(0),
            writes_deleted: response.writes_deleted.unwrap_or(0),
        }
    }
}
