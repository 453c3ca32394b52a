use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name carried by a thread until its first real message arrives
pub const PLACEHOLDER_NAME: &str = ". . .";

/// Thread names derived from a message keep at most this many characters
pub const THREAD_NAME_MAX_CHARS: usize = 50;

/// A conversation context tracked by the session
///
/// Position in the owning list is the recency signal; `created_at` is
/// informational only and is not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a provisional thread carrying the placeholder name
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self::new(id, PLACEHOLDER_NAME)
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }

    pub fn to_record(&self) -> ThreadRecord {
        ThreadRecord {
            thread_id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Persisted shape of a thread in the account metadata list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    pub thread_id: String,
    pub name: String,
}

impl From<ThreadRecord> for Thread {
    fn from(record: ThreadRecord) -> Self {
        Thread::new(record.thread_id, record.name)
    }
}

/// Derive a display name from the first real message of a thread
pub fn derive_thread_name(text: &str) -> String {
    text.chars().take(THREAD_NAME_MAX_CHARS).collect()
}
