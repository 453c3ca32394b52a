use colloquy_types::{HistorySnapshot, Role};

use crate::error::AgentError;

pub const REPLY_FAILED_NOTICE: &str = "Error getting response. Please try again.";
pub const REPLY_INTERRUPTED_NOTICE: &str =
    "Your message was received, but the reply was interrupted. Please ask again.";
pub const SEND_FAILED_NOTICE: &str = "Message failed to send. Please try again.";
pub const CONNECTION_NOTICE: &str = "Connection error. Check your internet connection and try again.";

/// What a failed send actually left behind on the remote side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The user message was stored; only the reply was lost
    ReplyInterrupted,
    /// The user message never made it
    NotDelivered,
    /// The history check itself failed
    Unverified,
}

impl Reconciliation {
    /// Classify from the history fetched right after the failure
    pub fn classify(sent: &str, history: Result<&HistorySnapshot, &AgentError>) -> Self {
        match history {
            Ok(snapshot) => match snapshot.last_message() {
                Some(last) if last.role == Role::User && last.text == sent => {
                    Reconciliation::ReplyInterrupted
                }
                _ => Reconciliation::NotDelivered,
            },
            Err(_) => Reconciliation::Unverified,
        }
    }

    /// Inline text shown in place of the assistant reply
    pub fn notice(self) -> &'static str {
        match self {
            Reconciliation::ReplyInterrupted => REPLY_INTERRUPTED_NOTICE,
            Reconciliation::NotDelivered => SEND_FAILED_NOTICE,
            Reconciliation::Unverified => CONNECTION_NOTICE,
        }
    }
}
