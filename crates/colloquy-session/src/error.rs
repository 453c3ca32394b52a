use thiserror::Error;

/// Refusals surfaced to the user by session flows
///
/// Transport and persistence failures never appear here; they end in an
/// inline notice or a log line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Maximum number of chats reached ({0})")]
    QuotaReached(usize),

    #[error("Server unavailable, please try again later")]
    AgentUnavailable,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Message not sent: oldest chat was kept")]
    OverflowDeclined,

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("No thread selected")]
    NoCurrentThread,

    #[error("Session is missing its {0}")]
    MissingComponent(&'static str),
}

pub type Result<T> = std::result::Result<T, SessionError>;
