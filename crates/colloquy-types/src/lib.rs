pub mod thread;
pub mod message;
pub mod history;
pub mod quota;
pub mod health;

pub use thread::{derive_thread_name, Thread, ThreadRecord, PLACEHOLDER_NAME, THREAD_NAME_MAX_CHARS};
pub use message::{ChatMessage, Role, TRIGGER_MESSAGE};
pub use history::{ClearHistoryOutcome, ClearHistoryResponse, ClearStatus, HistorySnapshot};
pub use quota::Quota;
pub use health::{HealthReport, HealthStatus};
