//! # Colloquy - conversation sessions for a remote chat agent
//!
//! Colloquy keeps the client side of a chat with a remote agent honest:
//! - **Threads** per account, bounded by a subscription-tier quota, with
//!   lazy creation and oldest-first eviction
//! - **Cached transcripts** rendered instantly and revalidated against the
//!   agent's history
//! - **Streaming replies** over a chunked `data: <json>` protocol that
//!   survive malformed frames, replayed replies and dropped connections
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use colloquy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = ColloquyBuilder::new()
//!         .base_url("http://localhost:8000")
//!         .account("account-123456", Some(5))
//!         .build()
//!         .await?;
//!
//!     session.ensure_thread_on_focus().await;
//!     let outcome = session.send_message("What is Rust?").await?;
//!     println!("{:?}: {:?}", outcome, session.view().messages.last());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **colloquy-types**: data model (Thread, ChatMessage, HistorySnapshot, Quota)
//! - **colloquy-stream**: StreamingClient and the HTTP agent bridge
//! - **colloquy-persist**: ThreadRegistry, MessageCache and thread-list stores
//! - **colloquy-session**: SessionOrchestrator tying them together
//!
//! ## Features
//!
//! - `mongodb`: MongoDB thread-list store

// Re-export all public APIs
pub use colloquy_persist as persist;
pub use colloquy_session as session;
pub use colloquy_stream as stream;
pub use colloquy_types as types;

// Re-export commonly used types
pub use colloquy_persist::{MessageCache, ThreadListStore, ThreadRegistry};
pub use colloquy_session::{SessionError, SessionOrchestrator, SessionView};
pub use colloquy_stream::{AgentConfig, StreamOutcome, StreamingClient};
pub use colloquy_types::{ChatMessage, Quota, Role, Thread};

/// High-level builder for wiring a session
pub mod builder;

/// Convenient prelude with commonly used types
pub mod prelude {
    pub use crate::builder::ColloquyBuilder;
    pub use crate::session::{OverflowPrompt, SessionError, SessionOrchestrator, SessionUi};
    pub use crate::stream::{AgentConfig, StreamOutcome};
    pub use crate::types::{ChatMessage, Role, Thread};
    pub use anyhow::Result;
}
