pub mod accumulator;
pub mod bridge;
pub mod buffer_utils;
pub mod client;
pub mod config;
pub mod error;
pub mod observer;
pub mod reconcile;
pub mod streaming;
pub mod traits;

pub use accumulator::ReplyAccumulator;
pub use bridge::HttpAgentClient;
pub use client::{StreamOutcome, StreamingClient};
pub use config::AgentConfig;
pub use error::{AgentError, FrameError};
pub use observer::{NoopObserver, StreamObserver};
pub use reconcile::{
    Reconciliation, CONNECTION_NOTICE, REPLY_FAILED_NOTICE, REPLY_INTERRUPTED_NOTICE,
    SEND_FAILED_NOTICE,
};
pub use streaming::StreamEvent;
pub use traits::{AgentClient, ByteStream, ChatRequest};
