use async_trait::async_trait;
use colloquy_types::{ClearHistoryResponse, HealthReport, HistorySnapshot};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::{AgentError, Result};

/// Raw response body of a chat request, chunk by chunk as delivered by the network
pub type ByteStream = Pin<Box<dyn Stream<Item = std::result::Result<Vec<u8>, AgentError>> + Send>>;

/// Transport seam to the remote conversational agent
///
/// Implementations only move bytes and decode JSON; framing, dedup and
/// failure classification live in [`crate::StreamingClient`].
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// `POST {base}/chat_agent/{thread_id}/stream`
    async fn chat_stream(&self, thread_id: &str, request: &ChatRequest) -> Result<ByteStream>;

    /// `GET {base}/chat_agent/{thread_id}/history?limit=N`
    async fn history(&self, thread_id: &str, limit: u32) -> Result<HistorySnapshot>;

    /// `DELETE {base}/threads/{thread_id}`
    async fn clear_history(&self, thread_id: &str) -> Result<ClearHistoryResponse>;

    /// `GET {base}/health`
    async fn health(&self) -> Result<HealthReport>;
}

/// Body of a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub account_id: String,
    pub max_threads: usize,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, account_id: impl Into<String>, max_threads: usize) -> Self {
        Self {
            message: message.into(),
            account_id: account_id.into(),
            max_threads,
        }
    }
}
