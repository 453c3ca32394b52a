use colloquy_types::{ClearHistoryOutcome, HealthReport, HistorySnapshot, Quota, TRIGGER_MESSAGE};
use futures::StreamExt;
use std::sync::Arc;

use crate::accumulator::ReplyAccumulator;
use crate::buffer_utils::{parse_frame_stream, StreamFault};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::observer::StreamObserver;
use crate::reconcile::{Reconciliation, REPLY_FAILED_NOTICE};
use crate::streaming::StreamEvent;
use crate::traits::{AgentClient, ChatRequest};

/// How a streamed turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The stream closed normally
    Completed,
    /// The agent sent an error frame
    AgentFailed,
    /// The transport broke; the reply now holds the reconciliation notice
    Interrupted(Reconciliation),
}

impl StreamOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StreamOutcome::Completed)
    }
}

/// Protocol-level client for the remote agent
///
/// Owns the chat framing rules: replay dedup, per-frame error tolerance and
/// the post-failure reconciliation. Nothing here returns a transport error
/// to the caller of [`StreamingClient::stream`]; every failure ends in a
/// notice written into the reply.
#[derive(Clone)]
pub struct StreamingClient {
    agent: Arc<dyn AgentClient>,
    config: AgentConfig,
    account_id: String,
    quota: Quota,
}

impl StreamingClient {
    pub fn new(agent: Arc<dyn AgentClient>, account_id: impl Into<String>, quota: Quota) -> Self {
        Self {
            agent,
            config: AgentConfig::default(),
            account_id: account_id.into(),
            quota,
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn history_limit(&self) -> u32 {
        self.config.history_limit
    }

    fn request(&self, message: &str) -> ChatRequest {
        ChatRequest::new(message, self.account_id.clone(), self.quota.get())
    }

    /// Warm the remote state of a thread before it exists locally
    ///
    /// The reply is drained and dropped. Returns whether the agent
    /// acknowledged the request; failures are only logged.
    pub async fn send_trigger(&self, thread_id: &str) -> bool {
        let request = self.request(TRIGGER_MESSAGE);

        let mut body = match self.agent.chat_stream(thread_id, &request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(thread_id = %thread_id, error = %e, "Trigger request failed");
                return false;
            }
        };

        let mut bytes = 0usize;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => bytes += chunk.len(),
                Err(e) => {
                    tracing::warn!(thread_id = %thread_id, error = %e, "Trigger reply broke off");
                    return false;
                }
            }
        }

        tracing::debug!(thread_id = %thread_id, bytes, "Trigger acknowledged");
        true
    }

    /// Send `message` and stream the reply into `reply`
    pub async fn stream(
        &self,
        message: &str,
        thread_id: &str,
        reply: &mut ReplyAccumulator,
        observer: &mut dyn StreamObserver,
    ) -> StreamOutcome {
        let request = self.request(message);

        let body = match self.agent.chat_stream(thread_id, &request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(thread_id = %thread_id, error = %e, "Chat request failed");
                return self.recover(message, thread_id, reply, observer).await;
            }
        };

        let mut frames = parse_frame_stream(body);
        let mut loading = true;
        let mut failed = false;

        while let Some(item) = frames.next().await {
            match item {
                Ok(StreamEvent::Content { content }) => {
                    if failed {
                        tracing::warn!(thread_id = %thread_id, "Content after error frame ignored");
                        continue;
                    }

                    if loading {
                        loading = false;
                        observer.on_loading_change(false);
                    }

                    if !reply.push(&content) {
                        tracing::warn!(
                            thread_id = %thread_id,
                            len = content.len(),
                            "Discarding replayed full reply"
                        );
                        continue;
                    }

                    tracing::debug!(thread_id = %thread_id, len = content.len(), "Content chunk");
                    observer.on_content(&content, reply.text());
                    observer.on_scroll();
                }
                Ok(StreamEvent::Error { message: detail }) => {
                    tracing::error!(thread_id = %thread_id, detail = %detail, "Agent reported an error");
                    failed = true;
                    reply.replace(REPLY_FAILED_NOTICE);
                    observer.on_error(REPLY_FAILED_NOTICE, reply.text());
                    loading = false;
                    observer.on_loading_change(false);
                }
                Ok(StreamEvent::Unknown) => {
                    tracing::debug!(thread_id = %thread_id, "Ignoring unknown frame type");
                }
                Err(StreamFault::Frame(e)) => {
                    tracing::warn!(thread_id = %thread_id, error = %e, "Skipping malformed frame");
                }
                Err(StreamFault::Transport(e)) => {
                    tracing::error!(thread_id = %thread_id, error = %e, "Reply stream broke off");
                    return self.recover(message, thread_id, reply, observer).await;
                }
            }
        }

        if loading {
            observer.on_loading_change(false);
        }

        if failed {
            return StreamOutcome::AgentFailed;
        }

        tracing::info!(
            thread_id = %thread_id,
            chunks = reply.chunk_count(),
            discarded = reply.discarded_count(),
            "Reply complete"
        );

        if !reply.is_blank() {
            observer.on_speak(reply.text());
        }

        StreamOutcome::Completed
    }

    /// Classify what a failed send left behind and show the matching notice
    async fn recover(
        &self,
        message: &str,
        thread_id: &str,
        reply: &mut ReplyAccumulator,
        observer: &mut dyn StreamObserver,
    ) -> StreamOutcome {
        let history = self
            .agent
            .history(thread_id, self.config.reconcile_limit)
            .await;

        if let Err(e) = &history {
            tracing::error!(thread_id = %thread_id, error = %e, "Reconciliation check failed");
        }

        let outcome = Reconciliation::classify(message, history.as_ref());
        tracing::info!(thread_id = %thread_id, outcome = ?outcome, "Send reconciled");

        reply.replace(outcome.notice());
        observer.on_error(outcome.notice(), reply.text());
        observer.on_loading_change(false);

        StreamOutcome::Interrupted(outcome)
    }

    pub async fn get_history(&self, thread_id: &str, limit: u32) -> Result<HistorySnapshot> {
        let snapshot = self.agent.history(thread_id, limit).await?;
        tracing::debug!(
            thread_id = %thread_id,
            exists = snapshot.exists,
            count = snapshot.message_count,
            "History fetched"
        );
        Ok(snapshot)
    }

    pub async fn clear_history(&self, thread_id: &str) -> Result<ClearHistoryOutcome> {
        let response = self.agent.clear_history(thread_id).await?;
        Ok(ClearHistoryOutcome::from(response))
    }

    /// Backend health; any failure reads as `down`
    pub async fn health(&self) -> HealthReport {
        match self.agent.health().await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                HealthReport::down()
            }
        }
    }
}
