#![allow(dead_code)]

use async_trait::async_trait;
use colloquy_persist::{InMemoryThreadListStore, MessageCache, ThreadRegistry};
use colloquy_session::{OverflowPrompt, SessionOrchestrator, SessionUi};
use colloquy_stream::{AgentClient, AgentError, ByteStream, ChatRequest, StreamingClient};
use colloquy_types::{
    ChatMessage, ClearHistoryResponse, ClearStatus, HealthReport, HistorySnapshot, Quota, Thread,
    ThreadRecord, TRIGGER_MESSAGE,
};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const ACCOUNT: &str = "account-123456";

/// How the fake answers a history request for one thread
#[derive(Clone)]
pub enum Remote {
    Missing,
    Transcript(Vec<ChatMessage>),
    Unreachable,
}

/// How the fake answers a chat request
#[derive(Clone)]
pub enum Reply {
    /// Stream back `re: <message>` in two chunks
    Echo,
    /// The connection breaks before any content arrives
    Broken,
    /// Like `Echo`, but the second chunk waits for the gate
    Stalled(Arc<Notify>),
}

pub struct FakeAgent {
    pub trigger_ok: AtomicBool,
    pub reply: Mutex<Reply>,
    pub remote: Mutex<HashMap<String, Remote>>,
    pub history_gate: Mutex<Option<Arc<Notify>>>,
    pub chats: Mutex<Vec<(String, String)>>,
    pub cleared: Mutex<Vec<String>>,
}

impl Default for FakeAgent {
    fn default() -> Self {
        Self {
            trigger_ok: AtomicBool::new(true),
            reply: Mutex::new(Reply::Echo),
            remote: Mutex::new(HashMap::new()),
            history_gate: Mutex::new(None),
            chats: Mutex::new(Vec::new()),
            cleared: Mutex::new(Vec::new()),
        }
    }
}

impl FakeAgent {
    pub fn set_remote(&self, thread_id: &str, remote: Remote) {
        self.remote
            .lock()
            .unwrap()
            .insert(thread_id.to_string(), remote);
    }

    pub fn fail_triggers(&self) {
        self.trigger_ok.store(false, Ordering::SeqCst);
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Real (non-trigger) messages sent so far
    pub fn sent_messages(&self) -> Vec<String> {
        self.chats
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message != TRIGGER_MESSAGE)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn triggers(&self) -> usize {
        self.chats
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message == TRIGGER_MESSAGE)
            .count()
    }

    pub fn cleared(&self) -> Vec<String> {
        self.cleared.lock().unwrap().clone()
    }
}

fn frame(content: &str) -> Vec<u8> {
    let payload = serde_json::json!({ "type": "content", "content": content });
    format!("data: {}\n\n", payload).into_bytes()
}

#[async_trait]
impl AgentClient for FakeAgent {
    async fn chat_stream(
        &self,
        thread_id: &str,
        request: &ChatRequest,
    ) -> colloquy_stream::error::Result<ByteStream> {
        self.chats
            .lock()
            .unwrap()
            .push((thread_id.to_string(), request.message.clone()));

        if request.message == TRIGGER_MESSAGE {
            if !self.trigger_ok.load(Ordering::SeqCst) {
                return Err(AgentError::Status {
                    status: 500,
                    body: "internal error".to_string(),
                });
            }
            return Ok(Box::pin(futures::stream::iter(vec![Ok(frame("ready"))])));
        }

        let reply = self.reply.lock().unwrap().clone();
        let items: Vec<Result<Vec<u8>, AgentError>> = match reply {
            Reply::Echo => vec![Ok(frame("re: ")), Ok(frame(&request.message))],
            Reply::Broken => vec![Err(AgentError::Stream("connection reset".to_string()))],
            Reply::Stalled(gate) => {
                let head: Vec<Result<Vec<u8>, AgentError>> = vec![Ok(frame("re: "))];
                let rest = frame(&request.message);
                let tail = futures::stream::once(async move {
                    gate.notified().await;
                    Ok::<_, AgentError>(rest)
                });
                return Ok(Box::pin(futures::stream::iter(head).chain(tail)));
            }
        };
        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn history(
        &self,
        thread_id: &str,
        _limit: u32,
    ) -> colloquy_stream::error::Result<HistorySnapshot> {
        let gate = self.history_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let remote = self
            .remote
            .lock()
            .unwrap()
            .get(thread_id)
            .cloned()
            .unwrap_or(Remote::Missing);

        match remote {
            Remote::Missing => Ok(HistorySnapshot::default()),
            Remote::Transcript(messages) => Ok(HistorySnapshot {
                exists: true,
                is_empty: messages.is_empty(),
                has_user_messages: messages.iter().any(|m| m.is_user()),
                message_count: messages.len() as u64,
                thread_id: Some(thread_id.to_string()),
                last_updated: None,
                messages,
            }),
            Remote::Unreachable => Err(AgentError::Stream("network down".to_string())),
        }
    }

    async fn clear_history(
        &self,
        thread_id: &str,
    ) -> colloquy_stream::error::Result<ClearHistoryResponse> {
        self.cleared.lock().unwrap().push(thread_id.to_string());
        Ok(ClearHistoryResponse {
            status: ClearStatus::Deleted,
            thread_id: Some(thread_id.to_string()),
            checkpoints_deleted: Some(2),
            writes_deleted: Some(3),
            message: None,
        })
    }

    async fn health(&self) -> colloquy_stream::error::Result<HealthReport> {
        Ok(HealthReport::down())
    }
}

/// Prompt that records every question and answers with a fixed choice
pub struct ScriptedPrompt {
    pub accept: bool,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl OverflowPrompt for ScriptedPrompt {
    async fn confirm_evict_oldest(&self, oldest: &Thread, _quota: Quota) -> bool {
        self.asked.lock().unwrap().push(oldest.id.clone());
        self.accept
    }
}

#[derive(Default)]
pub struct RecordingUi {
    pub spoken: Mutex<Vec<String>>,
    pub loading: Mutex<Vec<bool>>,
}

impl SessionUi for RecordingUi {
    fn loading_changed(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }

    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

pub struct Harness {
    pub session: Arc<SessionOrchestrator>,
    pub agent: Arc<FakeAgent>,
    pub store: Arc<InMemoryThreadListStore>,
    pub prompt: Arc<ScriptedPrompt>,
    pub ui: Arc<RecordingUi>,
}

impl Harness {
    pub fn registry(&self) -> &Arc<ThreadRegistry> {
        self.session.registry()
    }

    pub fn ids(&self) -> Vec<String> {
        self.registry().threads().into_iter().map(|t| t.id).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.registry().threads().into_iter().map(|t| t.name).collect()
    }
}

pub fn record(id: &str, name: &str) -> ThreadRecord {
    ThreadRecord {
        thread_id: id.to_string(),
        name: name.to_string(),
    }
}

/// Session over a stored thread list, with the given tier and prompt answer
pub async fn harness(records: Vec<ThreadRecord>, tier: Option<u32>, accept: bool) -> Harness {
    harness_with_cache(records, tier, accept, MessageCache::new()).await
}

pub async fn harness_with_cache(
    records: Vec<ThreadRecord>,
    tier: Option<u32>,
    accept: bool,
    cache: MessageCache,
) -> Harness {
    let store = Arc::new(InMemoryThreadListStore::new().with_list(ACCOUNT, records));
    let registry = Arc::new(ThreadRegistry::load(store.clone(), Arc::new(cache), ACCOUNT, tier).await);

    let agent = Arc::new(FakeAgent::default());
    let client = StreamingClient::new(agent.clone(), ACCOUNT, registry.quota());
    let prompt = Arc::new(ScriptedPrompt::new(accept));
    let ui = Arc::new(RecordingUi::default());

    let session = SessionOrchestrator::builder()
        .registry(registry)
        .client(client)
        .prompt(prompt.clone())
        .ui(ui.clone())
        .build()
        .unwrap();

    Harness {
        session: Arc::new(session),
        agent,
        store,
        prompt,
        ui,
    }
}
