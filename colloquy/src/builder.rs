//! High-level builder API for creating sessions

use crate::persist::{InMemoryThreadListStore, MessageCache, ThreadListStore, ThreadRegistry};
use crate::session::{OverflowPrompt, SessionOrchestrator, SessionUi};
use crate::stream::{AgentConfig, HttpAgentClient, StreamingClient};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Wires store, registry, HTTP agent client and orchestrator in one go
///
/// # Example
///
/// ```rust,no_run
/// use colloquy::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let session = ColloquyBuilder::new()
///     .base_url("https://agent.example.com")
///     .account("account-123456", Some(3))
///     .history_limit(20)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ColloquyBuilder {
    agent: AgentConfig,
    account_id: Option<String>,
    tier: Option<u32>,
    store: Option<Arc<dyn ThreadListStore>>,
    prompt: Option<Arc<dyn OverflowPrompt>>,
    ui: Option<Arc<dyn SessionUi>>,
    cleanup: bool,
}

impl Default for ColloquyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ColloquyBuilder {
    pub fn new() -> Self {
        Self {
            agent: AgentConfig::default(),
            account_id: None,
            tier: None,
            store: None,
            prompt: None,
            ui: None,
            cleanup: true,
        }
    }

    /// Agent bridge base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.agent.base_url = url.into();
        self
    }

    /// Replace the whole agent configuration
    pub fn agent_config(mut self, config: AgentConfig) -> Self {
        self.agent = config;
        self
    }

    pub fn history_limit(mut self, limit: u32) -> Self {
        self.agent.history_limit = limit;
        self
    }

    /// Account id (required) and subscription tier
    pub fn account(mut self, account_id: impl Into<String>, tier: Option<u32>) -> Self {
        self.account_id = Some(account_id.into());
        self.tier = tier;
        self
    }

    /// Thread-list store; in-memory when not set
    pub fn store(mut self, store: Arc<dyn ThreadListStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn prompt(mut self, prompt: Arc<dyn OverflowPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn ui(mut self, ui: Arc<dyn SessionUi>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Skip the startup sweep of abandoned placeholder threads
    pub fn skip_cleanup(mut self) -> Self {
        self.cleanup = false;
        self
    }

    /// Load the thread list and build the session
    pub async fn build(self) -> Result<Arc<SessionOrchestrator>> {
        let account_id = self.account_id.context("Account id is required")?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryThreadListStore::new()));

        let registry = Arc::new(
            ThreadRegistry::load(store, Arc::new(MessageCache::new()), account_id.clone(), self.tier)
                .await,
        );

        let agent = HttpAgentClient::new(&self.agent).context("Invalid agent configuration")?;
        let client = StreamingClient::new(Arc::new(agent), account_id, registry.quota())
            .with_config(self.agent);

        let mut builder = SessionOrchestrator::builder().registry(registry).client(client);
        if let Some(prompt) = self.prompt {
            builder = builder.prompt(prompt);
        }
        if let Some(ui) = self.ui {
            builder = builder.ui(ui);
        }

        let session = Arc::new(builder.build()?);
        if self.cleanup {
            session.cleanup_abandoned_threads().await;
        }
        Ok(session)
    }
}
