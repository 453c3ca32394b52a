use colloquy_persist::ThreadRegistry;
use colloquy_stream::StreamingClient;
use std::sync::Arc;

use crate::error::{Result, SessionError};
use crate::orchestrator::SessionOrchestrator;
use crate::ui::{AlwaysConfirm, NoopUi, OverflowPrompt, SessionUi};

/// Builder for a [`SessionOrchestrator`]
///
/// Registry and streaming client are required. Without a prompt every
/// overflow is accepted; without a UI side effects are dropped.
#[derive(Default)]
pub struct SessionBuilder {
    registry: Option<Arc<ThreadRegistry>>,
    client: Option<StreamingClient>,
    prompt: Option<Arc<dyn OverflowPrompt>>,
    ui: Option<Arc<dyn SessionUi>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(mut self, registry: Arc<ThreadRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn client(mut self, client: StreamingClient) -> Self {
        self.client = Some(client);
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

    pub fn build(self) -> Result<SessionOrchestrator> {
        let registry = self
            .registry
            .ok_or(SessionError::MissingComponent("thread registry"))?;
        let client = self
            .client
            .ok_or(SessionError::MissingComponent("streaming client"))?;

        Ok(SessionOrchestrator::new(
            registry,
            client,
            self.prompt.unwrap_or_else(|| Arc::new(AlwaysConfirm)),
            self.ui.unwrap_or_else(|| Arc::new(NoopUi)),
        ))
    }
}
