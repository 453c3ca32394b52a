use colloquy_persist::{MessageCache, ThreadRegistry};
use colloquy_stream::StreamingClient;
use colloquy_types::Thread;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::error::{Result, SessionError};
use crate::ui::{OverflowPrompt, SessionUi};
use crate::view::SessionView;

/// Coordinates registry, cache and streaming client for user-facing flows
pub struct SessionOrchestrator {
    pub(crate) registry: Arc<ThreadRegistry>,
    pub(crate) client: StreamingClient,
    pub(crate) prompt: Arc<dyn OverflowPrompt>,
    pub(crate) ui: Arc<dyn SessionUi>,
    pub(crate) view: watch::Sender<SessionView>,
    /// Held for the whole of a send; one turn at a time per session
    pub(crate) turn: Mutex<()>,
    /// Thread a reply is currently streaming into
    pub(crate) in_flight: watch::Sender<Option<String>>,
}

impl SessionOrchestrator {
    pub fn new(
        registry: Arc<ThreadRegistry>,
        client: StreamingClient,
        prompt: Arc<dyn OverflowPrompt>,
        ui: Arc<dyn SessionUi>,
    ) -> Self {
        Self {
            registry,
            client,
            prompt,
            ui,
            view: watch::Sender::new(SessionView::default()),
            turn: Mutex::new(()),
            in_flight: watch::Sender::new(None),
        }
    }

    pub fn builder() -> crate::builder::SessionBuilder {
        crate::builder::SessionBuilder::new()
    }

    pub fn registry(&self) -> &Arc<ThreadRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<MessageCache> {
        self.registry.cache()
    }

    pub fn client(&self) -> &StreamingClient {
        &self.client
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    /// Switch the conversation pane
    ///
    /// `None` enters new-chat mode. Otherwise the outgoing thread's live
    /// messages are flushed into the cache, the incoming thread is rendered
    /// from the cache at once, and a background task revalidates it against
    /// the remote history. The returned handle belongs to that task.
    pub fn switch_to(self: &Arc<Self>, thread_id: Option<&str>) -> Option<JoinHandle<()>> {
        let Some(thread_id) = thread_id else {
            self.registry.deselect();
            self.view.send_replace(SessionView::default());
            tracing::debug!("Switched to new-chat mode");
            return None;
        };

        if !self.registry.select(thread_id) {
            return None;
        }

        self.enter_thread(thread_id);

        let session = Arc::clone(self);
        let thread_id = thread_id.to_string();
        Some(tokio::spawn(async move {
            session.revalidate(&thread_id).await;
        }))
    }

    /// Flush the outgoing thread and render the cached transcript of `thread_id`
    pub(crate) fn enter_thread(&self, thread_id: &str) {
        let outgoing = self.view.borrow().clone();
        if let Some(previous) = outgoing.thread_id.as_deref() {
            if previous != thread_id && !outgoing.messages.is_empty() {
                tracing::debug!(
                    thread_id = %previous,
                    count = outgoing.messages.len(),
                    "Flushing outgoing thread into cache"
                );
                self.cache().set(previous, outgoing.messages);
            }
        }

        let cached = self.cache().get(thread_id);
        tracing::debug!(thread_id = %thread_id, cached = cached.len(), "Rendering thread from cache");
        self.view.send_replace(SessionView::for_thread(thread_id, cached));
        self.ui.scroll_to_bottom();
    }

    /// Overwrite view and cache with the remote transcript
    ///
    /// An unknown remote thread or a failed fetch leaves the cached view.
    async fn revalidate(&self, thread_id: &str) {
        let snapshot = match self
            .client
            .get_history(thread_id, self.client.history_limit())
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(thread_id = %thread_id, error = %e, "History fetch failed, keeping cache");
                return;
            }
        };

        if !snapshot.exists {
            tracing::warn!(thread_id = %thread_id, "Thread unknown remotely, keeping cache");
            return;
        }

        let mut busy = false;
        let replaced = self.view.send_if_modified(|view| {
            // The turn's own writes are newer than any history fetched before it
            if self.in_flight.borrow().as_deref() == Some(thread_id) {
                busy = true;
                return false;
            }
            if !view.shows(thread_id) || view.loading {
                self.cache().set(thread_id, snapshot.messages);
                return false;
            }
            self.cache().set(thread_id, snapshot.messages.clone());
            view.messages = snapshot.messages;
            true
        });

        if replaced {
            self.ui.scroll_to_bottom();
        } else if busy {
            tracing::debug!(thread_id = %thread_id, "Turn in flight, revalidation dropped");
        } else {
            tracing::debug!(thread_id = %thread_id, "View moved on, revalidation only cached");
        }
    }

    /// Lazily create a thread when the input gains focus
    ///
    /// The remote trigger must be acknowledged before anything is created
    /// locally. Returns the new thread, if one was created.
    pub async fn ensure_thread_on_focus(&self) -> Option<Thread> {
        if let Some(current) = self.registry.current() {
            tracing::debug!(thread_id = %current, "Thread already selected");
            return None;
        }

        if !self.registry.has_capacity() {
            tracing::info!(quota = %self.registry.quota(), "Quota reached, no thread created on focus");
            return None;
        }

        match self.open_thread().await {
            Ok(thread) => Some(thread),
            Err(e) => {
                tracing::warn!(error = %e, "No thread created on focus");
                None
            }
        }
    }

    /// Explicit "new chat" action
    pub async fn start_new_chat(&self) -> Result<Thread> {
        if !self.registry.has_capacity() {
            return Err(SessionError::QuotaReached(self.registry.quota().get()));
        }
        self.open_thread().await
    }

    /// Trigger first, then commit the provisional thread locally
    async fn open_thread(&self) -> Result<Thread> {
        let thread_id = self.registry.generate_id();

        if !self.client.send_trigger(&thread_id).await {
            return Err(SessionError::AgentUnavailable);
        }

        let thread = self.registry.create_provisional(thread_id).await;
        self.enter_thread(&thread.id);
        Ok(thread)
    }

    /// Delete a thread locally and ask the agent to drop its history
    pub async fn delete_thread(&self, thread_id: &str) -> Result<Thread> {
        let thread = self
            .registry
            .delete(thread_id)
            .await
            .ok_or_else(|| SessionError::ThreadNotFound(thread_id.to_string()))?;

        self.view.send_if_modified(|view| {
            if view.shows(thread_id) {
                *view = SessionView::default();
                true
            } else {
                false
            }
        });

        self.forget_remote(thread_id).await;
        Ok(thread)
    }

    /// Clear the pane, then delete the current thread
    pub async fn clear_current(&self) -> Result<Thread> {
        let thread_id = self.registry.current().ok_or(SessionError::NoCurrentThread)?;
        self.view.send_replace(SessionView::default());
        self.delete_thread(&thread_id).await
    }

    /// Remote history deletion; the outcome is only logged
    pub(crate) async fn forget_remote(&self, thread_id: &str) {
        match self.client.clear_history(thread_id).await {
            Ok(outcome) if outcome.deleted => {
                tracing::info!(
                    thread_id = %thread_id,
                    checkpoints = outcome.checkpoints_deleted,
                    writes = outcome.writes_deleted,
                    "Remote history deleted"
                );
            }
            Ok(_) => {
                tracing::info!(thread_id = %thread_id, "Remote history not found");
            }
            Err(e) => {
                tracing::error!(thread_id = %thread_id, error = %e, "Failed to delete remote history");
            }
        }
    }
}
