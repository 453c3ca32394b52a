use colloquy_stream::{ReplyAccumulator, StreamObserver, StreamOutcome};
use colloquy_types::{derive_thread_name, ChatMessage};

use crate::error::{Result, SessionError};
use crate::orchestrator::SessionOrchestrator;

impl SessionOrchestrator {
    /// Send a user message on the current thread and stream the reply
    ///
    /// Negotiates the quota first: when the thread list is over quota the
    /// user must accept losing the oldest other thread, otherwise nothing
    /// is sent.
    pub async fn send_message(&self, text: &str) -> Result<StreamOutcome> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let _turn = self.turn.lock().await;

        let thread_id = match self.registry.current() {
            Some(id) => id,
            None => self.emergency_thread().await,
        };

        let quota = self.registry.quota();
        if quota.is_exceeded_by(self.registry.len()) {
            // The thread being written to is never the one sacrificed
            let confirmed = match self.registry.oldest_except(&thread_id) {
                Some(oldest) => {
                    if self.prompt.confirm_evict_oldest(&oldest, quota).await {
                        Some(oldest)
                    } else {
                        None
                    }
                }
                None => None,
            };

            let Some(oldest) = confirmed else {
                self.abandon_overflow(&thread_id).await?;
                return Err(SessionError::OverflowDeclined);
            };

            if let Some(evicted) = self.registry.delete(&oldest.id).await {
                tracing::info!(thread_id = %evicted.id, name = %evicted.name, "Oldest thread evicted");
                self.forget_remote(&evicted.id).await;
            }
        }

        if let Some(thread) = self.registry.get(&thread_id) {
            if thread.is_placeholder() {
                self.registry.rename(&thread_id, derive_thread_name(text)).await;
            }
        }
        self.registry.move_to_top(&thread_id).await;

        let mut messages = {
            let view = self.view.borrow();
            if view.shows(&thread_id) {
                view.messages.clone()
            } else {
                self.cache().get(&thread_id)
            }
        };
        messages.push(ChatMessage::user(text));
        messages.push(ChatMessage::assistant(""));

        self.in_flight.send_replace(Some(thread_id.clone()));
        self.cache().set(&thread_id, messages.clone());
        self.view.send_modify(|view| {
            view.thread_id = Some(thread_id.clone());
            view.messages = messages.clone();
            view.loading = true;
        });
        self.ui.loading_changed(true);

        tracing::info!(thread_id = %thread_id, len = text.len(), "Sending message");

        let mut observer = TurnObserver {
            session: self,
            thread_id: thread_id.clone(),
            messages,
        };
        let mut reply = ReplyAccumulator::new();
        let outcome = self
            .client
            .stream(text, &thread_id, &mut reply, &mut observer)
            .await;

        observer.write_through();
        self.in_flight.send_replace(None);
        tracing::info!(thread_id = %thread_id, outcome = ?outcome, "Turn finished");

        Ok(outcome)
    }

    /// Back out of an over-quota send
    ///
    /// A placeholder thread opened for this send is dropped; a named
    /// thread keeps its history.
    async fn abandon_overflow(&self, thread_id: &str) -> Result<()> {
        let provisional = self
            .registry
            .get(thread_id)
            .is_some_and(|thread| thread.is_placeholder());

        if provisional {
            tracing::info!(thread_id = %thread_id, "Eviction declined, dropping new thread");
            self.delete_thread(thread_id).await?;
        } else {
            tracing::info!(thread_id = %thread_id, "Eviction declined, message not sent");
        }
        Ok(())
    }

    /// A send without a selected thread; normally prevented by the focus gate
    async fn emergency_thread(&self) -> String {
        tracing::warn!("No thread selected on send, creating one");

        let thread_id = self.registry.generate_id();
        self.registry.create_provisional(thread_id.clone()).await;
        self.enter_thread(&thread_id);

        if !self.client.send_trigger(&thread_id).await {
            tracing::warn!(thread_id = %thread_id, "Trigger for emergency thread failed");
        }
        thread_id
    }
}

/// Wires stream callbacks into the turn's transcript, the cache and the view
struct TurnObserver<'a> {
    session: &'a SessionOrchestrator,
    thread_id: String,
    /// Transcript of this turn; the last entry is the assistant reply
    messages: Vec<ChatMessage>,
}

impl TurnObserver<'_> {
    fn set_reply(&mut self, reply: &str) {
        if let Some(last) = self.messages.last_mut() {
            last.text = reply.to_string();
        }
    }

    fn write_through(&self) {
        self.session.cache().set(&self.thread_id, self.messages.clone());
    }

    /// Publish to the pane only while it still shows this thread
    fn publish(&self, loading: Option<bool>) {
        let thread_id = &self.thread_id;
        let messages = &self.messages;
        self.session.view.send_if_modified(|view| {
            if !view.shows(thread_id) {
                return false;
            }
            view.messages = messages.clone();
            if let Some(loading) = loading {
                view.loading = loading;
            }
            true
        });
    }
}

impl StreamObserver for TurnObserver<'_> {
    fn on_loading_change(&mut self, loading: bool) {
        self.publish(Some(loading));
        self.session.ui.loading_changed(loading);
        if !loading {
            self.write_through();
        }
    }

    fn on_content(&mut self, _chunk: &str, reply: &str) {
        self.set_reply(reply);
        self.publish(None);
        self.write_through();
    }

    fn on_scroll(&mut self) {
        self.session.ui.scroll_to_bottom();
    }

    fn on_speak(&mut self, text: &str) {
        self.session.ui.speak(text);
    }

    fn on_error(&mut self, _notice: &str, reply: &str) {
        self.set_reply(reply);
        self.publish(None);
        self.write_through();
    }
}
