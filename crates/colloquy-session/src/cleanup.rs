use crate::orchestrator::SessionOrchestrator;

/// Result of the startup sweep over placeholder threads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Placeholder threads that were removed
    pub deleted: Vec<String>,
    /// Placeholder threads kept because they hold a real conversation
    pub kept: Vec<String>,
    /// Placeholder threads kept because their remote state could not be checked
    pub unverified: Vec<String>,
}

/// Verdict on a single placeholder thread
enum Sweep {
    Keep,
    Unverified,
    /// Delete locally; `true` also clears the remote history
    Delete(bool),
}

impl SessionOrchestrator {
    /// Remove placeholder threads that never received a real message
    ///
    /// Run once at startup. A thread is only deleted on positive evidence
    /// that it is empty; a failed history fetch always keeps it.
    pub async fn cleanup_abandoned_threads(&self) -> CleanupReport {
        let mut report = CleanupReport::default();
        let candidates = self.registry.placeholder_ids();

        if candidates.is_empty() {
            tracing::debug!("No placeholder threads to sweep");
            return report;
        }

        tracing::info!(count = candidates.len(), "Sweeping placeholder threads");

        for thread_id in candidates {
            match self.judge(&thread_id).await {
                Sweep::Keep => report.kept.push(thread_id),
                Sweep::Unverified => report.unverified.push(thread_id),
                Sweep::Delete(clear_remote) => {
                    if self.registry.delete(&thread_id).await.is_some() {
                        if clear_remote {
                            self.forget_remote(&thread_id).await;
                        }
                        report.deleted.push(thread_id);
                    }
                }
            }
        }

        tracing::info!(
            deleted = report.deleted.len(),
            kept = report.kept.len(),
            unverified = report.unverified.len(),
            "Placeholder sweep finished"
        );
        report
    }

    async fn judge(&self, thread_id: &str) -> Sweep {
        let cache = self.cache();

        if !cache.get(thread_id).is_empty() {
            return if !cache.has_user_messages(thread_id) || cache.is_effectively_empty(thread_id) {
                tracing::info!(thread_id = %thread_id, "Cached transcript has no user message");
                Sweep::Delete(true)
            } else {
                Sweep::Keep
            };
        }

        let snapshot = match self
            .client
            .get_history(thread_id, self.client.history_limit())
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    thread_id = %thread_id,
                    error = %e,
                    "History check failed, keeping placeholder thread"
                );
                return Sweep::Unverified;
            }
        };

        if !snapshot.exists {
            tracing::info!(thread_id = %thread_id, "Thread never existed remotely");
            Sweep::Delete(false)
        } else if snapshot.is_confirmed_empty() {
            tracing::info!(
                thread_id = %thread_id,
                count = snapshot.message_count,
                "Thread confirmed empty remotely"
            );
            Sweep::Delete(true)
        } else {
            Sweep::Keep
        }
    }
}
