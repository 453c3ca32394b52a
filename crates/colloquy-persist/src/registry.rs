use colloquy_types::{Quota, Thread, ThreadRecord, PLACEHOLDER_NAME};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::watch;

use crate::cache::MessageCache;
use crate::trait_client::ThreadListStore;

/// Upper bound (exclusive) of the random part of a thread id
const ID_RANGE: u32 = 1_000_000;

/// Characters of the account id appended to a thread id
const ID_ACCOUNT_PREFIX: usize = 6;

/// Re-draws before accepting a colliding id
const ID_MAX_ATTEMPTS: usize = 8;

/// Ordered, quota-limited thread list of one account
///
/// Position 0 is the most recently active thread. The in-memory list is
/// authoritative for the session: every structural change is applied first
/// and then written to the store as a whole. A failed write is logged and
/// left for the next change to repair.
///
/// The list and the current selection are published through `watch`
/// channels; there is no other way to mutate them.
pub struct ThreadRegistry {
    account_id: String,
    quota: Quota,
    store: Arc<dyn ThreadListStore>,
    cache: Arc<MessageCache>,
    threads: watch::Sender<Vec<Thread>>,
    current: watch::Sender<Option<String>>,
}

impl ThreadRegistry {
    /// Empty registry, nothing selected
    pub fn new(
        store: Arc<dyn ThreadListStore>,
        cache: Arc<MessageCache>,
        account_id: impl Into<String>,
        quota: Quota,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            quota,
            store,
            cache,
            threads: watch::Sender::new(Vec::new()),
            current: watch::Sender::new(None),
        }
    }

    /// Start a session: read the stored list once and compute the quota
    ///
    /// A failed read starts the session with an empty list.
    pub async fn load(
        store: Arc<dyn ThreadListStore>,
        cache: Arc<MessageCache>,
        account_id: impl Into<String>,
        tier: Option<u32>,
    ) -> Self {
        let registry = Self::new(store, cache, account_id, Self::quota_for(tier));

        match registry.store.read_thread_list(&registry.account_id).await {
            Ok(records) => {
                let threads: Vec<Thread> = records.into_iter().map(Thread::from).collect();
                tracing::info!(
                    account_id = %registry.account_id,
                    count = threads.len(),
                    quota = %registry.quota,
                    "Thread list loaded"
                );
                registry.threads.send_replace(threads);
            }
            Err(e) => {
                tracing::error!(
                    account_id = %registry.account_id,
                    error = %e,
                    "Failed to read thread list, starting empty"
                );
            }
        }

        registry
    }

    pub fn quota_for(tier: Option<u32>) -> Quota {
        Quota::for_tier(tier)
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn cache(&self) -> &Arc<MessageCache> {
        &self.cache
    }

    /// Snapshot of the ordered list
    pub fn threads(&self) -> Vec<Thread> {
        self.threads.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.threads.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.borrow().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.threads.borrow().iter().any(|t| t.id == id)
    }

    pub fn get(&self, id: &str) -> Option<Thread> {
        self.threads.borrow().iter().find(|t| t.id == id).cloned()
    }

    /// Thread at the last position other than `keep`
    pub fn oldest_except(&self, keep: &str) -> Option<Thread> {
        self.threads
            .borrow()
            .iter()
            .rev()
            .find(|t| t.id != keep)
            .cloned()
    }

    /// Whether one more thread fits under the quota
    pub fn has_capacity(&self) -> bool {
        self.quota.allows_another(self.len())
    }

    /// Ids of threads still carrying the placeholder name
    pub fn placeholder_ids(&self) -> Vec<String> {
        self.threads
            .borrow()
            .iter()
            .filter(|t| t.is_placeholder())
            .map(|t| t.id.clone())
            .collect()
    }

    pub fn subscribe_threads(&self) -> watch::Receiver<Vec<Thread>> {
        self.threads.subscribe()
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }

    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    pub fn current_thread(&self) -> Option<Thread> {
        self.current().and_then(|id| self.get(&id))
    }

    /// Select a listed thread; the list order is untouched
    pub fn select(&self, id: &str) -> bool {
        if !self.contains(id) {
            tracing::warn!(thread_id = %id, "Cannot select unknown thread");
            return false;
        }
        self.current.send_replace(Some(id.to_string()));
        true
    }

    pub fn deselect(&self) {
        self.current.send_replace(None);
    }

    /// New thread id: `<random>_<account prefix>`
    ///
    /// Re-draws while the id is already listed, accepting the last draw
    /// after a bounded number of attempts.
    pub fn generate_id(&self) -> String {
        let prefix: String = self.account_id.chars().take(ID_ACCOUNT_PREFIX).collect();
        let mut rng = rand::thread_rng();

        let mut id = String::new();
        for attempt in 1..=ID_MAX_ATTEMPTS {
            id = format!("{}_{}", rng.gen_range(0..ID_RANGE), prefix);
            if !self.contains(&id) {
                return id;
            }
            tracing::debug!(thread_id = %id, attempt, "Thread id collision, drawing again");
        }

        tracing::warn!(thread_id = %id, "Accepting colliding thread id");
        id
    }

    /// Prepend a placeholder thread and select it; nothing is persisted yet
    pub async fn create_provisional(&self, id: impl Into<String>) -> Thread {
        self.create_with_name(id, PLACEHOLDER_NAME).await
    }

    /// Prepend a thread and select it
    ///
    /// Only persisted when `name` is a real name.
    pub async fn create_with_name(&self, id: impl Into<String>, name: impl Into<String>) -> Thread {
        let thread = Thread::new(id, name);

        self.threads.send_modify(|threads| threads.insert(0, thread.clone()));
        self.current.send_replace(Some(thread.id.clone()));

        tracing::info!(
            thread_id = %thread.id,
            placeholder = thread.is_placeholder(),
            "Thread created"
        );

        if !thread.is_placeholder() {
            self.persist().await;
        }

        thread
    }

    /// Remove a thread, drop its cached transcript and persist
    ///
    /// Returns the removed thread so the caller can mirror the deletion remotely.
    pub async fn delete(&self, id: &str) -> Option<Thread> {
        let mut removed = None;
        self.threads.send_if_modified(|threads| {
            match threads.iter().position(|t| t.id == id) {
                Some(index) => {
                    removed = Some(threads.remove(index));
                    true
                }
                None => false,
            }
        });

        let Some(thread) = removed else {
            tracing::warn!(thread_id = %id, "Delete of unknown thread ignored");
            return None;
        };

        self.current.send_if_modified(|current| {
            if current.as_deref() == Some(id) {
                *current = None;
                true
            } else {
                false
            }
        });
        self.cache.clear(id);

        tracing::info!(thread_id = %id, name = %thread.name, "Thread deleted");
        self.persist().await;

        Some(thread)
    }

    /// Evict the thread at the last position
    pub async fn delete_oldest(&self) -> Option<Thread> {
        let oldest = self.threads.borrow().last().map(|t| t.id.clone())?;
        self.delete(&oldest).await
    }

    /// Set the name of a thread and persist
    pub async fn rename(&self, id: &str, name: impl Into<String>) -> bool {
        let name = name.into();
        let renamed = self.threads.send_if_modified(|threads| {
            match threads.iter_mut().find(|t| t.id == id) {
                Some(thread) => {
                    thread.name = name.clone();
                    true
                }
                None => false,
            }
        });

        if !renamed {
            tracing::warn!(thread_id = %id, "Rename of unknown thread ignored");
            return false;
        }

        tracing::info!(thread_id = %id, name = %name, "Thread renamed");
        self.persist().await;
        true
    }

    /// Move a thread to position 0 and persist the new order
    ///
    /// A thread already at the top is left alone and nothing is written.
    pub async fn move_to_top(&self, id: &str) -> bool {
        let moved = self.threads.send_if_modified(|threads| {
            match threads.iter().position(|t| t.id == id) {
                Some(0) | None => false,
                Some(index) => {
                    let thread = threads.remove(index);
                    threads.insert(0, thread);
                    true
                }
            }
        });

        if moved {
            tracing::debug!(thread_id = %id, "Thread moved to top");
            self.persist().await;
        }
        moved
    }

    fn records(&self) -> Vec<ThreadRecord> {
        self.threads.borrow().iter().map(Thread::to_record).collect()
    }

    async fn persist(&self) {
        let records = self.records();
        match self
            .store
            .write_thread_list(&self.account_id, &records)
            .await
        {
            Ok(()) => {
                tracing::debug!(account_id = %self.account_id, count = records.len(), "Thread list persisted");
            }
            Err(e) => {
                tracing::error!(
                    account_id = %self.account_id,
                    error = %e,
                    "Failed to persist thread list"
                );
            }
        }
    }
}
