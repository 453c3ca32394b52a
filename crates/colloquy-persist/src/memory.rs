use async_trait::async_trait;
use colloquy_types::ThreadRecord;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{PersistError, Result};
use crate::trait_client::ThreadListStore;

/// Process-local thread-list store
///
/// Counts writes and can be switched into a failing mode, which makes it the
/// store of choice for tests as well as for sessions without durable storage.
#[derive(Debug, Default)]
pub struct InMemoryThreadListStore {
    lists: DashMap<String, Vec<ThreadRecord>>,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryThreadListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored list of an account
    pub fn with_list(self, account_id: impl Into<String>, list: Vec<ThreadRecord>) -> Self {
        self.lists.insert(account_id.into(), list);
        self
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn stored(&self, account_id: &str) -> Option<Vec<ThreadRecord>> {
        self.lists.get(account_id).map(|list| list.clone())
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ThreadListStore for InMemoryThreadListStore {
    async fn read_thread_list(&self, account_id: &str) -> Result<Vec<ThreadRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.stored(account_id).unwrap_or_default())
    }

    async fn write_thread_list(&self, account_id: &str, list: &[ThreadRecord]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistError::Unavailable("writes disabled".to_string()));
        }
        self.lists.insert(account_id.to_string(), list.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
