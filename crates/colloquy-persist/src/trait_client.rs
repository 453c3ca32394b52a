use async_trait::async_trait;
use colloquy_types::ThreadRecord;

use crate::error::Result;

/// Account metadata store holding the ordered thread list
///
/// Read once when a session starts; the full list is overwritten after every
/// structural change.
#[async_trait]
pub trait ThreadListStore: Send + Sync {
    /// Stored list for the account, empty when nothing was saved yet
    async fn read_thread_list(&self, account_id: &str) -> Result<Vec<ThreadRecord>>;

    /// Replace the stored list for the account
    async fn write_thread_list(&self, account_id: &str, list: &[ThreadRecord]) -> Result<()>;
}
