use async_trait::async_trait;
use colloquy_types::ThreadRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::trait_client::ThreadListStore;

/// Thread lists of all accounts kept in one JSON document on disk
///
/// Layout: `{ "<account id>": { "chatsData": [{ "threadId", "name" }] } }`.
pub struct JsonFileThreadListStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct AccountEntry {
    #[serde(rename = "chatsData", default)]
    chats_data: Vec<ThreadRecord>,
}

type Document = BTreeMap<String, AccountEntry>;

impl JsonFileThreadListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_document(&self) -> Result<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ThreadListStore for JsonFileThreadListStore {
    async fn read_thread_list(&self, account_id: &str) -> Result<Vec<ThreadRecord>> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_document().await?;
        Ok(document
            .remove(account_id)
            .map(|entry| entry.chats_data)
            .unwrap_or_default())
    }

    async fn write_thread_list(&self, account_id: &str, list: &[ThreadRecord]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_document().await?;
        document.insert(
            account_id.to_string(),
            AccountEntry {
                chats_data: list.to_vec(),
            },
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&document)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            account_id = %account_id,
            count = list.len(),
            "Thread list written"
        );
        Ok(())
    }
}
