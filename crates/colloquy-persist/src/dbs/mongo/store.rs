use async_trait::async_trait;
use colloquy_types::ThreadRecord;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::trait_client::ThreadListStore;

/// One document per account, keyed by account id
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountThreads {
    #[serde(rename = "_id")]
    account_id: String,
    #[serde(rename = "chatsData", default)]
    chats_data: Vec<ThreadRecord>,
}

#[derive(Clone)]
pub struct MongoThreadListStore {
    collection: Collection<AccountThreads>,
}

impl MongoThreadListStore {
    /// Connect to MongoDB and bind the `accounts` collection
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self::new(&client, database))
    }

    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection("accounts");
        Self { collection }
    }
}

#[async_trait]
impl ThreadListStore for MongoThreadListStore {
    async fn read_thread_list(&self, account_id: &str) -> Result<Vec<ThreadRecord>> {
        let filter = doc! { "_id": account_id };
        let found = self.collection.find_one(filter).await?;
        Ok(found.map(|account| account.chats_data).unwrap_or_default())
    }

    async fn write_thread_list(&self, account_id: &str, list: &[ThreadRecord]) -> Result<()> {
        let filter = doc! { "_id": account_id };
        let update = doc! { "$set": { "chatsData": bson::to_bson(list)? } };

        self.collection.update_one(filter, update).upsert(true).await?;
        Ok(())
    }
}
