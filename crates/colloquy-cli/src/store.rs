use anyhow::Result;
use colloquy_persist::{InMemoryThreadListStore, JsonFileThreadListStore, ThreadListStore};
use std::sync::Arc;

use crate::config::{Config, StoreBackend};

/// Thread-list store selected by configuration
pub async fn build_store(config: &Config) -> Result<Arc<dyn ThreadListStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory thread list");
            Ok(Arc::new(InMemoryThreadListStore::new()))
        }
        StoreBackend::File => {
            tracing::info!(path = %config.store.path.display(), "Using thread list file");
            Ok(Arc::new(JsonFileThreadListStore::new(&config.store.path)))
        }
        StoreBackend::Mongodb => mongo_store(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn mongo_store(config: &Config) -> Result<Arc<dyn ThreadListStore>> {
    use anyhow::Context;

    tracing::info!(database = %config.store.database, "Connecting to MongoDB");
    let store = colloquy_persist::MongoThreadListStore::connect(
        &config.mongodb_uri,
        &config.store.database,
    )
    .await
    .context("Failed to connect to MongoDB")?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb"))]
async fn mongo_store(_config: &Config) -> Result<Arc<dyn ThreadListStore>> {
    anyhow::bail!("store backend \"mongodb\" requires the `mongodb` feature")
}
