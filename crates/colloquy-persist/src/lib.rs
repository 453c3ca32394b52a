pub mod cache;
pub mod dbs;
pub mod error;
pub mod file;
pub mod memory;
pub mod registry;
pub mod trait_client;

pub use cache::MessageCache;
pub use error::{PersistError, Result};
pub use file::JsonFileThreadListStore;
pub use memory::InMemoryThreadListStore;
pub use registry::ThreadRegistry;
pub use trait_client::ThreadListStore;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoThreadListStore;
