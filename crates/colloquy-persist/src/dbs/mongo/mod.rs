mod store;

pub use store::MongoThreadListStore;
