pub mod in_memory_record_store;
pub mod record_store_backend;
pub mod sqlite_record_store;

pub use in_memory_record_store::InMemoryRecordStore;
pub use record_store_backend::RecordStoreBackend;
pub use sqlite_record_store::SqliteRecordStore;
