#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use delirium_application::ports::RecordStore;
use delirium_infrastructure::database::create_pool;
use delirium_infrastructure::repositories::{InMemoryRecordStore, SqliteRecordStore};
use std::sync::Arc;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub async fn sqlite_store() -> SqliteRecordStore {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    SqliteRecordStore::new(pool)
}

/// One instance of every backend, labelled for assertion messages.
pub async fn all_stores() -> Vec<(&'static str, Arc<dyn RecordStore>)> {
    let memory: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
    let sqlite: Arc<dyn RecordStore> = Arc::new(sqlite_store().await);
    vec![("memory", memory), ("sqlite", sqlite)]
}
