use super::{InMemoryRecordStore, SqliteRecordStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use delirium_application::ports::RecordStore;
use delirium_domain::config::DatabaseConfig;
use delirium_domain::{DomainError, EvictionPolicy, Record, StoreBackend};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use tracing::info;

/// The record store selected by `[database] backend`.
pub enum RecordStoreBackend {
    Memory(InMemoryRecordStore),
    Sqlite(SqliteRecordStore),
}

impl RecordStoreBackend {
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DomainError> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Using in-memory record store");
                Ok(Self::Memory(InMemoryRecordStore::new()))
            }
            StoreBackend::Sqlite => {
                let store = SqliteRecordStore::connect(&config.url()).await?;
                info!(path = %config.path, "Using SQLite record store");
                Ok(Self::Sqlite(store))
            }
        }
    }

    pub fn kind(&self) -> StoreBackend {
        match self {
            Self::Memory(_) => StoreBackend::Memory,
            Self::Sqlite(_) => StoreBackend::Sqlite,
        }
    }

    /// Releases the underlying connection pool, if any.
    pub async fn close(&self) {
        if let Self::Sqlite(store) = self {
            store.close().await;
        }
    }

    fn inner(&self) -> &dyn RecordStore {
        match self {
            Self::Memory(store) => store,
            Self::Sqlite(store) => store,
        }
    }
}

#[async_trait]
impl RecordStore for RecordStoreBackend {
    async fn upsert_active(
        &self,
        name: &str,
        address: Ipv4Addr,
        ttl_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<Record, DomainError> {
        self.inner().upsert_active(name, address, ttl_secs, now).await
    }

    async fn find_by_name(&self, name: &str, expired: bool) -> Result<Vec<Record>, DomainError> {
        self.inner().find_by_name(name, expired).await
    }

    async fn find_by_address(
        &self,
        address: Ipv4Addr,
        expired: bool,
    ) -> Result<Vec<Record>, DomainError> {
        self.inner().find_by_address(address, expired).await
    }

    async fn find_by_status(&self, expired: bool) -> Result<Vec<Record>, DomainError> {
        self.inner().find_by_status(expired).await
    }

    async fn sweep_expired(
        &self,
        policy: EvictionPolicy,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.inner().sweep_expired(policy, now).await
    }

    async fn active_addresses(&self) -> Result<HashSet<Ipv4Addr>, DomainError> {
        self.inner().active_addresses().await
    }
}
