use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use delirium_application::ports::RecordStore;
use delirium_domain::{DomainError, EvictionPolicy, Record};
use std::collections::{BTreeMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, instrument};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    records: BTreeMap<i64, Record>,
}

/// Process-lifetime record store. Everything is lost on restart.
#[derive(Default)]
pub struct InMemoryRecordStore {
    state: RwLock<MemoryState>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, DomainError> {
        self.state.read().map_err(|e| {
            error!(error = %e, "Record store lock poisoned");
            DomainError::StoreFailure(e.to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, DomainError> {
        self.state.write().map_err(|e| {
            error!(error = %e, "Record store lock poisoned");
            DomainError::StoreFailure(e.to_string())
        })
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<Record>, DomainError>
    where
        F: Fn(&Record) -> bool,
    {
        let state = self.read()?;
        Ok(state
            .records
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    #[instrument(skip(self))]
    async fn upsert_active(
        &self,
        name: &str,
        address: Ipv4Addr,
        ttl_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<Record, DomainError> {
        let expires_at = now + Duration::seconds(i64::from(ttl_secs));
        let mut state = self.write()?;

        if let Some(record) = state
            .records
            .values_mut()
            .find(|record| !record.expired && record.name.as_ref() == name)
        {
            record.expires_at = record.expires_at.max(expires_at);
            return Ok(record.clone());
        }

        state.next_id += 1;
        let record = Record::new(state.next_id, name, address, expires_at);
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_name(&self, name: &str, expired: bool) -> Result<Vec<Record>, DomainError> {
        self.select(|record| record.expired == expired && record.name.as_ref() == name)
    }

    async fn find_by_address(
        &self,
        address: Ipv4Addr,
        expired: bool,
    ) -> Result<Vec<Record>, DomainError> {
        self.select(|record| record.expired == expired && record.address == address)
    }

    async fn find_by_status(&self, expired: bool) -> Result<Vec<Record>, DomainError> {
        self.select(|record| record.expired == expired)
    }

    async fn sweep_expired(
        &self,
        policy: EvictionPolicy,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut state = self.write()?;

        let affected = match policy {
            EvictionPolicy::Mark => {
                let mut marked = 0;
                for record in state
                    .records
                    .values_mut()
                    .filter(|record| !record.expired && record.is_due(now))
                {
                    record.expired = true;
                    marked += 1;
                }
                marked
            }
            EvictionPolicy::Delete => {
                let before = state.records.len();
                state.records.retain(|_, record| !record.is_due(now));
                (before - state.records.len()) as u64
            }
        };

        Ok(affected)
    }

    async fn active_addresses(&self) -> Result<HashSet<Ipv4Addr>, DomainError> {
        let state = self.read()?;
        Ok(state
            .records
            .values()
            .filter(|record| record.is_active())
            .map(|record| record.address)
            .collect())
    }
}
