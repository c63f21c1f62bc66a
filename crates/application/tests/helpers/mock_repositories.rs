#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use delirium_application::ports::{Clock, RecordStore};
use delirium_domain::{DomainError, EvictionPolicy, Record};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(secs);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
struct MockState {
    next_id: i64,
    records: Vec<Record>,
}

/// Vec-backed store whose upserts can be made to fail.
#[derive(Default)]
pub struct MockRecordStore {
    state: Mutex<MockState>,
    fail_upserts: AtomicBool,
    sweeps: AtomicUsize,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.load(Ordering::SeqCst)
    }

    pub fn all_records(&self) -> Vec<Record> {
        self.state.lock().unwrap().records.clone()
    }

    /// Seeds a record directly, as if left behind by an earlier run.
    pub fn insert(&self, name: &str, address: Ipv4Addr, expires_at: DateTime<Utc>, expired: bool) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let mut record = Record::new(state.next_id, name, address, expires_at);
        record.expired = expired;
        state.records.push(record);
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(DomainError::StoreFailure("disk I/O error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn upsert_active(
        &self,
        name: &str,
        address: Ipv4Addr,
        ttl_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<Record, DomainError> {
        self.check_writable()?;
        let expires_at = now + Duration::seconds(ttl_secs as i64);
        let mut state = self.state.lock().unwrap();

        if let Some(record) = state
            .records
            .iter_mut()
            .find(|r| !r.expired && r.name.as_ref() == name)
        {
            record.expires_at = record.expires_at.max(expires_at);
            return Ok(record.clone());
        }

        state.next_id += 1;
        let record = Record::new(state.next_id, name, address, expires_at);
        state.records.push(record.clone());
        Ok(record)
    }

    async fn find_by_name(&self, name: &str, expired: bool) -> Result<Vec<Record>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|r| r.expired == expired && r.name.as_ref() == name)
            .cloned()
            .collect())
    }

    async fn find_by_address(
        &self,
        address: Ipv4Addr,
        expired: bool,
    ) -> Result<Vec<Record>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|r| r.expired == expired && r.address == address)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, expired: bool) -> Result<Vec<Record>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|r| r.expired == expired)
            .cloned()
            .collect())
    }

    async fn sweep_expired(
        &self,
        policy: EvictionPolicy,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let mut affected = 0;

        match policy {
            EvictionPolicy::Mark => {
                for record in state.records.iter_mut().filter(|r| !r.expired && r.is_due(now)) {
                    record.expired = true;
                    affected += 1;
                }
            }
            EvictionPolicy::Delete => {
                let before = state.records.len();
                state.records.retain(|r| !r.is_due(now));
                affected = (before - state.records.len()) as u64;
            }
        }

        Ok(affected)
    }

    async fn active_addresses(&self) -> Result<HashSet<Ipv4Addr>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .filter(|r| !r.expired)
            .map(|r| r.address)
            .collect())
    }
}
