use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// A name bound to a fake address until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,

    pub name: Arc<str>,

    pub address: Ipv4Addr,

    pub expires_at: DateTime<Utc>,

    pub expired: bool,
}

impl Record {
    pub fn new(
        id: i64,
        name: impl Into<Arc<str>>,
        address: Ipv4Addr,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address,
            expires_at,
            expired: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.expired
    }

    /// True once a sweep at `now` would evict this record.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whole seconds left before expiry, zero once due.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> u32 {
        let remaining = (self.expires_at - now).num_seconds();
        remaining.clamp(0, u32::MAX as i64) as u32
    }
}
