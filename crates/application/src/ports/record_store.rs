use async_trait::async_trait;
use chrono::{DateTime, Utc};
use delirium_domain::{DomainError, EvictionPolicy, Record};
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Persistence for name/address bindings.
///
/// Every write is all-or-nothing: a failed call returns
/// `DomainError::StoreFailure` and leaves the stored records untouched.
/// Implementations do not retry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Extend the active record for `name` to at least `now + ttl_secs`, or
    /// insert a new active record bound to `address` when there is none.
    ///
    /// `address` is ignored on the refresh path.
    async fn upsert_active(
        &self,
        name: &str,
        address: Ipv4Addr,
        ttl_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<Record, DomainError>;

    async fn find_by_name(&self, name: &str, expired: bool) -> Result<Vec<Record>, DomainError>;

    async fn find_by_address(
        &self,
        address: Ipv4Addr,
        expired: bool,
    ) -> Result<Vec<Record>, DomainError>;

    /// All records with the given expired flag, oldest first.
    async fn find_by_status(&self, expired: bool) -> Result<Vec<Record>, DomainError>;

    /// Apply `policy` to every record whose expiry is at or before `now`.
    ///
    /// `Mark` flags active records, `Delete` removes due records whether or
    /// not they were already flagged. Returns the number of records affected.
    async fn sweep_expired(
        &self,
        policy: EvictionPolicy,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Addresses currently bound to non-expired records.
    async fn active_addresses(&self) -> Result<HashSet<Ipv4Addr>, DomainError>;
}
