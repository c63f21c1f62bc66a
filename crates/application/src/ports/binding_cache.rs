use async_trait::async_trait;
use delirium_domain::{DomainError, Record};
use std::net::Ipv4Addr;

/// Result of asking the cache for a name's address.
///
/// Depletion is an expected operating condition, so it is a value here and
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// A fresh address was taken from the pool for a new binding.
    Allocated(Record),
    /// The name already had an active binding; its expiry was extended.
    Refreshed(Record),
    /// No address left, even after regenerating the pool once.
    Depleted,
}

impl Allocation {
    pub fn record(&self) -> Option<&Record> {
        match self {
            Allocation::Allocated(record) | Allocation::Refreshed(record) => Some(record),
            Allocation::Depleted => None,
        }
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        self.record().map(|record| record.address)
    }
}

/// The slice of the cache engine the resolver is allowed to drive.
#[async_trait]
pub trait BindingCache: Send + Sync {
    /// Sweep expired bindings under the configured policy.
    async fn prune(&self) -> Result<u64, DomainError>;

    async fn resolve_name(&self, name: &str) -> Result<Allocation, DomainError>;

    /// Active bindings for `address`. Normally zero or one.
    async fn resolve_address(&self, address: Ipv4Addr) -> Result<Vec<Record>, DomainError>;
}
