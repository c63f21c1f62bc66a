use async_trait::async_trait;
use chrono::{DateTime, Utc};
use delirium_domain::{
    AddressPool, CacheConfig, DomainError, EvictionPolicy, PoolStats, Record,
};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::ports::{Allocation, BindingCache, Clock, RecordStore};

/// Engine-wide settings, seeded from `[cache]` and changed through setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub subnet: String,
    pub ttl: u32,
    pub eviction: EvictionPolicy,
}

impl From<&CacheConfig> for CacheSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            subnet: config.subnet.clone(),
            ttl: config.ttl,
            eviction: config.eviction,
        }
    }
}

struct EngineState {
    pool: AddressPool,
    ttl: u32,
    eviction: EvictionPolicy,
}

/// Binds names to pool addresses and keeps the pool in step with the store.
///
/// All mutable state sits behind one async mutex that is held across the
/// store calls of each operation, so allocate+upsert, refresh, sweep and
/// reconfiguration never interleave.
pub struct CacheEngine {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl CacheEngine {
    /// Builds the engine and reconciles the pool with whatever active
    /// bindings the store already holds.
    #[instrument(skip(store, clock))]
    pub async fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Result<Self, DomainError> {
        validate_ttl(settings.ttl)?;
        let pool = AddressPool::new(&settings.subnet)?;

        let engine = Self {
            store,
            clock,
            state: Mutex::new(EngineState {
                pool,
                ttl: settings.ttl,
                eviction: settings.eviction,
            }),
        };

        {
            let mut state = engine.state.lock().await;
            let now = engine.clock.now();
            engine.sweep_locked(&state, now).await?;
            engine.regenerate_locked(&mut state).await?;
            info!(
                subnet = %state.pool.network(),
                capacity = state.pool.capacity(),
                free = state.pool.free_count(),
                ttl = state.ttl,
                eviction = %state.eviction,
                "Cache engine ready"
            );
        }

        Ok(engine)
    }

    pub async fn subnet(&self) -> String {
        self.state.lock().await.pool.network().to_string()
    }

    pub async fn ttl(&self) -> u32 {
        self.state.lock().await.ttl
    }

    pub async fn eviction_policy(&self) -> EvictionPolicy {
        self.state.lock().await.eviction
    }

    pub async fn pool_stats(&self) -> PoolStats {
        self.state.lock().await.pool.stats()
    }

    pub async fn settings(&self) -> CacheSettings {
        let state = self.state.lock().await;
        CacheSettings {
            subnet: state.pool.network().to_string(),
            ttl: state.ttl,
            eviction: state.eviction,
        }
    }

    /// Audit snapshot of stored records with the given expired flag.
    pub async fn records(&self, expired: bool) -> Result<Vec<Record>, DomainError> {
        let _state = self.state.lock().await;
        self.store.find_by_status(expired).await
    }

    pub async fn set_ttl(&self, ttl: u32) -> Result<(), DomainError> {
        validate_ttl(ttl)?;
        let mut state = self.state.lock().await;
        if state.ttl != ttl {
            debug!(old = state.ttl, new = ttl, "Cache update - record life changed");
            state.ttl = ttl;
        }
        Ok(())
    }

    pub async fn set_eviction_policy(&self, eviction: EvictionPolicy) {
        let mut state = self.state.lock().await;
        if state.eviction != eviction {
            debug!(old = %state.eviction, new = %eviction, "Cache update - eviction policy changed");
            state.eviction = eviction;
        }
    }

    /// Moves the pool to a new network.
    ///
    /// The CIDR is validated before anything changes. Bindings outside the new
    /// range stay in the store but no longer count against pool capacity.
    #[instrument(skip(self))]
    pub async fn reconfigure_subnet(&self, cidr: &str) -> Result<(), DomainError> {
        let mut candidate = AddressPool::new(cidr)?;

        let mut state = self.state.lock().await;
        let now = self.clock.now();
        self.sweep_locked(&state, now).await?;

        let active = self.store.active_addresses().await?;
        candidate.regenerate(&active);
        let previous = state.pool.network();
        state.pool = candidate;

        info!(
            old = %previous,
            new = %state.pool.network(),
            free = state.pool.free_count(),
            "Cache update - subnet changed"
        );
        Ok(())
    }

    async fn sweep_locked(
        &self,
        state: &EngineState,
        now: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let affected = self.store.sweep_expired(state.eviction, now).await?;
        if affected > 0 {
            debug!(affected, policy = %state.eviction, "Pruned stale records");
        }
        Ok(affected)
    }

    async fn regenerate_locked(&self, state: &mut EngineState) -> Result<(), DomainError> {
        let active = self.store.active_addresses().await?;
        state.pool.regenerate(&active);
        debug!(
            active = active.len(),
            free = state.pool.free_count(),
            "Regenerated hosts pool"
        );
        Ok(())
    }
}

#[async_trait]
impl BindingCache for CacheEngine {
    async fn prune(&self) -> Result<u64, DomainError> {
        let state = self.state.lock().await;
        let now = self.clock.now();
        self.sweep_locked(&state, now).await
    }

    #[instrument(skip(self))]
    async fn resolve_name(&self, name: &str) -> Result<Allocation, DomainError> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        self.sweep_locked(&state, now).await?;

        if let Some(existing) = self.store.find_by_name(name, false).await?.into_iter().next() {
            let record = self
                .store
                .upsert_active(name, existing.address, state.ttl, now)
                .await?;
            debug!(domain = %name, address = %record.address, "Refreshed binding");
            return Ok(Allocation::Refreshed(record));
        }

        let address = match state.pool.allocate() {
            Some(address) => address,
            None => {
                self.regenerate_locked(&mut state).await?;
                match state.pool.allocate() {
                    Some(address) => address,
                    None => {
                        warn!(domain = %name, subnet = %state.pool.network(), "No addresses left in pool");
                        return Ok(Allocation::Depleted);
                    }
                }
            }
        };

        match self.store.upsert_active(name, address, state.ttl, now).await {
            Ok(record) => {
                debug!(domain = %name, address = %record.address, "Allocated binding");
                Ok(Allocation::Allocated(record))
            }
            Err(e) => {
                state.pool.release(address);
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn resolve_address(&self, address: Ipv4Addr) -> Result<Vec<Record>, DomainError> {
        let state = self.state.lock().await;
        let now = self.clock.now();
        self.sweep_locked(&state, now).await?;
        self.store.find_by_address(address, false).await
    }
}

fn validate_ttl(ttl: u32) -> Result<(), DomainError> {
    if ttl == 0 {
        return Err(DomainError::ConfigError(
            "Record TTL must be at least 1 second".to_string(),
        ));
    }
    Ok(())
}
