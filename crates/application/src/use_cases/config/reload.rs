use crate::services::{CacheEngine, CacheSettings};
use delirium_domain::{CliOverrides, Config, DomainError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Re-reads the config file and pushes `[cache]` changes into the running
/// engine. Listener, store and logging changes only take effect on restart.
pub struct ReloadConfigUseCase {
    config: Arc<RwLock<Config>>,
    engine: Arc<CacheEngine>,
    overrides: CliOverrides,
}

impl ReloadConfigUseCase {
    pub fn new(
        config: Arc<RwLock<Config>>,
        engine: Arc<CacheEngine>,
        overrides: CliOverrides,
    ) -> Self {
        Self {
            config,
            engine,
            overrides,
        }
    }

    pub async fn execute(&self, config_path: &str) -> Result<Config, DomainError> {
        let new_config = Config::load(Some(config_path), self.overrides.clone())
            .map_err(|e| DomainError::ConfigError(format!("Config load error: {}", e)))?;

        new_config
            .validate()
            .map_err(|e| DomainError::ConfigError(format!("Config validation error: {}", e)))?;

        let current = self.engine.settings().await;
        let wanted = CacheSettings::from(&new_config.cache);

        if normalized_subnet(&wanted.subnet) != current.subnet {
            self.engine.reconfigure_subnet(&wanted.subnet).await?;
        }
        if wanted.ttl != current.ttl {
            self.engine.set_ttl(wanted.ttl).await?;
        }
        if wanted.eviction != current.eviction {
            self.engine.set_eviction_policy(wanted.eviction).await;
        }

        {
            let mut config = self.config.write().await;
            if config.server != new_config.server {
                warn!("Listener settings changed; restart to apply them");
            }
            if config.database != new_config.database {
                warn!("Record store settings changed; restart to apply them");
            }
            if config.logging != new_config.logging {
                warn!("Logging settings changed; restart to apply them");
            }
            *config = new_config.clone();
        }

        info!("Configuration reloaded successfully from: {}", config_path);

        Ok(new_config)
    }
}

fn normalized_subnet(subnet: &str) -> String {
    delirium_domain::address_pool::parse_subnet(subnet)
        .map(|network| network.to_string())
        .unwrap_or_else(|_| subnet.to_string())
}
