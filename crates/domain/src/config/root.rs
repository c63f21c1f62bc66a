use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::database::{DatabaseConfig, StoreBackend};
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::dns_record::EvictionPolicy;

const LOCAL_CONFIG_PATH: &str = "delirium.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/delirium/config.toml";

/// Main configuration structure for Delirium DNS
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Address pool and binding lifetime
    #[serde(default)]
    pub cache: CacheConfig,

    /// Record store selection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. delirium.toml in current directory
    /// 3. /etc/delirium/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(subnet) = overrides.subnet {
            self.cache.subnet = subnet;
        }
        if let Some(ttl) = overrides.ttl {
            self.cache.ttl = ttl;
        }
        if let Some(eviction) = overrides.eviction {
            self.cache.eviction = eviction;
        }
        if let Some(backend) = overrides.backend {
            self.database.backend = backend;
        }
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(log_path) = overrides.log_path {
            self.logging.path = Some(log_path);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Bind address cannot be empty".to_string(),
            ));
        }

        self.cache
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.database.backend == StoreBackend::Sqlite && self.database.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "SQLite backend requires a database path".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub subnet: Option<String>,
    pub ttl: Option<u32>,
    pub eviction: Option<EvictionPolicy>,
    pub backend: Option<StoreBackend>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
    pub log_path: Option<String>,
}
