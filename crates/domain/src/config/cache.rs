use crate::address_pool::parse_subnet;
use crate::dns_record::EvictionPolicy;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// IPv4 network fake addresses are drawn from.
    #[serde(default = "default_subnet")]
    pub subnet: String,

    /// Lifetime of a binding in seconds, extended on every revisit.
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    #[serde(default)]
    pub eviction: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            subnet: default_subnet(),
            ttl: default_ttl(),
            eviction: EvictionPolicy::default(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        parse_subnet(&self.subnet)?;
        if self.ttl == 0 {
            return Err(DomainError::ConfigError(
                "Record TTL must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Operator hint for pools that work but are awkwardly sized.
    pub fn subnet_advisory(&self) -> Option<&'static str> {
        let prefix = parse_subnet(&self.subnet).ok()?.prefix();
        if prefix > 24 {
            Some("Using a subnet smaller than /24 is not recommended")
        } else if prefix <= 16 {
            Some("Using a subnet larger than /16 may impact performance")
        } else {
            None
        }
    }
}

fn default_subnet() -> String {
    "10.0.0.0/24".to_string()
}

fn default_ttl() -> u32 {
    900
}
