//! Delirium DNS Domain Layer
pub mod address_pool;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod resolution;
pub mod reverse_pointer;

pub use address_pool::{AddressPool, PoolStats};
pub use config::{CacheConfig, CliOverrides, Config, ConfigError, StoreBackend};
pub use dns_query::DnsQuery;
pub use dns_record::{EvictionPolicy, Record, RecordType};
pub use errors::DomainError;
pub use resolution::{Answer, AnswerData, Resolution, ResponseStatus};
