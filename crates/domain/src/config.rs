pub mod cache;
pub mod database;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use database::{DatabaseConfig, StoreBackend};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
