mod config;
mod database;
mod logging;

pub use config::{load_config, log_advisories};
pub use database::init_store;
pub use logging::init_logging;
