use delirium_domain::{CliOverrides, Config};
use tracing::warn;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    Ok(config)
}

/// Non-fatal warnings about a valid but questionable configuration.
pub fn log_advisories(config: &Config) {
    if let Some(advisory) = config.cache.subnet_advisory() {
        warn!(subnet = %config.cache.subnet, "{}", advisory);
    }
}
