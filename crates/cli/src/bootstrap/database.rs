use delirium_domain::config::DatabaseConfig;
use delirium_infrastructure::repositories::RecordStoreBackend;
use tracing::{error, info};

pub async fn init_store(cfg: &DatabaseConfig) -> anyhow::Result<RecordStoreBackend> {
    info!(backend = %cfg.backend, "Initializing record store");

    let store = RecordStoreBackend::from_config(cfg).await.map_err(|e| {
        error!("Failed to initialize record store: {}", e);
        anyhow::anyhow!(e)
    })?;

    info!(backend = %store.kind(), "Record store initialized successfully");
    Ok(store)
}
