use delirium_application::ports::{BindingCache, Clock, RecordStore, SystemClock};
use delirium_application::services::{CacheEngine, CacheSettings};
use delirium_application::use_cases::{ReloadConfigUseCase, ResolveQueryUseCase};
use delirium_domain::{CliOverrides, Config};
use delirium_infrastructure::dns::DnsServerHandler;
use delirium_infrastructure::repositories::RecordStoreBackend;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct Services {
    pub store: Arc<RecordStoreBackend>,
    pub engine: Arc<CacheEngine>,
    pub resolve_query: Arc<ResolveQueryUseCase>,
    pub reload_config: Arc<ReloadConfigUseCase>,
}

impl Services {
    pub async fn new(
        config: Arc<RwLock<Config>>,
        store: RecordStoreBackend,
        overrides: CliOverrides,
    ) -> anyhow::Result<Self> {
        let store = Arc::new(store);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let settings = CacheSettings::from(&config.read().await.cache);

        let engine = Arc::new(
            CacheEngine::new(store.clone() as Arc<dyn RecordStore>, clock.clone(), settings)
                .await?,
        );
        let cache: Arc<dyn BindingCache> = engine.clone();

        Ok(Self {
            store,
            resolve_query: Arc::new(ResolveQueryUseCase::new(cache, clock)),
            reload_config: Arc::new(ReloadConfigUseCase::new(config, engine.clone(), overrides)),
            engine,
        })
    }

    pub fn dns_handler(&self) -> DnsServerHandler {
        DnsServerHandler::new(self.resolve_query.clone())
    }
}
