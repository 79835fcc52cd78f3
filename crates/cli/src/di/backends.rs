use crate::bootstrap;
use ferrous_ptr_application::ports::PtrBackend;
use ferrous_ptr_application::services::{AliasCollapser, BackendRegistry};
use ferrous_ptr_domain::{BackendKind, Config};
use ferrous_ptr_infrastructure::discovery::RedisDiscoveryStore;
use ferrous_ptr_infrastructure::repositories::SqliteAddressRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct Backends {
    pub registry: Arc<BackendRegistry>,
}

impl Backends {
    /// Adapters are only built for the store sections present in the config.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_millis(config.synthesis.backend_timeout_ms);
        let mut registry = BackendRegistry::new(timeout);

        if let Some(store_cfg) = &config.backends.persistent_store {
            let pool = bootstrap::init_address_store(store_cfg).await?;
            let repository: Arc<dyn PtrBackend> = Arc::new(SqliteAddressRepository::new(pool));
            registry = registry.with_persistent_store(repository);
        }

        if let Some(discovery_cfg) = &config.backends.dynamic_discovery {
            let store = Arc::new(RedisDiscoveryStore::new(
                discovery_cfg.address.clone(),
                timeout,
                discovery_cfg.max_idle_connections,
            ));
            let collapser: Arc<dyn PtrBackend> = Arc::new(AliasCollapser::new(
                store,
                discovery_cfg.key_prefix.as_str(),
                discovery_cfg.max_hops,
            ));
            registry = registry.with_dynamic_discovery(collapser);

            info!(
                address = %discovery_cfg.address,
                key_prefix = %discovery_cfg.key_prefix,
                max_hops = discovery_cfg.max_hops,
                "Dynamic discovery backend configured"
            );
        }

        info!(
            persistent_store = registry.has_adapter(&BackendKind::PersistentStore),
            dynamic_discovery = registry.has_adapter(&BackendKind::DynamicDiscovery),
            timeout_ms = config.synthesis.backend_timeout_ms,
            "Backend registry initialized"
        );

        Ok(Self {
            registry: Arc::new(registry),
        })
    }
}
