use ferrous_ptr_domain::config::PersistentStoreConfig;
use ferrous_ptr_infrastructure::database::create_read_only_pool;
use sqlx::SqlitePool;
use tracing::{error, info};

pub async fn init_address_store(cfg: &PersistentStoreConfig) -> anyhow::Result<SqlitePool> {
    info!(path = %cfg.path, "Opening persistent address store");

    let pool = create_read_only_pool(&cfg.path, cfg.max_connections)
        .await
        .map_err(|e| {
            error!(path = %cfg.path, "Failed to open address store: {}", e);
            anyhow::anyhow!("cannot open address store {}: {}", cfg.path, e)
        })?;

    info!(
        path = %cfg.path,
        max_connections = cfg.max_connections,
        "Persistent address store ready (read-only)"
    );

    Ok(pool)
}
