use async_trait::async_trait;
use ferrous_ptr_application::ports::PtrBackend;
use ferrous_ptr_domain::DomainError;
use sqlx::{Row, SqlitePool};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Address → name overrides kept in a local SQLite file
/// (`Address(address TEXT PRIMARY KEY, fqdn TEXT)`).
pub struct SqliteAddressRepository {
    pool: SqlitePool,
}

impl SqliteAddressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PtrBackend for SqliteAddressRepository {
    async fn lookup(&self, ip: IpAddr) -> Result<Option<Arc<str>>, DomainError> {
        let row = sqlx::query("SELECT fqdn FROM Address WHERE address = ?")
            .bind(ip.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(format!("Address lookup failed: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let fqdn: Option<String> = row
            .try_get("fqdn")
            .map_err(|e| DomainError::DatabaseError(format!("Bad fqdn column: {}", e)))?;

        let fqdn = fqdn.filter(|name| !name.trim().is_empty());
        debug!(address = %ip, fqdn = ?fqdn, "Address store lookup");

        Ok(fqdn.map(Arc::from))
    }
}
