use async_trait::async_trait;
use ferrous_ptr_domain::DomainError;

/// Raw key lookups against the discovery cache. Values are either a
/// terminal name or an alias that must be looked up again.
#[async_trait]
pub trait DiscoveryStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
}
