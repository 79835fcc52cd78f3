use async_trait::async_trait;
use ferrous_ptr_domain::DomainError;
use std::net::IpAddr;
use std::sync::Arc;

/// A store that may know a name for an address.
///
/// `Ok(None)` means the store answered and has no entry. `Err` means the
/// store could not be asked at all.
#[async_trait]
pub trait PtrBackend: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> Result<Option<Arc<str>>, DomainError>;
}
