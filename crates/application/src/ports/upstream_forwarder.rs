use async_trait::async_trait;
use ferrous_ptr_domain::DomainError;

#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// Relay a wire-format request and return the wire-format response.
    async fn forward(&self, request: &[u8]) -> Result<Vec<u8>, DomainError>;

    fn server_name(&self) -> String;
}
