use super::DnsTransport;
use async_trait::async_trait;
use dashmap::DashMap;
use ferrous_ptr_domain::DomainError;
use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

type TcpConnectionPool = DashMap<SocketAddr, Vec<TcpStream>>;

static TCP_POOL: LazyLock<TcpConnectionPool> = LazyLock::new(TcpConnectionPool::new);

/// DNS over TCP (RFC 7766) with idle connection reuse.
pub struct TcpTransport {
    server_addr: SocketAddr,
    max_idle: usize,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr, max_idle: usize) -> Self {
        Self {
            server_addr,
            max_idle,
        }
    }

    fn take_pooled(&self) -> Option<TcpStream> {
        TCP_POOL.get_mut(&self.server_addr)?.pop()
    }

    fn return_to_pool(&self, stream: TcpStream) {
        let mut entry = TCP_POOL.entry(self.server_addr).or_default();
        if entry.len() < self.max_idle {
            entry.push(stream);
        }
    }

    async fn connect_new(&self, timeout: Duration) -> Result<TcpStream, DomainError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| connect_error(self.server_addr, e))?;

        stream.set_nodelay(true).map_err(|e| {
            DomainError::TransportError(format!(
                "Failed to set TCP_NODELAY on {}: {}",
                self.server_addr, e
            ))
        })?;

        Ok(stream)
    }

    async fn exchange(
        &self,
        stream: &mut TcpStream,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        tokio::time::timeout(timeout, send_with_length_prefix(stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        tokio::time::timeout(timeout, read_with_length_prefix(stream))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        if let Some(mut stream) = self.take_pooled() {
            match self.exchange(&mut stream, message_bytes, timeout).await {
                Ok(response) => {
                    debug!(server = %self.server_addr, "TCP query via pooled connection");
                    self.return_to_pool(stream);
                    return Ok(response);
                }
                Err(_) => {
                    debug!(server = %self.server_addr, "Pooled TCP connection stale, reconnecting");
                }
            }
        }

        let mut stream = self.connect_new(timeout).await?;
        let response = self.exchange(&mut stream, message_bytes, timeout).await?;

        debug!(
            server = %self.server_addr,
            response_len = response.len(),
            "TCP response received"
        );

        self.return_to_pool(stream);
        Ok(response)
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

/// Refusals keep their own variant; every other connect failure carries the
/// io error text.
pub(crate) fn connect_error(server: SocketAddr, e: std::io::Error) -> DomainError {
    debug!(server = %server, error = %e, "Upstream connect failed");
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        _ => DomainError::TransportError(format!("Failed to connect to {}: {}", server, e)),
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::InvalidDnsMessage(format!(
            "Message too large for TCP framing: {} bytes",
            message_bytes.len()
        ))
    })?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to write length prefix: {}", e)))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to read response length: {}", e))
    })?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsMessage(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to read response body: {}", e))
    })?;

    Ok(response)
}
