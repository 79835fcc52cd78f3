//! DNS-over-TLS transport (RFC 7858).
//!
//! One shared `ClientConfig` (so rustls can resume sessions) and a pool of
//! idle TLS connections per (addr, hostname).

use super::tcp::{connect_error, read_with_length_prefix, send_with_length_prefix};
use super::DnsTransport;
use async_trait::async_trait;
use dashmap::DashMap;
use ferrous_ptr_domain::DomainError;
use rustls::pki_types::ServerName;
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tracing::debug;

static SHARED_TLS_CONFIG: LazyLock<Arc<rustls::ClientConfig>> = LazyLock::new(|| {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(config)
});

static TLS_POOL: LazyLock<DashMap<(SocketAddr, Arc<str>), Vec<TlsStream<TcpStream>>>> =
    LazyLock::new(DashMap::new);

pub struct TlsTransport {
    server_addr: SocketAddr,
    hostname: Arc<str>,
    max_idle: usize,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, hostname: Arc<str>, max_idle: usize) -> Self {
        Self {
            server_addr,
            hostname,
            max_idle,
        }
    }

    fn pool_key(&self) -> (SocketAddr, Arc<str>) {
        (self.server_addr, Arc::clone(&self.hostname))
    }

    fn take_pooled(&self) -> Option<TlsStream<TcpStream>> {
        TLS_POOL.get_mut(&self.pool_key())?.pop()
    }

    fn return_to_pool(&self, stream: TlsStream<TcpStream>) {
        let mut entry = TLS_POOL.entry(self.pool_key()).or_default();
        if entry.len() < self.max_idle {
            entry.push(stream);
        }
    }

    async fn connect_new(&self, timeout: Duration) -> Result<TlsStream<TcpStream>, DomainError> {
        let connector = tokio_rustls::TlsConnector::from(Arc::clone(&SHARED_TLS_CONFIG));

        let server_name = ServerName::try_from(self.hostname.to_string()).map_err(|e| {
            DomainError::TransportError(format!(
                "Invalid TLS hostname '{}': {}",
                self.hostname, e
            ))
        })?;

        let tcp_stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| connect_error(self.server_addr, e))?;

        let tls_stream = tokio::time::timeout(timeout, connector.connect(server_name, tcp_stream))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| {
                DomainError::TransportError(format!(
                    "TLS handshake failed with {}: {}",
                    self.server_addr, e
                ))
            })?;

        debug!(server = %self.server_addr, hostname = %self.hostname, "TLS connection established");
        Ok(tls_stream)
    }

    async fn send_on_stream(
        &self,
        stream: &mut TlsStream<TcpStream>,
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
impl DnsTransport for TlsTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        if let Some(mut stream) = self.take_pooled() {
            match self
                .send_on_stream(&mut stream, message_bytes, timeout)
                .await
            {
                Ok(response) => {
                    debug!(server = %self.server_addr, "TLS query via pooled connection");
                    self.return_to_pool(stream);
                    return Ok(response);
                }
                Err(_) => {
                    debug!(server = %self.server_addr, "Pooled TLS connection stale, reconnecting");
                }
            }
        }

        let mut stream = self.connect_new(timeout).await?;
        let response = self
            .send_on_stream(&mut stream, message_bytes, timeout)
            .await?;

        debug!(
            server = %self.server_addr,
            response_len = response.len(),
            "TLS response received"
        );

        self.return_to_pool(stream);
        Ok(response)
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
