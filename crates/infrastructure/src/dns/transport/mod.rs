pub mod tcp;
pub mod tls;

use async_trait::async_trait;
use ferrous_ptr_application::ports::UpstreamForwarder;
use ferrous_ptr_domain::{DnsProtocol, DomainError};
use std::time::Duration;

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Tcp(tcp::TcpTransport),
    Tls(tls::TlsTransport),
}

impl Transport {
    pub async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        match self {
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Tcp(t) => t.protocol_name(),
            Self::Tls(t) => t.protocol_name(),
        }
    }
}

pub fn create_transport(protocol: &DnsProtocol, max_idle: usize) -> Transport {
    match protocol {
        DnsProtocol::Tcp { addr } => Transport::Tcp(tcp::TcpTransport::new(*addr, max_idle)),
        DnsProtocol::Tls { addr, hostname } => Transport::Tls(tls::TlsTransport::new(
            *addr,
            hostname.clone(),
            max_idle,
        )),
    }
}

/// Relays raw queries to the configured upstream resolver.
pub struct UpstreamRelay {
    protocol: DnsProtocol,
    transport: Transport,
    timeout: Duration,
}

impl UpstreamRelay {
    pub fn new(protocol: DnsProtocol, timeout: Duration, max_idle: usize) -> Self {
        let transport = create_transport(&protocol, max_idle);
        Self {
            protocol,
            transport,
            timeout,
        }
    }
}

#[async_trait]
impl UpstreamForwarder for UpstreamRelay {
    async fn forward(&self, request: &[u8]) -> Result<Vec<u8>, DomainError> {
        let response = self.transport.send(request, self.timeout).await?;

        if response.len() < 2 || request.len() < 2 || response[..2] != request[..2] {
            return Err(DomainError::InvalidDnsMessage(format!(
                "{} answered with a mismatched message id",
                self.protocol
            )));
        }

        Ok(response)
    }

    fn server_name(&self) -> String {
        format!("{} ({})", self.protocol, self.transport.protocol_name())
    }
}
