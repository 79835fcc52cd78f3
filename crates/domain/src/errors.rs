use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR format: {0}")]
    InvalidCidr(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Discovery cache error: {0}")]
    DiscoveryError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Outcome of decoding a query name as a reverse lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReverseLookupError {
    #[error("Query is not a reverse lookup")]
    NotReversible,

    #[error("Malformed reverse lookup name: {0}")]
    InvalidAddress(String),
}
