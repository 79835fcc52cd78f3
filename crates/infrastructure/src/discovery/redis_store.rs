use super::resp::{encode_command, read_value, RespValue};
use async_trait::async_trait;
use ferrous_ptr_application::ports::DiscoveryStore;
use ferrous_ptr_domain::DomainError;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

type Connection = BufReader<TcpStream>;

/// `GET`-only client for the Redis-protocol cache written by the discovery
/// process. Idle connections are kept for reuse; any connection that saw an
/// error is dropped.
pub struct RedisDiscoveryStore {
    address: String,
    timeout: Duration,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
}

impl RedisDiscoveryStore {
    pub fn new(address: impl Into<String>, timeout: Duration, max_idle: usize) -> Self {
        Self {
            address: address.into(),
            timeout,
            max_idle,
            idle: Mutex::new(Vec::new()),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn take_pooled(&self) -> Option<Connection> {
        self.idle.lock().ok()?.pop()
    }

    fn return_to_pool(&self, conn: Connection) {
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < self.max_idle {
                idle.push(conn);
            }
        }
    }

    async fn connect_new(&self) -> Result<Connection, DomainError> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| {
                DomainError::DiscoveryError(format!("Timeout connecting to {}", self.address))
            })?
            .map_err(|e| {
                DomainError::DiscoveryError(format!("Cannot connect to {}: {}", self.address, e))
            })?;

        stream.set_nodelay(true).map_err(|e| {
            DomainError::DiscoveryError(format!(
                "Failed to set TCP_NODELAY on {}: {}",
                self.address, e
            ))
        })?;

        debug!(server = %self.address, "Discovery cache connection established");
        Ok(BufReader::new(stream))
    }

    async fn exchange(&self, conn: &mut Connection, key: &str) -> Result<RespValue, DomainError> {
        let command = encode_command(&["GET", key]);

        tokio::time::timeout(self.timeout, async {
            let stream = conn.get_mut();
            stream
                .write_all(&command)
                .await
                .map_err(|e| DomainError::DiscoveryError(format!("write failed: {}", e)))?;
            stream
                .flush()
                .await
                .map_err(|e| DomainError::DiscoveryError(format!("flush failed: {}", e)))?;
            read_value(&mut *conn).await
        })
        .await
        .map_err(|_| {
            DomainError::DiscoveryError(format!("Timeout waiting for {}", self.address))
        })?
    }
}

#[async_trait]
impl DiscoveryStore for RedisDiscoveryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let reply = match self.take_pooled() {
            Some(mut conn) => match self.exchange(&mut conn, key).await {
                Ok(reply) => {
                    self.return_to_pool(conn);
                    reply
                }
                Err(e) => {
                    debug!(server = %self.address, error = %e, "Pooled connection stale, reconnecting");
                    let mut conn = self.connect_new().await?;
                    let reply = self.exchange(&mut conn, key).await?;
                    self.return_to_pool(conn);
                    reply
                }
            },
            None => {
                let mut conn = self.connect_new().await?;
                let reply = self.exchange(&mut conn, key).await?;
                self.return_to_pool(conn);
                reply
            }
        };

        match reply {
            RespValue::BulkString(None) => Ok(None),
            RespValue::BulkString(Some(bytes)) => {
                let value = String::from_utf8(bytes).map_err(|_| {
                    DomainError::DiscoveryError(format!("Value for '{}' is not UTF-8", key))
                })?;
                let value = value.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            RespValue::SimpleString(value) => Ok(Some(value)),
            RespValue::Error(message) => Err(DomainError::DiscoveryError(format!(
                "{} rejected GET {}: {}",
                self.address, key, message
            ))),
            RespValue::Integer(_) => Err(DomainError::DiscoveryError(format!(
                "Unexpected integer reply for GET {}",
                key
            ))),
        }
    }
}
