use super::RecordType;
use std::net::IpAddr;
use std::sync::Arc;

/// A decoded inbound question, as handed over by the listener.
#[derive(Debug, Clone)]
pub struct PtrQuery {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub client_ip: IpAddr,
}

impl PtrQuery {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType, client_ip: IpAddr) -> Self {
        Self {
            name: name.into(),
            record_type,
            client_ip,
        }
    }
}
