use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// How fallthrough queries reach the upstream resolver.
///
/// Both variants are stream transports so a single connection can be kept
/// open and reused across queries. Addresses must be literal IPs: the proxy
/// is usually the host's only resolver and cannot look up its own upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Tcp {
        addr: SocketAddr,
    },
    Tls {
        addr: SocketAddr,
        hostname: Arc<str>,
    },
}

impl DnsProtocol {
    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            DnsProtocol::Tcp { addr } | DnsProtocol::Tls { addr, .. } => *addr,
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        match self {
            DnsProtocol::Tls { hostname, .. } => Some(hostname),
            DnsProtocol::Tcp { .. } => None,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            DnsProtocol::Tcp { .. } => "TCP",
            DnsProtocol::Tls { .. } => "TLS",
        }
    }
}

fn parse_socket_addr(s: &str, what: &str) -> Result<SocketAddr, String> {
    s.parse::<SocketAddr>()
        .map_err(|e| format!("Invalid {} address '{}': {}", what, s, e))
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_socket_addr(addr_str, "TCP")?;
            return Ok(DnsProtocol::Tcp { addr });
        }
        if let Some(rest) = s.strip_prefix("tls://") {
            let (hostname, addr_str) = rest.split_once('@').ok_or_else(|| {
                format!(
                    "Invalid TLS format '{}'. Expected 'tls://HOSTNAME@IP:PORT'",
                    s
                )
            })?;
            if hostname.is_empty() {
                return Err(format!("Missing TLS hostname in '{}'", s));
            }
            let addr = parse_socket_addr(addr_str, "TLS")?;
            return Ok(DnsProtocol::Tls {
                addr,
                hostname: hostname.into(),
            });
        }
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(DnsProtocol::Tcp { addr });
        }
        Err(format!(
            "Invalid upstream format: '{}'. Expected: tcp://IP:PORT, tls://HOSTNAME@IP:PORT, or IP:PORT",
            s
        ))
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
            DnsProtocol::Tls { addr, hostname } => write!(f, "tls://{}@{}", hostname, addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tcp() {
        let p: DnsProtocol = "tcp://9.9.9.9:53".parse().unwrap();
        assert_eq!(p.protocol_name(), "TCP");
        assert_eq!(p.socket_addr(), "9.9.9.9:53".parse().unwrap());
        assert!(p.hostname().is_none());
    }

    #[test]
    fn test_bare_address_is_tcp() {
        let p: DnsProtocol = "[2620:fe::fe]:53".parse().unwrap();
        assert_eq!(p.protocol_name(), "TCP");
    }

    #[test]
    fn test_parse_tls_with_hostname() {
        let p: DnsProtocol = "tls://dns.quad9.net@9.9.9.9:853".parse().unwrap();
        assert_eq!(p.protocol_name(), "TLS");
        assert_eq!(p.hostname(), Some("dns.quad9.net"));
        assert_eq!(p.to_string(), "tls://dns.quad9.net@9.9.9.9:853");
    }

    #[test]
    fn test_tls_requires_hostname_and_ip() {
        assert!("tls://9.9.9.9:853".parse::<DnsProtocol>().is_err());
        assert!("tls://@9.9.9.9:853".parse::<DnsProtocol>().is_err());
        assert!("tls://dns.quad9.net@dns.quad9.net:853"
            .parse::<DnsProtocol>()
            .is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!("udp://1.1.1.1:53".parse::<DnsProtocol>().is_err());
        assert!("1.1.1.1".parse::<DnsProtocol>().is_err());
    }
}
