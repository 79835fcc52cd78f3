use crate::domain_name::require_valid;
use crate::DomainError;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Whether a rule's default name is tried before or after its backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PrecedenceMode {
    #[serde(rename = "first", alias = "default_first")]
    DefaultFirst,

    #[serde(rename = "last", alias = "default_last")]
    DefaultLast,
}

impl PrecedenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecedenceMode::DefaultFirst => "first",
            PrecedenceMode::DefaultLast => "last",
        }
    }
}

impl FromStr for PrecedenceMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "default_first" => Ok(PrecedenceMode::DefaultFirst),
            "last" | "default_last" => Ok(PrecedenceMode::DefaultLast),
            other => Err(DomainError::ConfigError(format!(
                "unknown precedence mode '{}' (expected first or last)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRule {
    pub network: IpNetwork,
    pub mode: PrecedenceMode,
    /// Fully qualified, always ends with a dot.
    pub default_name: Option<Arc<str>>,
}

impl SubnetRule {
    /// Build a rule from its textual parts. A bare address is a host route.
    pub fn parse(
        network: &str,
        mode: PrecedenceMode,
        default_name: Option<&str>,
    ) -> Result<Self, DomainError> {
        let network = parse_network(network)?;
        let default_name = default_name
            .map(|name| require_valid(name, &format!("default for {}", network)))
            .transpose()?;

        Ok(Self {
            network,
            mode,
            default_name,
        })
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.network.contains(ip)
    }
}

impl fmt::Display for SubnetRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.network,
            self.mode.as_str(),
            self.default_name.as_deref().unwrap_or("--")
        )
    }
}

impl FromStr for SubnetRule {
    type Err = DomainError;

    /// Compact form: `net mode [fqdn]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(DomainError::ConfigError(format!(
                "rule is 'net mode [fqdn]': '{}'",
                s
            )));
        }

        let mode: PrecedenceMode = fields[1].parse()?;
        Self::parse(fields[0], mode, fields.get(2).copied())
    }
}

fn parse_network(s: &str) -> Result<IpNetwork, DomainError> {
    let network = if s.contains('/') {
        IpNetwork::from_str(s).map_err(|e| DomainError::InvalidCidr(format!("{}: {}", s, e)))?
    } else {
        let ip: IpAddr = s
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(s.to_string()))?;
        let host_prefix = if ip.is_ipv4() { 32 } else { 128 };
        IpNetwork::new(ip, host_prefix)
            .map_err(|e| DomainError::InvalidCidr(format!("{}: {}", s, e)))?
    };

    if network.ip() != network.network() {
        return Err(DomainError::InvalidCidr(format!(
            "{} has host bits set (network is {}/{})",
            s,
            network.network(),
            network.prefix()
        )));
    }

    Ok(network)
}
