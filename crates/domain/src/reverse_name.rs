//! Reverse-lookup name codec.
//!
//! Turns `23.0.0.10.in-addr.arpa.` / `...ip6.arpa.` query names into the
//! address they describe, and back.

use crate::errors::ReverseLookupError;
use crate::RecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const IN_ADDR_ARPA: &str = ".in-addr.arpa";
const IP6_ARPA: &str = ".ip6.arpa";

pub struct ReverseName;

impl ReverseName {
    /// Decode a query into the address it asks about.
    ///
    /// Anything that is not a `PTR` question under `in-addr.arpa` or
    /// `ip6.arpa` is `NotReversible`. A name under those zones that does not
    /// spell out a complete address is `InvalidAddress`.
    pub fn parse(name: &str, record_type: RecordType) -> Result<IpAddr, ReverseLookupError> {
        if !record_type.is_ptr() {
            return Err(ReverseLookupError::NotReversible);
        }

        let name = name.strip_suffix('.').unwrap_or(name);
        let lower = name.to_ascii_lowercase();

        if let Some(labels) = strip_zone(&lower, IN_ADDR_ARPA) {
            return parse_v4(labels).map(IpAddr::V4);
        }

        if let Some(labels) = strip_zone(&lower, IP6_ARPA) {
            return parse_v6(labels).map(IpAddr::V6);
        }

        Err(ReverseLookupError::NotReversible)
    }

    /// Canonical reverse name for an address, without the trailing dot.
    pub fn from_ip(ip: &IpAddr) -> String {
        match ip {
            IpAddr::V4(ipv4) => {
                let octets = ipv4.octets();
                format!(
                    "{}.{}.{}.{}.in-addr.arpa",
                    octets[3], octets[2], octets[1], octets[0]
                )
            }
            IpAddr::V6(ipv6) => {
                let mut nibbles = Vec::with_capacity(32);
                for byte in ipv6.octets().iter().rev() {
                    nibbles.push(format!("{:x}", byte & 0x0f));
                    nibbles.push(format!("{:x}", (byte >> 4) & 0x0f));
                }
                format!("{}.ip6.arpa", nibbles.join("."))
            }
        }
    }
}

/// Returns the labels in front of `zone`. The bare zone apex yields `Some("")`.
fn strip_zone<'a>(name: &'a str, zone: &str) -> Option<&'a str> {
    if let Some(labels) = name.strip_suffix(zone) {
        return Some(labels);
    }
    if name == &zone[1..] {
        return Some("");
    }
    None
}

fn parse_v4(labels: &str) -> Result<Ipv4Addr, ReverseLookupError> {
    let parts: Vec<&str> = labels.split('.').collect();
    if parts.len() != 4 {
        return Err(ReverseLookupError::InvalidAddress(format!(
            "expected 4 octets under in-addr.arpa, got {}",
            if labels.is_empty() { 0 } else { parts.len() }
        )));
    }

    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(parts.iter().rev()) {
        *slot = parse_octet(part)?;
    }

    Ok(Ipv4Addr::from(octets))
}

fn parse_octet(label: &str) -> Result<u8, ReverseLookupError> {
    let well_formed = !label.is_empty()
        && label.len() <= 3
        && label.bytes().all(|b| b.is_ascii_digit())
        && !(label.len() > 1 && label.starts_with('0'));

    if !well_formed {
        return Err(ReverseLookupError::InvalidAddress(format!(
            "invalid octet label '{}'",
            label
        )));
    }

    label
        .parse::<u8>()
        .map_err(|_| ReverseLookupError::InvalidAddress(format!("octet out of range '{}'", label)))
}

fn parse_v6(labels: &str) -> Result<Ipv6Addr, ReverseLookupError> {
    let nibbles: Vec<&str> = labels.split('.').collect();
    if nibbles.len() != 32 {
        return Err(ReverseLookupError::InvalidAddress(format!(
            "expected 32 nibbles under ip6.arpa, got {}",
            if labels.is_empty() { 0 } else { nibbles.len() }
        )));
    }

    let mut value: u128 = 0;
    for nibble in nibbles.iter().rev() {
        let mut chars = nibble.chars();
        let digit = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_digit(16),
            _ => None,
        }
        .ok_or_else(|| {
            ReverseLookupError::InvalidAddress(format!("invalid nibble label '{}'", nibble))
        })?;
        value = (value << 4) | u128::from(digit);
    }

    Ok(Ipv6Addr::from(value))
}
