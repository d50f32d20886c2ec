//! # Audit Target Model
//!
//! A [`Target`] is one addressable login endpoint: a host, the service
//! expected behind it, and the port. Raw host lists are parsed line by line
//! with [`expand_line`], which accepts:
//! * A single host (`10.0.0.5`, `::1`, `gw.example.net`).
//! * A host with port (`10.0.0.5:2222`, `[fe80::1]:22`).
//! * A service scheme (`telnet://10.0.0.5`, `ssh://host:2222`).
//! * An IPv4 range (`192.168.1.1-50`, `192.168.1.1-192.168.1.50`).
//! * A CIDR block (`192.168.1.0/24`).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::host::HostAddr;
use crate::network::range::{self, Ipv4Range};

/// Upper bound on how many hosts a single range or CIDR line may expand to.
pub const MAX_EXPANSION: u64 = 65_536;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Ssh,
    Telnet,
}

impl ServiceKind {
    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Ssh => 22,
            ServiceKind::Telnet => 23,
        }
    }

    /// The service conventionally listening on `port`, if any.
    pub fn from_port(port: u16) -> Option<Self> {
        match port {
            22 => Some(ServiceKind::Ssh),
            23 => Some(ServiceKind::Telnet),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Ssh => "ssh",
            ServiceKind::Telnet => "telnet",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Ok(ServiceKind::Ssh),
            "telnet" => Ok(ServiceKind::Telnet),
            other => Err(TargetParseError::UnknownService(other.to_string())),
        }
    }
}

/// One endpoint to audit. Identity is the whole `(address, service, port)`
/// tuple, which is also the sort order used by reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target {
    address: HostAddr,
    service: ServiceKind,
    port: u16,
}

impl Target {
    pub fn new(address: HostAddr, service: ServiceKind, port: u16) -> Self {
        Self {
            address,
            service,
            port,
        }
    }

    /// A target on the service's well-known port.
    pub fn with_default_port(address: HostAddr, service: ServiceKind) -> Self {
        Self::new(address, service, service.default_port())
    }

    pub fn address(&self) -> &HostAddr {
        &self.address
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The socket address when the host is a literal IP.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.address.ip().map(|ip| SocketAddr::new(ip, self.port))
    }

    /// `host:port`, with IPv6 literals bracketed. Suitable for resolvers.
    pub fn authority(&self) -> String {
        match &self.address {
            HostAddr::Ip(IpAddr::V6(v6)) => format!("[{v6}]:{}", self.port),
            other => format!("{other}:{}", self.port),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.service, self.authority())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("empty target")]
    Empty,
    #[error("unknown service '{0}'")]
    UnknownService(String),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("invalid host '{0}'")]
    InvalidHost(String),
    #[error("invalid range '{0}': {1}")]
    InvalidRange(String, String),
    #[error("'{0}' expands to {1} hosts (limit is {limit})", limit = MAX_EXPANSION)]
    RangeTooLarge(String, u64),
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<TargetParseError>,
    },
}

/// Parses one raw host-list line into one or more targets.
///
/// `default_service` applies when the line carries no scheme; the port
/// defaults to the service's well-known port.
pub fn expand_line(line: &str, default_service: ServiceKind) -> Result<Vec<Target>, TargetParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(TargetParseError::Empty);
    }

    let (service, rest) = match line.split_once("://") {
        Some((scheme, rest)) => (scheme.parse::<ServiceKind>()?, rest),
        None => (default_service, line),
    };

    let (host_part, port) = split_port(rest)?;
    let port: u16 = port.unwrap_or_else(|| service.default_port());

    let hosts: Vec<HostAddr> = parse_hosts(host_part)?;
    Ok(hosts
        .into_iter()
        .map(|address| Target::new(address, service, port))
        .collect())
}

/// Separates an optional `:port` suffix. Bare IPv6 literals contain several
/// colons and never carry a port unless bracketed.
fn split_port(s: &str) -> Result<(&str, Option<u16>), TargetParseError> {
    if let Some(inner) = s.strip_prefix('[') {
        let Some((host, after)) = inner.split_once(']') else {
            return Err(TargetParseError::InvalidHost(s.to_string()));
        };
        return match after.strip_prefix(':') {
            Some(port) => Ok((host, Some(parse_port(port)?))),
            None if after.is_empty() => Ok((host, None)),
            None => Err(TargetParseError::InvalidHost(s.to_string())),
        };
    }

    if s.matches(':').count() == 1 {
        if let Some((host, port)) = s.split_once(':') {
            return Ok((host, Some(parse_port(port)?)));
        }
    }

    Ok((s, None))
}

fn parse_port(s: &str) -> Result<u16, TargetParseError> {
    match s.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(TargetParseError::InvalidPort(s.to_string())),
    }
}

fn parse_hosts(s: &str) -> Result<Vec<HostAddr>, TargetParseError> {
    if let Some(range) = parse_cidr_range(s)? {
        return expand_range(s, range);
    }

    if let Ok(addr) = s.parse::<IpAddr>() {
        return Ok(vec![HostAddr::Ip(addr)]);
    }

    if let Some(range) = parse_ip_range(s)? {
        return expand_range(s, range);
    }

    s.parse::<HostAddr>()
        .map(|addr| vec![addr])
        .map_err(|_| TargetParseError::InvalidHost(s.to_string()))
}

fn expand_range(original: &str, range: Ipv4Range) -> Result<Vec<HostAddr>, TargetParseError> {
    let len: u64 = range.len();
    if len == 0 {
        return Err(TargetParseError::InvalidRange(
            original.to_string(),
            "start is after end".to_string(),
        ));
    }
    if len > MAX_EXPANSION {
        return Err(TargetParseError::RangeTooLarge(original.to_string(), len));
    }
    Ok(range.to_iter().map(HostAddr::Ip).collect())
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
///
/// Returns `Ok(None)` when the left side is not an IPv4 address, so host
/// names containing dashes fall through to name parsing.
fn parse_ip_range(s: &str) -> Result<Option<Ipv4Range>, TargetParseError> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let Ok(start_addr) = start_str.trim().parse::<Ipv4Addr>() else {
        return Ok(None);
    };

    let end_addr = parse_range_end_addr(end_str.trim(), &start_addr)
        .map_err(|reason| TargetParseError::InvalidRange(s.to_string(), reason))?;

    Ok(Some(Ipv4Range::new(start_addr, end_addr)))
}

/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(end_str: &str, start_addr: &Ipv4Addr) -> Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err("end of range cannot be empty".to_string());
    }

    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| format!("invalid end '{end_str}': {e}"))?;

    if partial_octets.len() > 4 {
        return Err(format!("end has too many octets: {end_str}"));
    }

    let mut end_octets = start_addr.octets();
    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<Option<Ipv4Range>, TargetParseError> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let invalid = |reason: String| TargetParseError::InvalidRange(s.to_string(), reason);

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| invalid(format!("bad address '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| invalid(format!("bad prefix '{prefix_str}': {e}")))?;

    let ipv4_range = range::cidr_range(ipv4_addr, prefix).map_err(|e| invalid(e.to_string()))?;

    Ok(Some(ipv4_range))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
