use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MAX_HOSTNAME_LEN: usize = 253;

/// A host identifier: either a literal IP address or a DNS name.
///
/// Ordering puts every IP before every name, IPv4 before IPv6, and compares
/// addresses numerically so `10.0.0.2` sorts before `10.0.0.10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum HostAddr {
    Ip(IpAddr),
    Name(String),
}

impl HostAddr {
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            HostAddr::Ip(ip) => Some(*ip),
            HostAddr::Name(_) => None,
        }
    }
}

impl FromStr for HostAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(HostAddr::Ip(ip));
        }

        let valid_name = !s.is_empty()
            && s.len() <= MAX_HOSTNAME_LEN
            && !s.starts_with(['-', '.'])
            && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));

        if valid_name {
            Ok(HostAddr::Name(s.to_ascii_lowercase()))
        } else {
            Err(format!("invalid host: {s}"))
        }
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAddr::Ip(ip) => write!(f, "{ip}"),
            HostAddr::Name(name) => f.write_str(name),
        }
    }
}

impl From<IpAddr> for HostAddr {
    fn from(ip: IpAddr) -> Self {
        HostAddr::Ip(ip)
    }
}

impl From<HostAddr> for String {
    fn from(addr: HostAddr) -> Self {
        addr.to_string()
    }
}

impl TryFrom<String> for HostAddr {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
