//! Flag validation
//!
//! Everything here runs before the first API call so a bad flag never
//! leaves a half-created resource behind.

use std::net::IpAddr;

use thiserror::Error;

use stratus_runtime::OBJECT_STORE_SIZE_UNIT_GB;

/// Default CIDR applied to rules created without `--cidr`
pub const DEFAULT_RULE_CIDR: &str = "0.0.0.0/0";

/// Input validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Object store size not a positive multiple of the size unit
    #[error("invalid size {size}GB: must be a positive multiple of {unit}GB")]
    InvalidSize {
        /// Requested size in GB
        size: u64,
        /// Size unit in GB
        unit: u64,
    },

    /// Port outside 1-65535
    #[error("invalid port `{0}`: must be a number between 1 and 65535")]
    InvalidPort(String),

    /// Unsupported rule protocol
    #[error("invalid protocol `{0}`: must be one of tcp, udp, icmp")]
    InvalidProtocol(String),

    /// Malformed CIDR block
    #[error("invalid CIDR `{0}`: expected an IPv4 or IPv6 network such as 10.0.0.0/24")]
    InvalidCidr(String),

    /// Unsupported rule direction
    #[error("invalid direction `{0}`: must be ingress or egress")]
    InvalidDirection(String),

    /// Unsupported rule action
    #[error("invalid action `{0}`: must be allow or deny")]
    InvalidAction(String),

    /// tcp/udp rule without a start port
    #[error("a start port is required for {0} rules")]
    MissingStartPort(String),

    /// End port before start port
    #[error("end port {end} is lower than start port {start}")]
    PortRange {
        /// Start port
        start: u16,
        /// End port
        end: u16,
    },

    /// No region from flag, environment or config file
    #[error("no region configured: pass --region, set STRATUS_REGION or add `region` to the config file")]
    MissingRegion,

    /// Custom output without fields
    #[error("custom output requires --fields, e.g. --fields id,name")]
    MissingFields,
}

/// Rule protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// ICMP, which carries no ports
    Icmp,
}

impl Protocol {
    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmp => "icmp",
        }
    }
}

/// Rule direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Incoming traffic
    #[default]
    Ingress,
    /// Outgoing traffic
    Egress,
}

impl Direction {
    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Egress => "egress",
        }
    }
}

/// Rule action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Let matching traffic through
    #[default]
    Allow,
    /// Drop matching traffic
    Deny,
}

impl Action {
    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

/// Check an object store size in GB
pub const fn validate_object_store_size(size: u64) -> Result<u64, ValidationError> {
    if size == 0 || size % OBJECT_STORE_SIZE_UNIT_GB != 0 {
        return Err(ValidationError::InvalidSize {
            size,
            unit: OBJECT_STORE_SIZE_UNIT_GB,
        });
    }
    Ok(size)
}

/// Parse a rule protocol, ignoring case
pub fn parse_protocol(value: &str) -> Result<Protocol, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tcp" => Ok(Protocol::Tcp),
        "udp" => Ok(Protocol::Udp),
        "icmp" => Ok(Protocol::Icmp),
        _ => Err(ValidationError::InvalidProtocol(value.to_string())),
    }
}

/// Parse a rule direction, ignoring case; empty means ingress
pub fn parse_direction(value: Option<&str>) -> Result<Direction, ValidationError> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "ingress") => Ok(Direction::Ingress),
        Some("egress") => Ok(Direction::Egress),
        Some(_) => Err(ValidationError::InvalidDirection(
            value.unwrap_or_default().to_string(),
        )),
    }
}

/// Parse a rule action, ignoring case; empty means allow
pub fn parse_action(value: Option<&str>) -> Result<Action, ValidationError> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "allow") => Ok(Action::Allow),
        Some("deny") => Ok(Action::Deny),
        Some(_) => Err(ValidationError::InvalidAction(
            value.unwrap_or_default().to_string(),
        )),
    }
}

/// Parse a port number in 1-65535
pub fn parse_port(value: &str) -> Result<u16, ValidationError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ValidationError::InvalidPort(value.to_string())),
    }
}

/// Check a CIDR block such as `10.0.0.0/8` or `2001:db8::/32`
///
/// A bare address is accepted and treated as a single host.
pub fn validate_cidr(value: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidCidr(value.to_string());
    let trimmed = value.trim();
    let (address, prefix) = match trimmed.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (trimmed, None),
    };

    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    let max_prefix = if address.is_ipv4() { 32 } else { 128 };
    if let Some(prefix) = prefix {
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        if prefix > max_prefix {
            return Err(invalid());
        }
    }
    Ok(trimmed.to_string())
}

/// Validated port range of a rule; `None` for icmp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    /// First port
    pub start: u16,
    /// Last port, inclusive
    pub end: u16,
}

/// Resolve the port range for a rule
///
/// The end port defaults to the start port. icmp rules may omit ports
/// entirely.
pub fn validate_ports(
    protocol: Protocol,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<PortRange>, ValidationError> {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());

    let Some(start) = start else {
        if protocol == Protocol::Icmp {
            return Ok(None);
        }
        return Err(ValidationError::MissingStartPort(
            protocol.as_str().to_string(),
        ));
    };

    let start = parse_port(start)?;
    let end = end.map(parse_port).transpose()?.unwrap_or(start);
    if end < start {
        return Err(ValidationError::PortRange { start, end });
    }
    Ok(Some(PortRange { start, end }))
}

/// Check every CIDR block, defaulting to [`DEFAULT_RULE_CIDR`]
pub fn validate_cidrs(values: &[String]) -> Result<Vec<String>, ValidationError> {
    if values.is_empty() {
        return Ok(vec![DEFAULT_RULE_CIDR.to_string()]);
    }
    values
        .iter()
        .flat_map(|value| value.split(','))
        .filter(|value| !value.trim().is_empty())
        .map(validate_cidr)
        .collect()
}
