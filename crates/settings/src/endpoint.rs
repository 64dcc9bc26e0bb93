//! Network endpoints for cluster members.
//!
//! Every [`EndPoint`] is validated when it is created, so its `Display` form
//! always parses back to an equal value.

use std::{
    fmt,
    net::{IpAddr, SocketAddr, SocketAddrV6},
    str::FromStr,
};

use snafu::ensure;

use crate::error::{InvalidArgumentSnafu, Result, SettingsError};

const PARAMETER: &str = "end_point";

/// Standard port a server listens on when none is given.
pub const DEFAULT_PORT: u16 = 27017;

/// Address of a server: either a host name resolved later, or a literal socket address.
///
/// Host names are never IP literals and never contain `:`, `[`, `]`, or
/// whitespace. Ports are never zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndPoint {
    address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Address {
    Dns { host: String, port: u16 },
    Ip(SocketAddr),
}

impl EndPoint {
    /// Creates a host-name endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidArgument`] if the host is empty,
    /// contains whitespace, `:`, `[` or `]`, is an IP literal (use
    /// [`EndPoint::ip`]), or if the port is zero.
    pub fn dns(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        check_host(&host)?;
        check_port(port)?;
        Ok(Self { address: Address::Dns { host, port } })
    }

    /// Creates an endpoint for a literal socket address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidArgument`] if the port is zero or an
    /// IPv6 address carries flow information.
    pub fn ip(addr: SocketAddr) -> Result<Self> {
        check_port(addr.port())?;
        if let SocketAddr::V6(v6) = addr {
            ensure!(
                v6.flowinfo() == 0,
                InvalidArgumentSnafu {
                    parameter: PARAMETER,
                    message: format!("endpoint '{addr}' cannot carry flow information"),
                }
            );
        }
        Ok(Self { address: Address::Ip(addr) })
    }

    /// Returns the endpoint every settings object points at by default.
    #[must_use]
    pub fn localhost() -> Self {
        Self { address: Address::Dns { host: "localhost".to_owned(), port: DEFAULT_PORT } }
    }

    /// Returns the host name, or `None` for a literal address.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        match &self.address {
            Address::Dns { host, .. } => Some(host),
            Address::Ip(_) => None,
        }
    }

    /// Returns the socket address, or `None` for a host name.
    #[must_use]
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self.address {
            Address::Dns { .. } => None,
            Address::Ip(addr) => Some(addr),
        }
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        match &self.address {
            Address::Dns { port, .. } => *port,
            Address::Ip(addr) => addr.port(),
        }
    }
}

impl TryFrom<SocketAddr> for EndPoint {
    type Error = SettingsError;

    fn try_from(addr: SocketAddr) -> Result<Self> {
        Self::ip(addr)
    }
}

impl fmt::Display for EndPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Address::Dns { host, port } => write!(f, "{host}:{port}"),
            Address::Ip(addr) => write!(f, "{addr}"),
        }
    }
}

impl FromStr for EndPoint {
    type Err = SettingsError;

    /// Parses `host`, `host:port`, `ip:port`, `[ipv6]`, or `[ipv6]:port`.
    fn from_str(s: &str) -> Result<Self> {
        ensure!(
            !s.is_empty(),
            InvalidArgumentSnafu { parameter: PARAMETER, message: "endpoint cannot be empty" }
        );
        ensure!(
            !s.contains(char::is_whitespace),
            InvalidArgumentSnafu {
                parameter: PARAMETER,
                message: format!("endpoint '{s}' cannot contain whitespace"),
            }
        );

        if let Some(rest) = s.strip_prefix('[') {
            let Some((host, tail)) = rest.split_once(']') else {
                return invalid(format!("endpoint '{s}' has an unterminated IPv6 literal"));
            };
            let port = match tail {
                "" => DEFAULT_PORT,
                _ => match tail.strip_prefix(':') {
                    Some(port) => parse_port(s, port)?,
                    None => return invalid(format!("endpoint '{s}' has trailing characters")),
                },
            };
            // Parsed as a full socket address so scope ids survive.
            let addr: SocketAddrV6 = match format!("[{host}]:{port}").parse() {
                Ok(addr) => addr,
                Err(_) => return invalid(format!("'{host}' is not a valid IPv6 address")),
            };
            return Self::ip(addr.into());
        }

        let (host, port) = match s.rsplit_once(':') {
            Some((host, port)) => (host, parse_port(s, port)?),
            None => (s, DEFAULT_PORT),
        };
        if host.contains(':') {
            return invalid(format!("IPv6 endpoint '{s}' must be enclosed in brackets"));
        }
        match host.parse::<IpAddr>() {
            Ok(ip) => Self::ip(SocketAddr::new(ip, port)),
            Err(_) => Self::dns(host, port),
        }
    }
}

fn check_host(host: &str) -> Result<()> {
    ensure!(
        !host.is_empty(),
        InvalidArgumentSnafu { parameter: PARAMETER, message: "host cannot be empty" }
    );
    ensure!(
        !host.contains(|c: char| c.is_whitespace() || matches!(c, ':' | '[' | ']')),
        InvalidArgumentSnafu {
            parameter: PARAMETER,
            message: format!("host '{host}' cannot contain whitespace, ':', '[' or ']'"),
        }
    );
    ensure!(
        host.parse::<IpAddr>().is_err(),
        InvalidArgumentSnafu {
            parameter: PARAMETER,
            message: format!("host '{host}' is an IP literal"),
        }
    );
    Ok(())
}

fn check_port(port: u16) -> Result<()> {
    ensure!(
        port != 0,
        InvalidArgumentSnafu { parameter: PARAMETER, message: "port cannot be zero" }
    );
    Ok(())
}

fn parse_port(endpoint: &str, port: &str) -> Result<u16> {
    match port.parse::<u16>() {
        Ok(0) | Err(_) => invalid(format!("endpoint '{endpoint}' has an invalid port '{port}'")),
        Ok(port) => Ok(port),
    }
}

fn invalid<T>(message: impl Into<String>) -> Result<T> {
    InvalidArgumentSnafu { parameter: PARAMETER, message: message.into() }.fail()
}
