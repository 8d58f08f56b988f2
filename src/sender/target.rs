use std::fmt::{Display, Formatter};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use crate::error::TargetError;

/// Validated destination of outgoing datagrams: an IPv4 host and a port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SendTarget {
    host: Ipv4Addr,
    port: u16,
}

impl SendTarget {
    /// Validates a host given as dotted quad and a port in 0-65535.
    pub fn new(host: &str, port: i64) -> Result<Self, TargetError> {
        let host =
            Ipv4Addr::from_str(host).map_err(|_| TargetError::InvalidHost(host.to_string()))?;
        let port = u16::try_from(port).map_err(|_| TargetError::PortOutOfRange(port))?;
        Ok(Self { host, port })
    }

    pub fn host(&self) -> Ipv4Addr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }
}

impl FromStr for SendTarget {
    type Err = TargetError;

    /// Parses a `host:port` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let &[host, port] = parts.as_slice() else {
            return Err(TargetError::Malformed(s.to_string()));
        };
        let port = port
            .parse::<i64>()
            .map_err(|_| TargetError::InvalidPort(port.to_string()))?;
        Self::new(host, port)
    }
}

impl Display for SendTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
