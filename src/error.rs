use std::fmt::{Display, Formatter};
use std::io;

use thiserror::Error;

/// Protocol layer a decode failure originated from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Layer {
    Ethernet,
    Ipv4,
    Tcp,
    Udp,
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Layer::Ethernet => "Ethernet",
            Layer::Ipv4 => "IPv4",
            Layer::Tcp => "TCP",
            Layer::Udp => "UDP",
        };
        write!(f, "{name}")
    }
}

/// Frame-scoped reason why header interpretation could not proceed.
///
/// A decode failure never affects the decoding of other frames.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes are available than the header being decoded requires.
    #[error("{layer}: truncated frame (need {needed} bytes, have {available})")]
    TruncatedFrame {
        layer: Layer,
        needed: usize,
        available: usize,
    },

    /// A length field implies a header longer than the remaining buffer,
    /// or shorter than the protocol minimum.
    #[error("{layer}: invalid header length {declared} ({available} bytes available)")]
    InvalidHeaderLength {
        layer: Layer,
        declared: usize,
        available: usize,
    },
}

/// Errors loading the sniffer configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("invalid configuration file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid configuration file {path}: {field} {reason}")]
    Invalid {
        path: String,
        field: &'static str,
        reason: String,
    },
}

/// Errors validating a datagram target.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TargetError {
    #[error("target must be a host ip/port pair, got '{0}'")]
    Malformed(String),

    #[error("invalid ip address provided for target: '{0}'")]
    InvalidHost(String),

    #[error("target port must be an integer, got '{0}'")]
    InvalidPort(String),

    #[error("target port must be between 0-65535, got {0}")]
    PortOutOfRange(i64),
}

/// Errors sending datagrams.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("cannot call send without connecting the socket at creation")]
    NotConnected,

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// Errors setting up or running a capture.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("listener must be run as root")]
    NotRoot,

    #[error("no suitable interface found for capturing")]
    NoInterface,

    #[error("interface {0} does not exist")]
    UnknownInterface(String),

    #[error("cannot open capture on {interface}: {source}")]
    Open {
        interface: String,
        source: pcap::Error,
    },

    #[error("raw capture is not supported on this platform")]
    Unsupported,

    #[error("capture I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Top level error returned by the binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error(transparent)]
    Target(#[from] TargetError),
}
