//! Layer-by-layer decoding of a captured frame: Ethernet, then IPv4, then TCP or UDP.

use chrono::{DateTime, Utc};

use crate::error::DecodeError;
use crate::headers::ethernet::ETH_HDR_LEN;
use crate::headers::ipv4::{IP_PROTO_TCP, IP_PROTO_UDP};
use crate::headers::{
    decode_ethernet, decode_ipv4, decode_tcp, decode_udp, EthernetHeader, Ipv4Header, TcpHeader,
    UdpHeader,
};

/// Transport layer header found after the IPv4 header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportHeader<'a> {
    Tcp(TcpHeader<'a>),
    Udp(UdpHeader<'a>),
    /// Protocol that is not decoded; carries the IP protocol number.
    Unknown(u8),
}

impl<'a> TransportHeader<'a> {
    /// Raw transport header bytes; empty for unknown protocols.
    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            TransportHeader::Tcp(tcp) => tcp.as_bytes(),
            TransportHeader::Udp(udp) => udp.as_bytes(),
            TransportHeader::Unknown(_) => &[],
        }
    }

    /// Source and destination ports, if the protocol has any.
    pub fn ports(&self) -> Option<(u16, u16)> {
        match self {
            TransportHeader::Tcp(tcp) => Some((tcp.src_port, tcp.dst_port)),
            TransportHeader::Udp(udp) => Some((udp.src_port, udp.dst_port)),
            TransportHeader::Unknown(_) => None,
        }
    }
}

/// Structured view of one captured frame.
///
/// All byte regions borrow from the frame that was decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPacket<'a> {
    pub captured_at: DateTime<Utc>,
    pub ethernet: EthernetHeader<'a>,
    pub ipv4: Ipv4Header<'a>,
    pub transport: TransportHeader<'a>,
    /// Bytes following every decoded header.
    pub payload: &'a [u8],
}

/// Decodes a raw link-layer frame.
///
/// A truncated or inconsistent header aborts decoding of this frame only.
/// Transport protocols other than TCP and UDP are decoded successfully
/// as [`TransportHeader::Unknown`], with the whole transport region as payload.
pub fn decode(frame: &[u8], captured_at: DateTime<Utc>) -> Result<DecodedPacket<'_>, DecodeError> {
    let ethernet = decode_ethernet(frame)?;
    let ip_region = &frame[ETH_HDR_LEN..];

    let ipv4 = decode_ipv4(ip_region)?;
    let transport_region = &ip_region[ipv4.header_len()..];

    let (transport, payload) = match ipv4.protocol {
        IP_PROTO_TCP => {
            let tcp = decode_tcp(transport_region)?;
            (
                TransportHeader::Tcp(tcp),
                &transport_region[tcp.header_len()..],
            )
        }
        IP_PROTO_UDP => {
            let udp = decode_udp(transport_region)?;
            (
                TransportHeader::Udp(udp),
                &transport_region[UdpHeader::LEN..],
            )
        }
        other => (TransportHeader::Unknown(other), transport_region),
    };

    Ok(DecodedPacket {
        captured_at,
        ethernet,
        ipv4,
        transport,
        payload,
    })
}
