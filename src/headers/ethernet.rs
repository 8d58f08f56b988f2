use std::fmt::Write;

use etherparse::Ethernet2HeaderSlice;

use crate::error::{DecodeError, Layer};

pub const ETH_HDR_LEN: usize = 14;

/// EtherType of an IPv4 payload.
pub const ETHERTYPE_IPV4: u16 = 0x0800;
/// EtherType announcing an IEEE 802.1Q tag (not decoded).
pub const ETHERTYPE_VLAN: u16 = 0x8100;

/// Ethernet II header, which is present at the beginning of every captured frame.
///
/// The header is always assumed to be 14 bytes long: VLAN tags are not detected,
/// so a tagged frame reports [`ETHERTYPE_VLAN`] and must not be decoded further as IPv4.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EthernetHeader<'a> {
    /// Destination MAC address (first on the wire).
    pub dst_mac: [u8; 6],
    /// Source MAC address.
    pub src_mac: [u8; 6],
    /// Protocol which is encapsulated in the payload of the frame.
    pub ether_type: u16,
    bytes: &'a [u8],
}

impl<'a> EthernetHeader<'a> {
    pub const LEN: usize = ETH_HDR_LEN;

    /// Raw header bytes, borrowed from the frame.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn carries_ipv4(&self) -> bool {
        self.ether_type == ETHERTYPE_IPV4
    }

    pub fn is_vlan_tagged(&self) -> bool {
        self.ether_type == ETHERTYPE_VLAN
    }
}

/// Decodes the Ethernet header at the start of `frame`.
pub fn decode_ethernet(frame: &[u8]) -> Result<EthernetHeader<'_>, DecodeError> {
    let eth = Ethernet2HeaderSlice::from_slice(frame).map_err(|e| DecodeError::TruncatedFrame {
        layer: Layer::Ethernet,
        needed: e.required_len,
        available: frame.len(),
    })?;

    Ok(EthernetHeader {
        dst_mac: eth.destination(),
        src_mac: eth.source(),
        ether_type: eth.ether_type().0,
        bytes: eth.slice(),
    })
}

/// Converts a MAC address in its hexadecimal form
pub fn mac_to_hex(mac: [u8; 6]) -> String {
    let mut mac_hex = String::new();
    for n in &mac {
        let _ = write!(mac_hex, "{n:02x}:");
    }
    mac_hex.pop();
    mac_hex
}
