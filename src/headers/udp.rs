use etherparse::UdpHeaderSlice;

use crate::error::{DecodeError, Layer};

pub const UDP_HDR_LEN: usize = 8;

/// UDP header, which is present after the IP header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UdpHeader<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
    pub checksum: u16,
    bytes: &'a [u8],
}

impl<'a> UdpHeader<'a> {
    pub const LEN: usize = UDP_HDR_LEN;

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Decodes the UDP header at the start of `bytes`.
pub fn decode_udp(bytes: &[u8]) -> Result<UdpHeader<'_>, DecodeError> {
    // the length field is reported as is, never checked against the buffer
    let udp = UdpHeaderSlice::from_slice(bytes).map_err(|e| DecodeError::TruncatedFrame {
        layer: Layer::Udp,
        needed: e.required_len,
        available: bytes.len(),
    })?;

    Ok(UdpHeader {
        src_port: udp.source_port(),
        dst_port: udp.destination_port(),
        length: udp.length(),
        checksum: udp.checksum(),
        bytes: udp.slice(),
    })
}
