use std::net::Ipv4Addr;

use crate::error::{DecodeError, Layer};
use crate::headers::{be_u16, checked_header_len, fixed_prefix};

/// Length of an IPv4 header without options.
pub const IPV4_MIN_HDR_LEN: usize = 20;

/// IP protocol number for TCP.
pub const IP_PROTO_TCP: u8 = 6;
/// IP protocol number for UDP.
pub const IP_PROTO_UDP: u8 = 17;

/// IPv4 header, which is present after the Ethernet header.
///
/// Options are not interpreted, but they are accounted for in [`Ipv4Header::header_len`]
/// and included in [`Ipv4Header::as_bytes`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ipv4Header<'a> {
    /// Version (high nibble) and header length in 32-bit words (low nibble).
    pub version_and_ihl: u8,
    pub total_length: u16,
    pub ttl: u8,
    /// Protocol of the encapsulated transport header.
    pub protocol: u8,
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    bytes: &'a [u8],
}

impl<'a> Ipv4Header<'a> {
    #[inline]
    pub fn version(&self) -> u8 {
        self.version_and_ihl >> 4
    }

    #[inline]
    pub fn ihl(&self) -> u8 {
        self.version_and_ihl & 0x0f
    }

    /// Header length in bytes, options included.
    #[inline]
    pub fn header_len(&self) -> usize {
        self.bytes.len()
    }

    /// Raw header bytes (options included), borrowed from the frame.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Decodes the IPv4 header at the start of `bytes`.
pub fn decode_ipv4(bytes: &[u8]) -> Result<Ipv4Header<'_>, DecodeError> {
    let hdr = fixed_prefix::<IPV4_MIN_HDR_LEN>(bytes, Layer::Ipv4)?;

    // version is not checked: a non-4 nibble still decodes
    let version_and_ihl = hdr[0];
    let header_len = checked_header_len(version_and_ihl & 0x0f, bytes.len(), Layer::Ipv4)?;

    Ok(Ipv4Header {
        version_and_ihl,
        total_length: be_u16(hdr[2], hdr[3]),
        ttl: hdr[8],
        protocol: hdr[9],
        src_ip: Ipv4Addr::new(hdr[12], hdr[13], hdr[14], hdr[15]),
        dst_ip: Ipv4Addr::new(hdr[16], hdr[17], hdr[18], hdr[19]),
        bytes: &bytes[..header_len],
    })
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use crate::error::{DecodeError, Layer};
    use crate::headers::ipv4::{decode_ipv4, IP_PROTO_UDP};

    #[rustfmt::skip]
    const HEADER: [u8; 20] = [
        0x45, 0x00,             // version, header length, tos
        0x00, 0x24,             // total length: 36
        0x1c, 0x46, 0x40, 0x00, // identification, fragmentation
        0x40, 0x11,             // ttl: 64, protocol: UDP
        0x00, 0x00,             // header checksum
        0xc0, 0xa8, 0x01, 0x0a, // source: 192.168.1.10
        0x08, 0x08, 0x08, 0x08, // dest: 8.8.8.8
    ];

    #[test]
    fn test_decode_ipv4() {
        let mut packet = HEADER.to_vec();
        packet.extend_from_slice(&[0xde, 0xad]);

        let ip = decode_ipv4(&packet).unwrap();
        assert_eq!(ip.version(), 4);
        assert_eq!(ip.ihl(), 5);
        assert_eq!(ip.header_len(), 20);
        assert_eq!(ip.total_length, 36);
        assert_eq!(ip.ttl, 64);
        assert_eq!(ip.protocol, IP_PROTO_UDP);
        assert_eq!(ip.src_ip, Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(ip.dst_ip.to_string(), "8.8.8.8");
        assert_eq!(ip.as_bytes(), &HEADER[..]);
    }

    #[test]
    fn test_decode_ipv4_with_options() {
        let mut packet = HEADER.to_vec();
        packet[0] = 0x46;
        packet.extend_from_slice(&[0x01, 0x01, 0x01, 0x00, 0xff]);

        let ip = decode_ipv4(&packet).unwrap();
        assert_eq!(ip.header_len(), 24);
        assert_eq!(ip.as_bytes(), &packet[..24]);
    }

    #[test]
    fn test_decode_ipv4_truncated() {
        assert_eq!(
            decode_ipv4(&HEADER[..19]),
            Err(DecodeError::TruncatedFrame {
                layer: Layer::Ipv4,
                needed: 20,
                available: 19
            })
        );
        assert!(matches!(
            decode_ipv4(&[]),
            Err(DecodeError::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_decode_ipv4_header_longer_than_buffer() {
        let mut packet = HEADER.to_vec();
        packet[0] = 0x4f;
        packet.extend_from_slice(&[0; 10]);

        assert_eq!(
            decode_ipv4(&packet),
            Err(DecodeError::InvalidHeaderLength {
                layer: Layer::Ipv4,
                declared: 60,
                available: 30
            })
        );
    }

    #[test]
    fn test_decode_ipv4_keeps_version_and_total_length_as_found() {
        let mut packet = HEADER;
        packet[0] = 0x65;
        packet[2] = 0x00;
        packet[3] = 0x00;

        let ip = decode_ipv4(&packet).unwrap();
        assert_eq!(ip.version(), 6);
        assert_eq!(ip.total_length, 0);
        assert_eq!(ip.header_len(), 20);
    }

    #[test]
    fn test_decode_ipv4_header_shorter_than_minimum() {
        let mut packet = HEADER;
        packet[0] = 0x44;

        assert_eq!(
            decode_ipv4(&packet),
            Err(DecodeError::InvalidHeaderLength {
                layer: Layer::Ipv4,
                declared: 16,
                available: 20
            })
        );
    }
}
