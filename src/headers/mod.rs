//! Readers interpreting a fixed byte region as a single protocol header.
//!
//! Ethernet, TCP and UDP are read through `etherparse` header slices. IPv4 is read by hand
//! because only its header length may be checked: the version nibble and the total length
//! are reported as found.
//!
//! Every reader is pure: it borrows the input, never panics on short or
//! malformed data and reports violations as a [`DecodeError`].

use crate::error::{DecodeError, Layer};

pub mod ethernet;
pub mod ipv4;
pub mod tcp;
pub mod udp;

pub use ethernet::{decode_ethernet, EthernetHeader};
pub use ipv4::{decode_ipv4, Ipv4Header};
pub use tcp::{decode_tcp, TcpHeader};
pub use udp::{decode_udp, UdpHeader};

/// Returns the fixed-size leading part of `bytes`, or `TruncatedFrame` if it is shorter than `N`.
fn fixed_prefix<const N: usize>(bytes: &[u8], layer: Layer) -> Result<&[u8; N], DecodeError> {
    bytes.first_chunk::<N>().ok_or(DecodeError::TruncatedFrame {
        layer,
        needed: N,
        available: bytes.len(),
    })
}

/// Validates a header length derived from a 4-bit words counter.
fn checked_header_len(
    words: u8,
    available: usize,
    layer: Layer,
) -> Result<usize, DecodeError> {
    let declared = usize::from(words) * 4;
    if declared < MIN_WORDS_HEADER_LEN || declared > available {
        return Err(DecodeError::InvalidHeaderLength {
            layer,
            declared,
            available,
        });
    }
    Ok(declared)
}

/// Minimum length of an IPv4 header.
const MIN_WORDS_HEADER_LEN: usize = 20;

#[inline]
fn be_u16(hi: u8, lo: u8) -> u16 {
    u16::from_be_bytes([hi, lo])
}

#[cfg(test)]
mod tests {
    use crate::error::{DecodeError, Layer};
    use crate::headers::{checked_header_len, fixed_prefix};

    #[test]
    fn test_fixed_prefix_short_input() {
        assert_eq!(
            fixed_prefix::<8>(&[1, 2, 3], Layer::Ipv4),
            Err(DecodeError::TruncatedFrame {
                layer: Layer::Ipv4,
                needed: 8,
                available: 3
            })
        );
        assert_eq!(fixed_prefix::<2>(&[1, 2, 3], Layer::Ipv4), Ok(&[1, 2]));
    }

    #[test]
    fn test_checked_header_len_bounds() {
        assert_eq!(checked_header_len(5, 20, Layer::Ipv4), Ok(20));
        assert_eq!(checked_header_len(15, 60, Layer::Ipv4), Ok(60));
        assert_eq!(
            checked_header_len(4, 40, Layer::Ipv4),
            Err(DecodeError::InvalidHeaderLength {
                layer: Layer::Ipv4,
                declared: 16,
                available: 40
            })
        );
        assert_eq!(
            checked_header_len(6, 20, Layer::Ipv4),
            Err(DecodeError::InvalidHeaderLength {
                layer: Layer::Ipv4,
                declared: 24,
                available: 20
            })
        );
    }
}
