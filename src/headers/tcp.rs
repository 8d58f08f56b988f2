use etherparse::err::tcp::HeaderSliceError;
use etherparse::TcpHeaderSlice;

use crate::error::{DecodeError, Layer};

/// Length of a TCP header without options.
pub const TCP_MIN_HDR_LEN: usize = 20;

/// TCP header, which is present after the IP header.
///
/// Options are skipped: they are part of [`TcpHeader::as_bytes`] but not interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TcpHeader<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    pub seq_number: u32,
    pub ack_number: u32,
    /// Header length in 32-bit words.
    pub data_offset_words: u8,
    /// Control bits (CWR, ECE, URG, ACK, PSH, RST, SYN, FIN).
    pub flags: u8,
    pub window: u16,
    bytes: &'a [u8],
}

impl<'a> TcpHeader<'a> {
    pub const FIN: u8 = 0b_0000_0001;
    pub const SYN: u8 = 0b_0000_0010;
    pub const RST: u8 = 0b_0000_0100;
    pub const PSH: u8 = 0b_0000_1000;
    pub const ACK: u8 = 0b_0001_0000;

    /// Header length in bytes, options included.
    #[inline]
    pub fn header_len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn has_flags(&self, mask: u8) -> bool {
        self.flags & mask == mask
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Decodes the TCP header at the start of `bytes`.
pub fn decode_tcp(bytes: &[u8]) -> Result<TcpHeader<'_>, DecodeError> {
    let tcp = TcpHeaderSlice::from_slice(bytes).map_err(|e| tcp_error(&e, bytes))?;
    let hdr = tcp.slice();

    Ok(TcpHeader {
        src_port: tcp.source_port(),
        dst_port: tcp.destination_port(),
        seq_number: tcp.sequence_number(),
        ack_number: tcp.acknowledgment_number(),
        data_offset_words: tcp.data_offset(),
        flags: hdr[13],
        window: tcp.window_size(),
        bytes: hdr,
    })
}

fn tcp_error(err: &HeaderSliceError, bytes: &[u8]) -> DecodeError {
    let available = bytes.len();
    if available < TCP_MIN_HDR_LEN {
        return DecodeError::TruncatedFrame {
            layer: Layer::Tcp,
            needed: TCP_MIN_HDR_LEN,
            available,
        };
    }
    // 20 bytes are there, so the data offset is either below 5 words or past the end
    let declared = match err {
        HeaderSliceError::Len(len_err) => len_err.required_len,
        HeaderSliceError::Content(_) => usize::from(bytes[12] >> 4) * 4,
    };
    DecodeError::InvalidHeaderLength {
        layer: Layer::Tcp,
        declared,
        available,
    }
}
