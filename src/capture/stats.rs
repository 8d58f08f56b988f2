use std::fmt::{Display, Formatter};

use crate::decoder::{DecodedPacket, TransportHeader};
use crate::error::DecodeError;

/// Counters of what happened to the frames seen by the capture loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames received from the capture source
    pub frames: u64,
    /// Frames not carrying IPv4 (VLAN-tagged frames included)
    pub skipped: u64,
    /// Frames decoded successfully
    pub decoded: u64,
    pub truncated: u64,
    pub invalid_header_length: u64,
    pub tcp: u64,
    pub udp: u64,
    /// Decoded frames with a transport protocol other than TCP or UDP
    pub other: u64,
}

impl CaptureStats {
    pub fn record_skipped(&mut self) {
        self.frames += 1;
        self.skipped += 1;
    }

    pub fn record_decoded(&mut self, packet: &DecodedPacket<'_>) {
        self.frames += 1;
        self.decoded += 1;
        match packet.transport {
            TransportHeader::Tcp(_) => self.tcp += 1,
            TransportHeader::Udp(_) => self.udp += 1,
            TransportHeader::Unknown(_) => self.other += 1,
        }
    }

    pub fn record_error(&mut self, err: &DecodeError) {
        self.frames += 1;
        match err {
            DecodeError::TruncatedFrame { .. } => self.truncated += 1,
            DecodeError::InvalidHeaderLength { .. } => self.invalid_header_length += 1,
        }
    }

    /// Frames that could not be decoded.
    pub fn failed(&self) -> u64 {
        self.truncated + self.invalid_header_length
    }
}

impl Display for CaptureStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames: {} decoded (tcp {}, udp {}, other {}), {} skipped, {} failed (truncated {}, invalid header length {})",
            self.frames,
            self.decoded,
            self.tcp,
            self.udp,
            self.other,
            self.skipped,
            self.failed(),
            self.truncated,
            self.invalid_header_length
        )
    }
}
