use chrono::{DateTime, Utc};

use crate::decoder::{decode, DecodedPacket};
use crate::error::DecodeError;

/// Representation of a link-layer frame as received from a capture source.
/// Frames of this kind always start with an Ethernet header and are never modified after capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Box<[u8]>,
    captured_at: DateTime<Utc>,
}

impl RawFrame {
    pub fn new(bytes: impl Into<Box<[u8]>>, captured_at: DateTime<Utc>) -> Self {
        Self {
            bytes: bytes.into(),
            captured_at,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Decodes this frame; the result borrows from it.
    pub fn decode(&self) -> Result<DecodedPacket<'_>, DecodeError> {
        decode(&self.bytes, self.captured_at)
    }
}
