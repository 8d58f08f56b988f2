use std::io;

use chrono::{DateTime, Utc};
use pcap::{Activated, Active, Capture, Linktype, PacketHeader};
use tracing::{debug, info, warn};

use crate::capture::CaptureSource;
use crate::error::CaptureError;
use crate::frames::raw_frame::RawFrame;

/// How long a read waits for a frame before handing control back to the capture loop.
const READ_TIMEOUT_MS: i32 = 500;

/// Frames read through libpcap, live from an interface or from a savefile.
pub struct PcapCapture<T: Activated + ?Sized> {
    capture: Capture<T>,
}

impl PcapCapture<Active> {
    /// Opens `interface` in promiscuous mode, keeping at most `snaplen` bytes of each frame.
    pub fn open(interface: &str, snaplen: usize) -> Result<Self, CaptureError> {
        let open_err = |source: pcap::Error| CaptureError::Open {
            interface: interface.to_string(),
            source,
        };

        let capture = Capture::from_device(interface)
            .map_err(open_err)?
            .promisc(true)
            .snaplen(i32::try_from(snaplen).unwrap_or(i32::MAX))
            .timeout(READ_TIMEOUT_MS)
            .immediate_mode(true)
            .open()
            .map_err(open_err)?;

        info!("now listening on {interface}!");
        Ok(Self::new(capture))
    }
}

impl<T: Activated + ?Sized> PcapCapture<T> {
    pub fn new(capture: Capture<T>) -> Self {
        let linktype = capture.get_datalink();
        if linktype != Linktype::ETHERNET {
            warn!("link type {linktype:?} is not Ethernet, frames will not decode");
        }
        Self { capture }
    }
}

impl<T: Activated + ?Sized> CaptureSource for PcapCapture<T> {
    fn next_frame(&mut self) -> io::Result<RawFrame> {
        match self.capture.next_packet() {
            Ok(packet) => Ok(to_raw_frame(packet.header, packet.data)),
            Err(pcap::Error::TimeoutExpired) => Err(io::ErrorKind::TimedOut.into()),
            Err(pcap::Error::NoMorePackets) => Err(io::ErrorKind::UnexpectedEof.into()),
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

fn to_raw_frame(header: &PacketHeader, data: &[u8]) -> RawFrame {
    if usize::try_from(header.len).map_or(false, |wire_len| wire_len > data.len()) {
        debug!(
            "frame of {} bytes cut to {} bytes, raise the buffer length to see all of it",
            header.len,
            data.len()
        );
    }
    RawFrame::new(data, captured_at(header))
}

/// Capture time recorded by libpcap, or now if it is out of range.
fn captured_at(header: &PacketHeader) -> DateTime<Utc> {
    let secs = i64::from(header.ts.tv_sec);
    let nanos = i64::from(header.ts.tv_usec)
        .checked_mul(1_000)
        .and_then(|n| u32::try_from(n).ok());
    nanos
        .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
        .unwrap_or_else(Utc::now)
}
