use std::io;

use crate::frames::raw_frame::RawFrame;

pub mod interface;
pub mod listen;
pub mod pcap_source;
pub mod stats;

/// Source of raw link-layer frames, each one starting with its Ethernet header.
pub trait CaptureSource {
    /// Blocks until the next frame is available.
    ///
    /// An error of kind [`io::ErrorKind::UnexpectedEof`] means the source is exhausted,
    /// [`io::ErrorKind::TimedOut`] that no frame arrived in time.
    /// Any other error is transient.
    fn next_frame(&mut self) -> io::Result<RawFrame>;
}

/// Fails unless the process has the privileges needed to capture on an interface.
#[cfg(unix)]
pub fn ensure_root() -> Result<(), crate::error::CaptureError> {
    if nix::unistd::geteuid().is_root() {
        Ok(())
    } else {
        Err(crate::error::CaptureError::NotRoot)
    }
}

#[cfg(not(unix))]
pub fn ensure_root() -> Result<(), crate::error::CaptureError> {
    Err(crate::error::CaptureError::Unsupported)
}
