//! Decoding of raw Ethernet frames into their IPv4, TCP and UDP headers.
//!
//! [`decode`] is the entry point: it borrows a captured frame and returns a
//! [`DecodedPacket`] whose header and payload views point into that frame.
//! Capturing frames off an interface and sending datagrams live in [`capture`]
//! and [`sender`].

pub mod capture;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod frames;
pub mod headers;
pub mod printer;
pub mod sender;

pub use decoder::{decode, DecodedPacket, TransportHeader};
pub use error::{DecodeError, Layer};
pub use frames::raw_frame::RawFrame;
