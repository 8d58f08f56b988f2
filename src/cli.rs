use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{SnifferConfig, MIN_RECV_BUFFER_LEN};

/// Raw Ethernet/IPv4/TCP/UDP frame decoder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value_t = String::from("info"))]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture frames on an interface and print the decoded headers (requires root)
    Listen(ListenArgs),
    /// Send a single UDP datagram
    Send(SendArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct ListenArgs {
    /// Interface to capture on (defaults to the first non-loopback IPv4 interface)
    #[arg(long, short)]
    pub interface: Option<String>,
    /// Path of a TOML file with the listener configuration
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// Stop after this many frames
    #[arg(long)]
    pub count: Option<u64>,
    /// Maximum bytes read for each frame
    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_RECV_BUFFER_LEN as i64..))]
    pub buffer_len: Option<u32>,
    /// Frames that can be queued between capture and decoding
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub channel_capacity: Option<u32>,
    /// Print payload sizes instead of payload bytes
    #[arg(long)]
    pub no_payload: bool,
}

impl ListenArgs {
    /// Applies the command line flags on top of `config`.
    pub fn apply_to(&self, mut config: SnifferConfig) -> SnifferConfig {
        if let Some(interface) = &self.interface {
            config.interface = Some(interface.clone());
        }
        if let Some(count) = self.count {
            config.max_frames = Some(count);
        }
        if let Some(buffer_len) = self.buffer_len {
            config.recv_buffer_len = buffer_len as usize;
        }
        if let Some(channel_capacity) = self.channel_capacity {
            config.channel_capacity = channel_capacity as usize;
        }
        if self.no_payload {
            config.show_payload = false;
        }
        config
    }
}

#[derive(clap::Args, Debug)]
pub struct SendArgs {
    /// Destination IPv4 address
    pub host: String,
    /// Destination port
    #[arg(allow_negative_numbers = true)]
    pub port: i64,
    /// Datagram content
    pub payload: String,
    /// Connect the socket to the target before sending
    #[arg(long)]
    pub connect: bool,
}
