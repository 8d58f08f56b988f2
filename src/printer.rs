use std::fmt::{Display, Formatter, Write};

use crate::decoder::{DecodedPacket, TransportHeader};
use crate::headers::ethernet::mac_to_hex;
use crate::headers::TcpHeader;

const WIDTH: usize = 32;

/// Human-readable, multi-line report of a decoded packet.
pub struct PacketReport<'p, 'a> {
    packet: &'p DecodedPacket<'a>,
    show_payload: bool,
}

impl<'p, 'a> PacketReport<'p, 'a> {
    pub fn new(packet: &'p DecodedPacket<'a>, show_payload: bool) -> Self {
        Self {
            packet,
            show_payload,
        }
    }
}

fn section(f: &mut Formatter<'_>, title: &str) -> std::fmt::Result {
    writeln!(f, "{}", "-".repeat(WIDTH))?;
    writeln!(f, "{}{title}", " ".repeat(8))?;
    writeln!(f, "{}", "-".repeat(WIDTH))
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

fn tcp_flags(tcp: &TcpHeader<'_>) -> String {
    [
        (TcpHeader::FIN, "FIN"),
        (TcpHeader::SYN, "SYN"),
        (TcpHeader::RST, "RST"),
        (TcpHeader::PSH, "PSH"),
        (TcpHeader::ACK, "ACK"),
    ]
    .into_iter()
    .filter(|(mask, _)| tcp.has_flags(*mask))
    .map(|(_, name)| name)
    .collect::<Vec<_>>()
    .join(" ")
}

impl Display for PacketReport<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let packet = self.packet;

        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "{}PACKET", " ".repeat(8))?;
        writeln!(f, "{}", "=".repeat(WIDTH))?;
        writeln!(f, "captured at: {}", packet.captured_at)?;

        section(f, "ETHERNET")?;
        writeln!(f, "src mac: {}", mac_to_hex(packet.ethernet.src_mac))?;
        writeln!(f, "dst mac: {}", mac_to_hex(packet.ethernet.dst_mac))?;

        section(f, "IP")?;
        writeln!(f, "header length: {}", packet.ipv4.header_len())?;
        writeln!(f, "protocol: {}", packet.ipv4.protocol)?;
        writeln!(f, "src ip: {}", packet.ipv4.src_ip)?;
        writeln!(f, "dst ip: {}", packet.ipv4.dst_ip)?;

        section(f, "PROTOCOL")?;
        match packet.transport {
            TransportHeader::Tcp(tcp) => {
                writeln!(f, "src port: {}", tcp.src_port)?;
                writeln!(f, "dst port: {}", tcp.dst_port)?;
                writeln!(f, "seq number: {}", tcp.seq_number)?;
                writeln!(f, "ack number: {}", tcp.ack_number)?;
                writeln!(f, "flags: {}", tcp_flags(&tcp))?;
                writeln!(f, "header length: {}", tcp.header_len())?;
            }
            TransportHeader::Udp(udp) => {
                writeln!(f, "src port: {}", udp.src_port)?;
                writeln!(f, "dst port: {}", udp.dst_port)?;
                writeln!(f, "length: {}", udp.length)?;
                writeln!(f, "checksum: {:#06x}", udp.checksum)?;
            }
            TransportHeader::Unknown(protocol) => {
                writeln!(f, "non tcp/udp packet (protocol {protocol})")?;
            }
        }

        section(f, "PAYLOAD")?;
        if self.show_payload {
            write!(f, "{}", hex(packet.payload))
        } else {
            write!(f, "{} bytes", packet.payload.len())
        }
    }
}
