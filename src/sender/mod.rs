pub mod packet_sender;
pub mod target;

pub use packet_sender::PacketSender;
pub use target::SendTarget;
