use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::UdpSocket;
use tracing::info;

use crate::error::SendError;
use crate::sender::target::SendTarget;

/// Sends datagrams to a validated target over UDP.
pub struct PacketSender {
    target: SendTarget,
    socket: UdpSocket,
    connected: bool,
}

impl PacketSender {
    /// Binds a local UDP socket; when `connect` is set the socket is also connected to `target`,
    /// which is required by [`PacketSender::send`].
    pub async fn create(target: SendTarget, connect: bool) -> Result<Self, SendError> {
        let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).await?;
        if connect {
            socket.connect(target.socket_addr()).await?;
        }
        Ok(Self {
            target,
            socket,
            connected: connect,
        })
    }

    pub fn target(&self) -> SendTarget {
        self.target
    }

    /// Sends `data` on the connected socket, returning the number of bytes sent.
    pub async fn send(&self, data: &[u8]) -> Result<usize, SendError> {
        if !self.connected {
            return Err(SendError::NotConnected);
        }
        let sent_count = self.socket.send(data).await?;
        info!("sent {sent_count} bytes!");
        Ok(sent_count)
    }

    /// Sends `data` to `target`, or to the sender's own target if `None`.
    pub async fn send_to(
        &self,
        data: &[u8],
        target: Option<SendTarget>,
    ) -> Result<usize, SendError> {
        let target = target.unwrap_or(self.target);
        let sent_count = self.socket.send_to(data, target.socket_addr()).await?;
        info!("sent {sent_count} bytes to {target}!");
        Ok(sent_count)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use tokio::net::UdpSocket;

    use crate::error::SendError;
    use crate::sender::packet_sender::PacketSender;
    use crate::sender::target::SendTarget;

    async fn receiver() -> (UdpSocket, SendTarget) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let SocketAddr::V4(addr) = socket.local_addr().unwrap() else {
            panic!("expected an IPv4 address");
        };
        let target = SendTarget::new(&addr.ip().to_string(), i64::from(addr.port())).unwrap();
        (socket, target)
    }

    #[tokio::test]
    async fn test_send_to_default_target() {
        let (socket, target) = receiver().await;
        let sender = PacketSender::create(target, false).await.unwrap();

        assert_eq!(sender.send_to(b"why me", None).await.unwrap(), 6);

        let mut buf = [0; 64];
        let (len, _) = socket.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"why me");
    }

    #[tokio::test]
    async fn test_send_to_overridden_target() {
        let (_unused, default_target) = receiver().await;
        let (socket, other_target) = receiver().await;
        let sender = PacketSender::create(default_target, false).await.unwrap();

        sender.send_to(b"LOL", Some(other_target)).await.unwrap();

        let mut buf = [0; 64];
        let (len, _) = socket.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"LOL");
    }

    #[tokio::test]
    async fn test_send_requires_connect() {
        let (_socket, target) = receiver().await;
        let sender = PacketSender::create(target, false).await.unwrap();

        assert!(matches!(
            sender.send(b"receive me").await,
            Err(SendError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_send_connected() {
        let (socket, target) = receiver().await;
        let sender = PacketSender::create(target, true).await.unwrap();
        assert_eq!(sender.target(), target);

        assert_eq!(sender.send(b"receive me").await.unwrap(), 10);

        let mut buf = [0; 64];
        let (len, _) = socket.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"receive me");
    }
}
