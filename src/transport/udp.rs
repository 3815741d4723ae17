use std::net::SocketAddr;
use std::time::Duration;

use bytes::BytesMut;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio_util::codec::Encoder;
use tracing::{debug, instrument, trace};

use crate::core::codec::PacketCodec;
use crate::core::packet::{Packet, PACKET_SIZE};
use crate::error::{ProtocolError, Result};
use crate::utils::timeout::Deadline;

/// Receive buffer size. Larger datagrams are truncated by the kernel, which
/// is harmless because decoding only looks at the first [`PACKET_SIZE`] bytes.
pub const RECV_BUFFER_SIZE: usize = 64;

/// UDP socket plus the deadline that bounds its receives
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    deadline: Deadline,
    codec: PacketCodec,
    send_buf: BytesMut,
}

impl UdpTransport {
    /// Create a UDP socket and bind it to `addr`.
    ///
    /// Socket creation and binding are separate steps so their failures map to
    /// [`ProtocolError::Socket`] and [`ProtocolError::Bind`] respectively.
    #[instrument(level = "debug")]
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))
            .map_err(ProtocolError::Socket)?;
        socket.set_nonblocking(true).map_err(ProtocolError::Socket)?;
        socket.bind(&addr.into()).map_err(ProtocolError::Bind)?;

        let socket = UdpSocket::from_std(socket.into()).map_err(ProtocolError::Socket)?;
        debug!(local = ?socket.local_addr().ok(), "UDP socket bound");

        Ok(Self {
            socket,
            deadline: Deadline::new(),
            codec: PacketCodec,
            send_buf: BytesMut::with_capacity(PACKET_SIZE),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Encode `packet` and send it to `dest`. Best effort, no confirmation.
    pub async fn send_packet(&mut self, packet: Packet, dest: SocketAddr) -> Result<usize> {
        self.send_buf.clear();
        self.codec.encode(packet, &mut self.send_buf)?;
        let sent = self.socket.send_to(&self.send_buf, dest).await?;
        trace!(bytes = sent, %dest, "Datagram sent");
        Ok(sent)
    }

    /// Send raw bytes to `dest`
    pub async fn send_to(&self, bytes: &[u8], dest: SocketAddr) -> Result<usize> {
        Ok(self.socket.send_to(bytes, dest).await?)
    }

    /// Wait up to `timeout` for one datagram.
    ///
    /// The deadline is armed right before blocking and stopped when the
    /// receive returns. On expiry the pending receive is dropped and
    /// [`ProtocolError::Timeout`] is returned.
    pub async fn receive(&mut self, timeout: Duration) -> Result<(BytesMut, SocketAddr)> {
        let mut buf = BytesMut::zeroed(RECV_BUFFER_SIZE);
        let socket = &self.socket;
        let (len, source) = self
            .deadline
            .run(timeout, socket.recv_from(&mut buf))
            .await??;
        buf.truncate(len);
        trace!(bytes = len, %source, "Datagram received");
        Ok((buf, source))
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Clear an expired deadline before the next receive
    pub fn reset_deadline(&mut self) {
        self.deadline.reset();
    }
}
