use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use tokio_util::codec::Decoder;
use tracing::{debug, info, instrument, warn};

use crate::config::{ClientConfig, MAX_ADDRESS_LEN};
use crate::core::codec::PacketCodec;
use crate::core::packet::{FunctionId, Packet, PacketKind, OPERAND_COUNT};
use crate::error::constants::{ERR_ADDRESS_EMPTY, ERR_ADDRESS_UNPARSABLE, ERR_SHORT_DATAGRAM};
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::Operands;
use crate::transport::UdpTransport;
use crate::utils::metrics::{Metrics, Timer};

#[derive(Debug)]
enum SessionState {
    Closed,
    Open {
        transport: UdpTransport,
        remote: SocketAddr,
    },
}

/// One client session against a remote arithmetic server.
///
/// Starts Closed. [`open`](Self::open) binds an ephemeral UDP port and fixes the
/// remote address for the lifetime of the session; [`close`](Self::close)
/// releases the socket.
///
/// Replies are matched to requests purely by arrival order, so a session
/// carries at most one outstanding exchange. Every transactional method takes
/// `&mut self` to enforce that.
#[derive(Debug)]
pub struct ClientSession {
    config: ClientConfig,
    remote_address: String,
    state: SessionState,
    codec: PacketCodec,
    metrics: Metrics,
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientSession {
    /// Closed session with the built-in server address, port and deadline
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            remote_address: config.address.clone(),
            config,
            state: SessionState::Closed,
            codec: PacketCodec,
            metrics: Metrics::new(),
        }
    }

    /// Set the server address used by the next [`open`](Self::open).
    ///
    /// Does not affect a session that is already open.
    pub fn set_remote_address(&mut self, address: &str) -> Result<()> {
        if address.is_empty() {
            return Err(ProtocolError::InvalidArgument(ERR_ADDRESS_EMPTY.into()));
        }
        if address.len() > MAX_ADDRESS_LEN {
            return Err(ProtocolError::WrongAddressLength {
                len: address.len(),
                max: MAX_ADDRESS_LEN,
            });
        }

        self.remote_address = address.to_string();
        Ok(())
    }

    pub fn remote_address(&self) -> &str {
        &self.remote_address
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open { .. })
    }

    pub fn response_timeout(&self) -> Duration {
        self.config.response_timeout
    }

    /// Local address of the open session's socket
    pub fn local_addr(&self) -> Result<SocketAddr> {
        match &self.state {
            SessionState::Open { transport, .. } => transport.local_addr(),
            SessionState::Closed => Err(ProtocolError::NotOpen),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Closed → Open: bind an ephemeral local port and resolve the remote address.
    #[instrument(skip(self), fields(remote = %self.remote_address, port = self.config.port))]
    pub async fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(ProtocolError::AlreadyOpen);
        }

        let ip = self.remote_address.parse::<IpAddr>().map_err(|e| {
            ProtocolError::InvalidArgument(format!(
                "{ERR_ADDRESS_UNPARSABLE}: '{}' ({e})",
                self.remote_address
            ))
        })?;
        let remote = SocketAddr::new(ip, self.config.port);

        let local = match ip {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let transport = UdpTransport::bind(local).await?;

        info!(local = ?transport.local_addr().ok(), %remote, "Session opened");
        self.state = SessionState::Open { transport, remote };
        Ok(())
    }

    /// Open → Closed, releasing the socket
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Closed => Err(ProtocolError::NotOpen),
            SessionState::Open { remote, .. } => {
                info!(%remote, "Session closed");
                Ok(())
            }
        }
    }

    /// Perform one request/response exchange.
    ///
    /// Sends a Request for `function_id`, then waits for the next datagram up
    /// to the response deadline. No retry is attempted. A Response yields its
    /// operands (result in `operands[0]`); an Error packet yields
    /// [`ProtocolError::Remote`] with the server's code.
    pub async fn call_function(&mut self, function_id: u32, operands: Operands) -> Result<Operands> {
        let SessionState::Open { transport, remote } = &mut self.state else {
            return Err(ProtocolError::NotOpen);
        };

        self.metrics.transaction_started();
        let _timer = Timer::start("call_function");

        let request = Packet::new_request(function_id, operands);
        let result = transact(
            transport,
            &mut self.codec,
            request,
            *remote,
            self.config.response_timeout,
        )
        .await;

        if let Err(e) = &result {
            self.metrics.transaction_failed();
            if matches!(e, ProtocolError::NetworkTimeout) {
                self.metrics.transaction_timeout();
            }
            debug!(function_id, error = %e, "Transaction failed");
        }
        result
    }

    /// Remote `op1 * op2`, wrapping modulo 2^32
    pub async fn multiply(&mut self, op1: u32, op2: u32) -> Result<u32> {
        self.call_binary(FunctionId::Multiply, op1, op2).await
    }

    /// Remote `op1 / op2`. A zero divisor is rejected by the server with
    /// code 4, surfaced as `ProtocolError::Remote(4)`.
    pub async fn divide(&mut self, op1: u32, op2: u32) -> Result<u32> {
        self.call_binary(FunctionId::Divide, op1, op2).await
    }

    async fn call_binary(&mut self, function: FunctionId, op1: u32, op2: u32) -> Result<u32> {
        if !self.is_open() {
            return Err(ProtocolError::NotOpen);
        }

        let mut operands = [0u32; OPERAND_COUNT];
        operands[0] = op1;
        operands[1] = op2;

        let reply = self.call_function(function.id(), operands).await?;
        Ok(reply[0])
    }
}

async fn transact(
    transport: &mut UdpTransport,
    codec: &mut PacketCodec,
    request: Packet,
    remote: SocketAddr,
    timeout: Duration,
) -> Result<Operands> {
    transport.send_packet(request, remote).await?;

    let (mut bytes, source) = match transport.receive(timeout).await {
        Ok(received) => received,
        Err(ProtocolError::Timeout) => {
            warn!(%remote, timeout_ms = timeout.as_millis() as u64, "No reply from server");
            return Err(ProtocolError::NetworkTimeout);
        }
        Err(e) => return Err(e),
    };

    if source != remote {
        debug!(%source, %remote, "Reply arrived from a different address");
    }

    let reply = codec
        .decode(&mut bytes)?
        .ok_or_else(|| ProtocolError::Decode(format!("{ERR_SHORT_DATAGRAM} ({} bytes)", bytes.len())))?;

    match reply.kind {
        PacketKind::Error => Err(ProtocolError::Remote(reply.operands[0])),
        PacketKind::Response => Ok(reply.operands),
        other => Err(ProtocolError::UnknownServerReply(other.into())),
    }
}
