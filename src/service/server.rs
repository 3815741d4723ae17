use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ServerConfig, VERSION};
use crate::core::packet::{ErrorCode, PacketKind};
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::{process_datagram, OperationTable};
use crate::protocol::status::{NoopIndicator, Status, StatusIndicator};
use crate::transport::UdpTransport;
use crate::utils::metrics::Metrics;

/// Single-threaded arithmetic server.
///
/// Handles one datagram at a time: receive, validate, dispatch, notify the
/// status indicator, reply to the datagram's source address. Malformed input
/// is answered with an Error packet and never stops the loop.
pub struct Server {
    transport: UdpTransport,
    table: OperationTable,
    indicator: Box<dyn StatusIndicator + Send>,
    receive_timeout: Duration,
    metrics: Arc<Metrics>,
}

impl Server {
    /// Bind the configured address. Failure here is the only fatal error.
    #[instrument(skip(config), fields(address = %config.address))]
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let addr: SocketAddr = config.address.parse().map_err(|e| {
            ProtocolError::ConfigError(format!("Invalid server address '{}': {e}", config.address))
        })?;

        let transport = UdpTransport::bind(addr).await?;
        info!(
            version = VERSION,
            local = ?transport.local_addr().ok(),
            "Arithmetic server bound"
        );

        Ok(Self {
            transport,
            table: OperationTable::default(),
            indicator: Box::new(NoopIndicator),
            receive_timeout: config.receive_timeout,
            metrics: Arc::new(Metrics::new()),
        })
    }

    pub fn with_indicator<I>(mut self, indicator: I) -> Self
    where
        I: StatusIndicator + Send + 'static,
    {
        self.indicator = Box::new(indicator);
        self
    }

    pub fn with_operations(mut self, table: OperationTable) -> Self {
        self.table = table;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received CTRL+C signal, shutting down");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!(error = %e, "Failed to listen for CTRL+C, serving without it");
                    // Holding the sender keeps the loop from reading a closed channel as shutdown
                    std::future::pending::<()>().await;
                    drop(shutdown_tx);
                }
            }
        });

        self.run_with_shutdown(shutdown_rx).await
    }

    /// Serve until a message arrives on `shutdown_rx`.
    ///
    /// A dropped sender is not a shutdown request; the server keeps serving
    /// and stops watching the channel.
    #[instrument(skip_all, fields(local = ?self.transport.local_addr().ok()))]
    pub async fn run_with_shutdown(mut self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        self.notify(Status::Idle);
        let mut shutdown_open = true;

        loop {
            tokio::select! {
                message = shutdown_rx.recv(), if shutdown_open => {
                    match message {
                        Some(()) => {
                            info!("Shutting down server");
                            self.metrics.log_metrics();
                            return Ok(());
                        }
                        None => {
                            warn!("Shutdown channel closed, serving until the process exits");
                            shutdown_open = false;
                        }
                    }
                }

                received = self.transport.receive(self.receive_timeout) => {
                    match received {
                        Ok((bytes, source)) => self.handle_datagram(bytes, source).await,
                        Err(ProtocolError::Timeout) => {
                            self.metrics.idle_timeout();
                            self.transport.reset_deadline();
                            info!(
                                timeout_ms = self.receive_timeout.as_millis() as u64,
                                "No request received, still listening"
                            );
                        }
                        Err(e) => {
                            // e.g. ICMP errors surfaced on the socket; not fatal
                            warn!(error = %e, "Receive failed");
                        }
                    }
                }
            }
        }
    }

    async fn handle_datagram(&mut self, bytes: BytesMut, source: SocketAddr) {
        self.metrics.datagram_received();
        debug!(%source, len = bytes.len(), "Datagram received");

        let outcome = process_datagram(&bytes, &self.table);
        if let Some(status) = outcome.status {
            self.notify(status);
        }

        match outcome.reply.kind {
            PacketKind::Response => self.metrics.response_sent(),
            _ => {
                self.metrics.error_reply();
                if outcome.reply.error_code() == Some(ErrorCode::GeneralError.code()) {
                    self.metrics.decode_failure();
                }
            }
        }

        if let Err(e) = self.transport.send_packet(outcome.reply, source).await {
            self.metrics.send_failure();
            error!(error = %e, %source, "Failed to send reply");
        }
    }

    fn notify(&mut self, status: Status) {
        if let Err(e) = self.indicator.notify(status) {
            warn!(error = %e, status = %status.as_char(), "Status indicator write failed");
        }
    }
}
