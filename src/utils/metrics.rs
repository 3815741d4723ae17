//! Observability and Metrics
//!
//! Counters for datagrams, replies and client transactions.
//!
//! Each server and each client session owns its own [`Metrics`]; there is no
//! process-wide instance. Atomic counters keep the recording methods `&self`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Metrics {
    /// Datagrams taken off the socket by the server
    pub datagrams_received: AtomicU64,
    /// Response packets sent by the server
    pub responses_sent: AtomicU64,
    /// Error packets sent by the server
    pub error_replies: AtomicU64,
    /// Datagrams too short to decode
    pub decode_failures: AtomicU64,
    /// Receive deadlines that expired with nothing to read
    pub idle_timeouts: AtomicU64,
    /// Replies that could not be sent
    pub send_failures: AtomicU64,
    /// Client transactions attempted on an open session
    pub transactions_total: AtomicU64,
    /// Client transactions that ended in any error
    pub transactions_failed: AtomicU64,
    /// Client transactions that ended in a network timeout
    pub transaction_timeouts: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            datagrams_received: AtomicU64::new(0),
            responses_sent: AtomicU64::new(0),
            error_replies: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            idle_timeouts: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            transactions_total: AtomicU64::new(0),
            transactions_failed: AtomicU64::new(0),
            transaction_timeouts: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn datagram_received(&self) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn response_sent(&self) {
        self.responses_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn error_reply(&self) {
        self.error_replies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn idle_timeout(&self) {
        self.idle_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn send_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transaction_started(&self) {
        self.transactions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transaction_failed(&self) {
        self.transactions_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transaction_timeout(&self) {
        self.transaction_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            responses_sent: self.responses_sent.load(Ordering::Relaxed),
            error_replies: self.error_replies.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            idle_timeouts: self.idle_timeouts.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            transactions_total: self.transactions_total.load(Ordering::Relaxed),
            transactions_failed: self.transactions_failed.load(Ordering::Relaxed),
            transaction_timeouts: self.transaction_timeouts.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            datagrams_received = snapshot.datagrams_received,
            responses_sent = snapshot.responses_sent,
            error_replies = snapshot.error_replies,
            decode_failures = snapshot.decode_failures,
            idle_timeouts = snapshot.idle_timeouts,
            send_failures = snapshot.send_failures,
            transactions_total = snapshot.transactions_total,
            transactions_failed = snapshot.transactions_failed,
            transaction_timeouts = snapshot.transaction_timeouts,
            uptime_seconds = snapshot.uptime_seconds,
            "Protocol metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub datagrams_received: u64,
    pub responses_sent: u64,
    pub error_replies: u64,
    pub decode_failures: u64,
    pub idle_timeouts: u64,
    pub send_failures: u64,
    pub transactions_total: u64,
    pub transactions_failed: u64,
    pub transaction_timeouts: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
