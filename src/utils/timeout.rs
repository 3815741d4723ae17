//! Single-shot receive deadline.
//!
//! A [`Deadline`] is armed immediately before a blocking receive and stopped
//! as soon as the receive returns. If the armed instant passes first, the
//! receive future is dropped and the deadline reports itself as expired until
//! it is reset or re-armed.

use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant};

use crate::error::{ProtocolError, Result};

/// How long a client waits for the server's reply
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the server blocks before logging an idle period
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Lower bound accepted by configuration validation
pub const MIN_TIMEOUT: Duration = Duration::from_millis(100);

/// Upper bound accepted by configuration validation
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Default, Clone)]
pub struct Deadline {
    armed_until: Option<Instant>,
    expired: bool,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the deadline `duration` from now. Clears a previous expiry.
    pub fn start(&mut self, duration: Duration) {
        self.armed_until = Some(Instant::now() + duration);
        self.expired = false;
    }

    /// Disarm. If the armed instant had already passed, the expiry sticks.
    pub fn stop(&mut self) {
        if let Some(at) = self.armed_until.take() {
            if Instant::now() >= at {
                self.expired = true;
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired || self.armed_until.is_some_and(|at| Instant::now() >= at)
    }

    /// Clear both the armed instant and any recorded expiry
    pub fn reset(&mut self) {
        self.armed_until = None;
        self.expired = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_until.is_some()
    }

    /// Run `fut` until it completes or the deadline passes.
    ///
    /// The deadline is armed for `duration` before polling and stopped
    /// afterwards in both outcomes. Expiry surfaces as [`ProtocolError::Timeout`].
    pub async fn run<F, T>(&mut self, duration: Duration, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        let at = Instant::now() + duration;
        self.armed_until = Some(at);
        self.expired = false;

        let outcome = time::timeout_at(at, fut).await;
        match outcome {
            Ok(value) => {
                // A reply that raced the deadline still counts as delivered
                self.armed_until = None;
                Ok(value)
            }
            Err(_) => {
                self.stop();
                self.expired = true;
                Err(ProtocolError::Timeout)
            }
        }
    }
}
