//! # Utility Modules
//!
//! Supporting utilities for timing, logging and observability.
//!
//! ## Components
//! - **Timeout**: single-shot receive deadline and timeout constants
//! - **Logging**: structured logging configuration
//! - **Metrics**: per-instance observability counters

pub mod logging;
pub mod metrics;
pub mod timeout;

pub use timeout::Deadline;
