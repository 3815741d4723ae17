//! # Transport Layer
//!
//! Thin datagram socket wrapper used by both the client session and the server.
//!
//! ## Components
//! - **UDP**: bind, fire-and-forget `send_to`, and `receive` bounded by a
//!   single-shot [`Deadline`](crate::utils::timeout::Deadline)
//!
//! Sends carry no delivery confirmation. A receive either yields one datagram
//! with its source address or fails with [`ProtocolError::Timeout`](crate::error::ProtocolError::Timeout).

pub mod udp;

pub use udp::UdpTransport;
