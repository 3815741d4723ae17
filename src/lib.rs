//! # arith-rpc
//!
//! Fixed-layout UDP request/response protocol for remote integer arithmetic.
//!
//! A client sends a 20-byte Request naming a function id and two operands; the
//! server computes the result and answers with a Response carrying it in the
//! first operand, or with an Error packet carrying a numeric error code.
//!
//! ## Layout
//! - [`core`]: packet model, wire schema and codec
//! - [`protocol`]: server-side validation, dispatch and the status indicator
//! - [`transport`]: UDP endpoint with a deadline-bounded receive
//! - [`service`]: [`ClientSession`] and [`Server`]
//! - [`config`], [`error`], [`utils`]: configuration, errors, logging, metrics, timeouts
//!
//! ## Example
//! ```no_run
//! use arith_rpc::{ClientSession, Result};
//!
//! # async fn demo() -> Result<()> {
//! let mut session = ClientSession::new();
//! session.set_remote_address("127.0.0.1")?;
//! session.open().await?;
//! assert_eq!(session.multiply(6, 7).await?, 42);
//! session.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use crate::core::codec::PacketCodec;
pub use crate::core::packet::{ErrorCode, FunctionId, Packet, PacketKind, PacketMode};
pub use config::{ClientConfig, NetworkConfig, ServerConfig};
pub use error::{ProtocolError, Result};
pub use protocol::dispatcher::OperationTable;
pub use service::{ClientSession, Server};
