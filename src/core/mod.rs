//! # Core Protocol Components
//!
//! Packet model, wire schema and codec.
//!
//! ## Components
//! - **Packet**: kind, mode, function id and a fixed operand array
//! - **Codec**: schema-driven big-endian encode/decode plus a `tokio_util` codec
//!
//! ## Wire Format
//! ```text
//! [Kind(4)] [Mode(4)] [FunctionId(4)] [Operand0(4)] [Operand1(4)]
//! ```
//!
//! ## Safety
//! - Buffer length is checked before any read or write
//! - Unknown kind/mode values decode instead of failing, so the server can
//!   answer them with a precise error code

pub mod codec;
pub mod packet;
