//! # Error Types
//!
//! Error handling for the arithmetic request/response protocol.
//!
//! ## Error Categories
//! - **Transport errors**: socket creation and bind failures, send/receive I/O
//! - **Protocol errors**: undersized buffers, undecodable replies, unexpected reply kinds
//! - **Remote errors**: error codes reported by the server in an Error packet
//! - **Timeout errors**: no reply within the receive deadline
//! - **Session errors**: transactions attempted on a closed session
//!
//! Every error also maps onto a negative integer status code through
//! [`ProtocolError::status_code`], which is what command line tools print.
//!
//! ## Example Usage
//! ```rust
//! use arith_rpc::error::ProtocolError;
//!
//! let err = ProtocolError::Remote(4);
//! assert_eq!(err.status_code(), -4);
//! assert_eq!(err.remote_code(), Some(4));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    pub const ERR_ADDRESS_EMPTY: &str = "Remote address cannot be empty";
    pub const ERR_ADDRESS_UNPARSABLE: &str = "Remote address is not a valid IP address";

    pub const ERR_SHORT_DATAGRAM: &str = "Datagram shorter than packet wire size";
}

/// Status code values returned by [`ProtocolError::status_code`] for local failures.
///
/// All local codes sit at 101 and above, clear of the codes 1 to 5 that the
/// server reports.
pub mod status {
    pub const BIND: i32 = 101;
    pub const SOCKET: i32 = 102;
    pub const NOT_OPEN: i32 = 103;
    pub const UNKNOWN: i32 = 104;
    pub const NETWORK_TIMEOUT: i32 = 105;
    pub const INVALID_ARGUMENT: i32 = 106;
    pub const WRONG_ADDRESS_LENGTH: i32 = 107;
    pub const ALREADY_OPEN: i32 = 108;
    pub const INSUFFICIENT_BUFFER: i32 = 109;
    pub const CONFIG: i32 = 110;
}

// ProtocolError is the primary error type for all protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Remote address length {len} outside 1..={max}")]
    WrongAddressLength { len: usize, max: usize },

    #[error("Insufficient buffer: need {needed} bytes, got {actual}")]
    InsufficientBuffer { needed: usize, actual: usize },

    #[error("Failed to create socket: {0}")]
    Socket(#[source] io::Error),

    #[error("Failed to bind socket: {0}")]
    Bind(#[source] io::Error),

    #[error("Session is not open")]
    NotOpen,

    #[error("Session is already open")]
    AlreadyOpen,

    #[error("No response from server within deadline")]
    NetworkTimeout,

    #[error("Timeout occurred")]
    Timeout,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Server reported error code {0}")]
    Remote(u32),

    #[error("Unknown server reply kind: {0}")]
    UnknownServerReply(u32),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Negative integer status for this error.
    ///
    /// Server-reported codes pass through unchanged apart from the sign, so a
    /// division by zero surfaces as `-4`. Codes above `i32::MAX` saturate to
    /// `-i32::MAX`; a server code of 0 reports as unknown.
    pub fn status_code(&self) -> i32 {
        let code = match self {
            ProtocolError::Remote(0) => status::UNKNOWN,
            ProtocolError::Remote(code) => i32::try_from(*code).unwrap_or(i32::MAX),
            ProtocolError::InsufficientBuffer { .. } => status::INSUFFICIENT_BUFFER,
            ProtocolError::Bind(_) => status::BIND,
            ProtocolError::Socket(_) => status::SOCKET,
            ProtocolError::NotOpen => status::NOT_OPEN,
            ProtocolError::NetworkTimeout | ProtocolError::Timeout => status::NETWORK_TIMEOUT,
            ProtocolError::InvalidArgument(_) => status::INVALID_ARGUMENT,
            ProtocolError::WrongAddressLength { .. } => status::WRONG_ADDRESS_LENGTH,
            ProtocolError::AlreadyOpen => status::ALREADY_OPEN,
            ProtocolError::ConfigError(_) => status::CONFIG,
            ProtocolError::Io(_)
            | ProtocolError::Decode(_)
            | ProtocolError::UnknownServerReply(_) => status::UNKNOWN,
        };
        -code
    }

    /// The raw error code carried by a server Error packet, if this is one.
    pub fn remote_code(&self) -> Option<u32> {
        match self {
            ProtocolError::Remote(code) => Some(*code),
            _ => None,
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
