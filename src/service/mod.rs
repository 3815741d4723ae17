//! # Services
//!
//! The two protocol roles.
//!
//! ## Components
//! - **Client**: [`ClientSession`], an explicit session object with Closed/Open
//!   states and typed `multiply`/`divide` calls
//! - **Server**: [`Server`], the receive/validate/dispatch/reply loop

pub mod client;
pub mod server;

pub use client::ClientSession;
pub use server::Server;
