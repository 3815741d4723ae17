//! # Protocol Layer
//!
//! Server-side request handling: validation, routing by function id, and the
//! status indicator collaborator.
//!
//! ## Components
//! - **Dispatcher**: `OperationTable` and the decode/validate/dispatch step
//! - **Status**: outcome characters and indicator implementations

pub mod dispatcher;
pub mod status;
