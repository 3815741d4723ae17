use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::core::codec;
use crate::core::packet::{ErrorCode, FunctionId, Packet, PacketKind, PacketMode, OPERAND_COUNT};
use crate::protocol::status::Status;

/// Operand array carried by every packet
pub type Operands = [u32; OPERAND_COUNT];

/// Pure operation: operands in, result or domain error out
type HandlerFn = dyn Fn(&Operands) -> Result<u32, ErrorCode> + Send + Sync + 'static;

/// `operands[0] * operands[1]`, wrapping modulo 2^32
pub fn multiply(operands: &Operands) -> Result<u32, ErrorCode> {
    Ok(operands[0].wrapping_mul(operands[1]))
}

/// `operands[0] / operands[1]`, truncating. A zero divisor is a
/// [`ErrorCode::FuncExecError`].
pub fn divide(operands: &Operands) -> Result<u32, ErrorCode> {
    operands[0]
        .checked_div(operands[1])
        .ok_or(ErrorCode::FuncExecError)
}

/// A registered operation and the statuses it reports
pub struct Operation {
    name: &'static str,
    handler: Box<HandlerFn>,
    on_success: Option<Status>,
    on_failure: Option<Status>,
}

impl Operation {
    pub fn new<F>(name: &'static str, handler: F) -> Self
    where
        F: Fn(&Operands) -> Result<u32, ErrorCode> + Send + Sync + 'static,
    {
        Self {
            name,
            handler: Box::new(handler),
            on_success: None,
            on_failure: None,
        }
    }

    pub fn with_status(mut self, on_success: Status, on_failure: Option<Status>) -> Self {
        self.on_success = Some(on_success);
        self.on_failure = on_failure;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("on_success", &self.on_success)
            .field("on_failure", &self.on_failure)
            .finish_non_exhaustive()
    }
}

/// Reply produced for one request, plus the status to report for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Packet,
    pub status: Option<Status>,
}

impl Outcome {
    /// Reply for a datagram that never reached dispatch. Function id is 0
    /// when the request could not be decoded at all.
    pub fn rejected(request: Option<&Packet>, code: ErrorCode) -> Self {
        let reply = match request {
            Some(request) => request.error_reply(code),
            None => Packet::new_error(code),
        };
        Self {
            reply,
            status: None,
        }
    }
}

/// Function id to operation routing.
///
/// Built once at startup. Ids with no entry fall through to a single default
/// that answers [`ErrorCode::NoSuchFunction`].
#[derive(Debug)]
pub struct OperationTable {
    operations: HashMap<u32, Operation>,
}

impl Default for OperationTable {
    /// Multiply under id 1 and divide under id 2
    fn default() -> Self {
        let mut table = Self::new();
        table.register(
            FunctionId::Multiply.id(),
            Operation::new(FunctionId::Multiply.name(), multiply)
                .with_status(Status::MultiplyDone, None),
        );
        table.register(
            FunctionId::Divide.id(),
            Operation::new(FunctionId::Divide.name(), divide)
                .with_status(Status::DivideDone, Some(Status::DivideError)),
        );
        table
    }
}

impl OperationTable {
    /// Empty table; every request answers `NoSuchFunction`
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register `operation` under `function_id`, replacing any previous entry
    pub fn register(&mut self, function_id: u32, operation: Operation) -> Option<Operation> {
        self.operations.insert(function_id, operation)
    }

    pub fn contains(&self, function_id: u32) -> bool {
        self.operations.contains_key(&function_id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Execute a validated request.
    ///
    /// A successful result overwrites `operands[0]`; the other operands are
    /// echoed back unchanged.
    pub fn dispatch(&self, request: &Packet) -> Outcome {
        let Some(operation) = self.operations.get(&request.function_id) else {
            return Outcome {
                reply: request.error_reply(ErrorCode::NoSuchFunction),
                status: Some(Status::UnknownFunction),
            };
        };

        match (operation.handler)(&request.operands) {
            Ok(result) => {
                let mut operands = request.operands;
                operands[0] = result;
                Outcome {
                    reply: Packet::new_response(request.function_id, operands),
                    status: operation.on_success,
                }
            }
            Err(code) => Outcome {
                reply: request.error_reply(code),
                status: operation.on_failure,
            },
        }
    }
}

/// Decode, validate and dispatch one inbound datagram.
///
/// Checks run in order and the first failure decides the error code:
/// undecodable bytes, then kind, then mode. Rejected packets report no status.
pub fn process_datagram(bytes: &[u8], table: &OperationTable) -> Outcome {
    let request = match codec::decode(bytes) {
        Ok(packet) => packet,
        Err(e) => {
            warn!(error = %e, len = bytes.len(), "Undecodable datagram");
            return Outcome::rejected(None, ErrorCode::GeneralError);
        }
    };

    if request.kind != PacketKind::Request {
        warn!(kind = ?request.kind, "Rejecting packet that is not a request");
        return Outcome::rejected(Some(&request), ErrorCode::InvalidType);
    }

    if request.mode != PacketMode::Client {
        warn!(mode = ?request.mode, "Rejecting packet not sent in client mode");
        return Outcome::rejected(Some(&request), ErrorCode::InvalidMode);
    }

    debug!(
        function_id = request.function_id,
        op0 = request.operands[0],
        op1 = request.operands[1],
        "Dispatching request"
    );
    table.dispatch(&request)
}
