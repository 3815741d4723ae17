//! Packet model and wire schema.
//!
//! Every packet is a fixed sequence of big-endian `u32` fields:
//!
//! ```text
//! [Kind(4)] [Mode(4)] [FunctionId(4)] [Operand0(4)] [Operand1(4)]
//! ```
//!
//! The layout is described once in [`SCHEMA`]; the codec walks that table
//! instead of addressing offsets by hand.

use std::fmt;

/// Number of operand slots carried by every packet
pub const OPERAND_COUNT: usize = 2;

/// Width in bytes of every field on the wire
pub const FIELD_WIDTH: usize = 4;

/// Number of fixed-width fields: kind, mode, function id and the operands
pub const FIELD_COUNT: usize = 3 + OPERAND_COUNT;

/// Exact wire size of a packet in bytes
pub const PACKET_SIZE: usize = FIELD_COUNT * FIELD_WIDTH;

/// Classification of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Request,
    Response,
    Error,
    /// Any value outside the defined range, kept so the server can reject it
    Unknown(u32),
}

impl PacketKind {
    pub const REQUEST: u32 = 1;
    pub const RESPONSE: u32 = 2;
    pub const ERROR: u32 = 3;
}

impl From<u32> for PacketKind {
    fn from(value: u32) -> Self {
        match value {
            Self::REQUEST => PacketKind::Request,
            Self::RESPONSE => PacketKind::Response,
            Self::ERROR => PacketKind::Error,
            other => PacketKind::Unknown(other),
        }
    }
}

impl From<PacketKind> for u32 {
    fn from(kind: PacketKind) -> Self {
        match kind {
            PacketKind::Request => PacketKind::REQUEST,
            PacketKind::Response => PacketKind::RESPONSE,
            PacketKind::Error => PacketKind::ERROR,
            PacketKind::Unknown(other) => other,
        }
    }
}

/// Role that produced a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketMode {
    Client,
    Server,
    Unknown(u32),
}

impl PacketMode {
    pub const CLIENT: u32 = 1;
    pub const SERVER: u32 = 2;
}

impl From<u32> for PacketMode {
    fn from(value: u32) -> Self {
        match value {
            Self::CLIENT => PacketMode::Client,
            Self::SERVER => PacketMode::Server,
            other => PacketMode::Unknown(other),
        }
    }
}

impl From<PacketMode> for u32 {
    fn from(mode: PacketMode) -> Self {
        match mode {
            PacketMode::Client => PacketMode::CLIENT,
            PacketMode::Server => PacketMode::SERVER,
            PacketMode::Unknown(other) => other,
        }
    }
}

/// Operations the server knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FunctionId {
    Multiply = 1,
    Divide = 2,
}

impl FunctionId {
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            FunctionId::Multiply => "multiply",
            FunctionId::Divide => "divide",
        }
    }
}

impl TryFrom<u32> for FunctionId {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FunctionId::Multiply),
            2 => Ok(FunctionId::Divide),
            other => Err(other),
        }
    }
}

/// Error codes carried in operand 0 of an Error packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    /// The datagram could not be decoded
    GeneralError = 1,
    /// Packet kind was not Request
    InvalidType = 2,
    /// Packet mode was not Client
    InvalidMode = 3,
    /// The operation rejected its operands
    FuncExecError = 4,
    /// No operation registered for the function id
    NoSuchFunction = 5,
}

impl ErrorCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for ErrorCode {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ErrorCode::GeneralError),
            2 => Ok(ErrorCode::InvalidType),
            3 => Ok(ErrorCode::InvalidMode),
            4 => Ok(ErrorCode::FuncExecError),
            5 => Ok(ErrorCode::NoSuchFunction),
            other => Err(other),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::GeneralError => "general error",
            ErrorCode::InvalidType => "invalid packet type",
            ErrorCode::InvalidMode => "invalid packet mode",
            ErrorCode::FuncExecError => "function execution error",
            ErrorCode::NoSuchFunction => "no such function",
        };
        write!(f, "{name} ({})", self.code())
    }
}

/// Addressable field of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kind,
    Mode,
    FunctionId,
    Operand(usize),
}

/// One entry of the wire schema: a named `u32` at a fixed byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field: Field,
    pub offset: usize,
}

/// Ordered wire layout. Offsets must be contiguous multiples of [`FIELD_WIDTH`].
pub const SCHEMA: [FieldSpec; FIELD_COUNT] = [
    FieldSpec {
        name: "kind",
        field: Field::Kind,
        offset: 0,
    },
    FieldSpec {
        name: "mode",
        field: Field::Mode,
        offset: FIELD_WIDTH,
    },
    FieldSpec {
        name: "function_id",
        field: Field::FunctionId,
        offset: 2 * FIELD_WIDTH,
    },
    FieldSpec {
        name: "operand0",
        field: Field::Operand(0),
        offset: 3 * FIELD_WIDTH,
    },
    FieldSpec {
        name: "operand1",
        field: Field::Operand(1),
        offset: 4 * FIELD_WIDTH,
    },
];

/// A single protocol message.
///
/// Packets live for one request/response cycle only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet {
    pub kind: PacketKind,
    pub mode: PacketMode,
    pub function_id: u32,
    pub operands: [u32; OPERAND_COUNT],
}

impl Packet {
    /// Client request for `function_id`
    pub fn new_request(function_id: u32, operands: [u32; OPERAND_COUNT]) -> Self {
        Self {
            kind: PacketKind::Request,
            mode: PacketMode::Client,
            function_id,
            operands,
        }
    }

    /// Server response; by convention `operands[0]` holds the result
    pub fn new_response(function_id: u32, operands: [u32; OPERAND_COUNT]) -> Self {
        Self {
            kind: PacketKind::Response,
            mode: PacketMode::Server,
            function_id,
            operands,
        }
    }

    /// Server error reply carrying `code` in `operands[0]`
    pub fn new_error(code: ErrorCode) -> Self {
        let mut operands = [0; OPERAND_COUNT];
        operands[0] = code.code();
        Self {
            kind: PacketKind::Error,
            mode: PacketMode::Server,
            function_id: 0,
            operands,
        }
    }

    /// Error reply to this request, keeping its function id
    pub fn error_reply(&self, code: ErrorCode) -> Self {
        Self {
            function_id: self.function_id,
            ..Self::new_error(code)
        }
    }

    /// Error code of an Error packet, raw from the wire
    pub fn error_code(&self) -> Option<u32> {
        (self.kind == PacketKind::Error).then_some(self.operands[0])
    }

    /// Read a field by schema position.
    ///
    /// Operand indices past [`OPERAND_COUNT`] read as zero.
    pub fn get(&self, field: Field) -> u32 {
        match field {
            Field::Kind => self.kind.into(),
            Field::Mode => self.mode.into(),
            Field::FunctionId => self.function_id,
            Field::Operand(i) => self.operands.get(i).copied().unwrap_or(0),
        }
    }

    /// Write a field by schema position. Out-of-range operands are ignored.
    pub fn set(&mut self, field: Field, value: u32) {
        match field {
            Field::Kind => self.kind = PacketKind::from(value),
            Field::Mode => self.mode = PacketMode::from(value),
            Field::FunctionId => self.function_id = value,
            Field::Operand(i) => {
                if let Some(slot) = self.operands.get_mut(i) {
                    *slot = value;
                }
            }
        }
    }
}

impl Default for Packet {
    /// All-zero packet; decoding fills every field
    fn default() -> Self {
        Self {
            kind: PacketKind::Unknown(0),
            mode: PacketMode::Unknown(0),
            function_id: 0,
            operands: [0; OPERAND_COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_contiguous() {
        for (i, spec) in SCHEMA.iter().enumerate() {
            assert_eq!(spec.offset, i * FIELD_WIDTH, "field {}", spec.name);
        }
        assert_eq!(PACKET_SIZE, 20);
    }

    #[test]
    fn test_constructors_set_kind_and_mode() {
        let req = Packet::new_request(1, [6, 7]);
        assert_eq!(req.kind, PacketKind::Request);
        assert_eq!(req.mode, PacketMode::Client);

        let rsp = Packet::new_response(1, [42, 7]);
        assert_eq!(rsp.kind, PacketKind::Response);
        assert_eq!(rsp.mode, PacketMode::Server);

        let err = Packet::new_error(ErrorCode::FuncExecError);
        assert_eq!(err.kind, PacketKind::Error);
        assert_eq!(err.mode, PacketMode::Server);
        assert_eq!(err.operands[0], 4);
        assert_eq!(err.error_code(), Some(4));
        assert_eq!(rsp.error_code(), None);
    }

    #[test]
    fn test_error_reply_keeps_function_id() {
        let req = Packet::new_request(2, [5, 0]);
        let err = req.error_reply(ErrorCode::FuncExecError);
        assert_eq!(err.kind, PacketKind::Error);
        assert_eq!(err.mode, PacketMode::Server);
        assert_eq!(err.function_id, 2);
        assert_eq!(err.operands, [4, 0]);

        assert_eq!(Packet::new_error(ErrorCode::GeneralError).function_id, 0);
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(u32::from(PacketKind::Request), 1);
        assert_eq!(u32::from(PacketKind::Response), 2);
        assert_eq!(u32::from(PacketKind::Error), 3);
        assert_eq!(PacketKind::from(9), PacketKind::Unknown(9));
        assert_eq!(u32::from(PacketKind::Unknown(9)), 9);

        assert_eq!(u32::from(PacketMode::Client), 1);
        assert_eq!(u32::from(PacketMode::Server), 2);
        assert_eq!(PacketMode::from(0), PacketMode::Unknown(0));

        assert_eq!(FunctionId::try_from(1), Ok(FunctionId::Multiply));
        assert_eq!(FunctionId::try_from(2), Ok(FunctionId::Divide));
        assert_eq!(FunctionId::try_from(3), Err(3));

        for code in 1..=5 {
            assert_eq!(ErrorCode::try_from(code).map(ErrorCode::code), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(0), Err(0));
    }

    #[test]
    fn test_field_accessors() {
        let mut packet = Packet::default();
        for (i, spec) in SCHEMA.iter().enumerate() {
            packet.set(spec.field, 100 + i as u32);
        }
        assert_eq!(packet.kind, PacketKind::Unknown(100));
        assert_eq!(packet.mode, PacketMode::Unknown(101));
        assert_eq!(packet.function_id, 102);
        assert_eq!(packet.operands, [103, 104]);

        packet.set(Field::Operand(OPERAND_COUNT), 1);
        assert_eq!(packet.get(Field::Operand(OPERAND_COUNT)), 0);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(
            ErrorCode::NoSuchFunction.to_string(),
            "no such function (5)"
        );
    }
}
