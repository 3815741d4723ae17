//! Schema-driven packet codec.
//!
//! [`encode`] and [`decode`] work on plain byte slices and validate the buffer
//! length before touching it. [`PacketCodec`] wraps the same routine as a
//! `tokio_util` codec over `BytesMut` for the transport.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::core::packet::{Packet, FIELD_WIDTH, PACKET_SIZE, SCHEMA};
use crate::error::{ProtocolError, Result};

/// Serialize `packet` into the front of `dst`.
///
/// Returns the number of bytes written, always [`PACKET_SIZE`].
pub fn encode(packet: &Packet, dst: &mut [u8]) -> Result<usize> {
    if dst.len() < PACKET_SIZE {
        return Err(ProtocolError::InsufficientBuffer {
            needed: PACKET_SIZE,
            actual: dst.len(),
        });
    }

    for spec in &SCHEMA {
        let mut slot = &mut dst[spec.offset..spec.offset + FIELD_WIDTH];
        slot.put_u32(packet.get(spec.field));
    }

    Ok(PACKET_SIZE)
}

/// Deserialize a packet from the front of `src`.
///
/// Trailing bytes beyond [`PACKET_SIZE`] are ignored. Kind and mode values
/// outside the defined range decode successfully as `Unknown`.
pub fn decode(src: &[u8]) -> Result<Packet> {
    if src.len() < PACKET_SIZE {
        return Err(ProtocolError::InsufficientBuffer {
            needed: PACKET_SIZE,
            actual: src.len(),
        });
    }

    let mut packet = Packet::default();
    for spec in &SCHEMA {
        let mut slot = &src[spec.offset..spec.offset + FIELD_WIDTH];
        packet.set(spec.field, slot.get_u32());
    }

    Ok(packet)
}

impl Packet {
    /// Serialize into a freshly allocated fixed-size array
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut buf = [0u8; PACKET_SIZE];
        // The array is exactly PACKET_SIZE so this cannot fail
        let _ = encode(self, &mut buf);
        buf
    }

    pub fn from_bytes(src: &[u8]) -> Result<Self> {
        decode(src)
    }
}

/// Datagram codec: one packet per frame
#[derive(Debug, Default, Clone, Copy)]
pub struct PacketCodec;

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Packet, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(PACKET_SIZE);
        dst.put_slice(&item.to_bytes());
        Ok(())
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        if src.len() < PACKET_SIZE {
            return Ok(None);
        }

        let frame = src.split_to(PACKET_SIZE);
        decode(&frame).map(Some)
    }
}
