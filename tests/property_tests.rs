//! Property-based tests using proptest
//!
//! These tests validate protocol invariants across a wide range of randomly
//! generated inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use arith_rpc::core::codec::{decode, encode};
use arith_rpc::core::packet::{ErrorCode, Packet, PacketKind, PACKET_SIZE};
use arith_rpc::error::ProtocolError;
use arith_rpc::protocol::dispatcher::{divide, multiply, process_datagram, OperationTable};
use proptest::prelude::*;

fn words_to_bytes(words: [u32; 5]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

// Property: any 20-byte datagram decodes, and re-encodes to the same bytes
proptest! {
    #[test]
    fn prop_wire_bytes_roundtrip(words in any::<[u32; 5]>()) {
        let bytes = words_to_bytes(words);
        let packet = decode(&bytes).expect("Full-size buffer should decode");
        prop_assert_eq!(packet.to_bytes().to_vec(), bytes);
    }
}

// Property: request packets survive encode/decode unchanged
proptest! {
    #[test]
    fn prop_request_roundtrip(function_id in any::<u32>(), op0 in any::<u32>(), op1 in any::<u32>()) {
        let packet = Packet::new_request(function_id, [op0, op1]);
        let decoded = Packet::from_bytes(&packet.to_bytes()).expect("Decode should not fail");
        prop_assert_eq!(decoded, packet);
    }
}

// Property: buffers shorter than the wire size are rejected both ways
proptest! {
    #[test]
    fn prop_undersized_buffers_rejected(len in 0usize..PACKET_SIZE) {
        let mut buf = vec![0u8; len];
        let is_insufficient = matches!(
            encode(&Packet::new_request(1, [1, 1]), &mut buf),
            Err(ProtocolError::InsufficientBuffer { needed: PACKET_SIZE, .. })
        );
        prop_assert!(is_insufficient);
        prop_assert!(decode(&buf).is_err());
    }
}

// Property: encoding never writes past the wire size
proptest! {
    #[test]
    fn prop_encode_leaves_tail_untouched(extra in 1usize..64, fill in any::<u8>()) {
        let mut buf = vec![fill; PACKET_SIZE + extra];
        let written = encode(&Packet::new_request(2, [9, 3]), &mut buf).unwrap();
        prop_assert_eq!(written, PACKET_SIZE);
        prop_assert!(buf[PACKET_SIZE..].iter().all(|b| *b == fill));
    }
}

// Property: any datagram gets exactly one well-formed server reply
proptest! {
    #[test]
    fn prop_server_always_replies(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let outcome = process_datagram(&bytes, &OperationTable::default());
        let reply = outcome.reply;
        prop_assert!(matches!(reply.kind, PacketKind::Response | PacketKind::Error));
        if let Some(code) = reply.error_code() {
            prop_assert!(ErrorCode::try_from(code).is_ok());
        }
    }
}

// Property: division truncates like integer division, zero divisor is an error
proptest! {
    #[test]
    fn prop_divide_matches_integer_division(a in any::<u32>(), b in any::<u32>()) {
        match divide(&[a, b]) {
            Ok(q) => {
                prop_assert!(b != 0);
                prop_assert_eq!(q, a / b);
            }
            Err(code) => {
                prop_assert_eq!(b, 0);
                prop_assert_eq!(code, ErrorCode::FuncExecError);
            }
        }
    }
}

// Property: multiplication wraps modulo 2^32
proptest! {
    #[test]
    fn prop_multiply_wraps(a in any::<u32>(), b in any::<u32>()) {
        let expected = ((a as u64 * b as u64) & 0xFFFF_FFFF) as u32;
        prop_assert_eq!(multiply(&[a, b]), Ok(expected));
    }
}

// Property: a valid multiply request echoes the second operand
proptest! {
    #[test]
    fn prop_response_keeps_second_operand(a in any::<u32>(), b in any::<u32>()) {
        let request = Packet::new_request(1, [a, b]);
        let outcome = process_datagram(&request.to_bytes(), &OperationTable::default());
        prop_assert_eq!(outcome.reply.kind, PacketKind::Response);
        prop_assert_eq!(outcome.reply.operands[1], b);
        prop_assert_eq!(outcome.reply.function_id, 1);
    }
}
