#![no_main]

use arith_rpc::Packet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything at least one packet long must decode and re-encode to its prefix
    if let Ok(packet) = Packet::from_bytes(data) {
        assert_eq!(&packet.to_bytes()[..], &data[..arith_rpc::core::packet::PACKET_SIZE]);
    }
});
