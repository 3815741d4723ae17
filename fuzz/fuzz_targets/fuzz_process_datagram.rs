#![no_main]

use arith_rpc::protocol::dispatcher::process_datagram;
use arith_rpc::{OperationTable, PacketKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let table = OperationTable::default();
    let outcome = process_datagram(data, &table);
    assert!(matches!(
        outcome.reply.kind,
        PacketKind::Response | PacketKind::Error
    ));
});
