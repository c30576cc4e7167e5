#![no_main]

use libfuzzer_sys::fuzz_target;
use snaprun::{decode_snapshot, encode_snapshot};

fuzz_target!(|data: &[u8]| {
    // Snapshots are read lossily, so every byte string is a possible snapshot
    let content = String::from_utf8_lossy(data);
    let record = decode_snapshot(&content);

    // Whatever was decoded must survive a save/load cycle unchanged
    if let Ok(encoded) = encode_snapshot(&record) {
        assert_eq!(decode_snapshot(&encoded), record);
    }
});
