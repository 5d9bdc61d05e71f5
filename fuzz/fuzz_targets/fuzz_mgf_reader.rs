#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use dbdi::align::{align_scans, AlignConfig};
use dbdi::io::MgfReader;

fuzz_target!(|data: &[u8]| {
    // Malformed input must surface as an error, never as a panic
    let mut scans = Vec::new();
    for scan in MgfReader::new(Cursor::new(data)).take(100) {
        match scan {
            Ok(scan) => scans.push(scan),
            Err(_) => return,
        }
    }

    // Whatever parses must either align or be rejected cleanly
    let _ = align_scans(&scans, &AlignConfig::default());
});
