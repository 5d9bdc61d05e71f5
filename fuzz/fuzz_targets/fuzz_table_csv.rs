#![no_main]

use libfuzzer_sys::fuzz_target;

use dbdi::table::{AlignedTable, TableSummary};

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = AlignedTable::read_csv(data) {
        let _ = TableSummary::of(&table);
        let mut buffer = Vec::new();
        let _ = table.write_csv(&mut buffer);
    }
});
