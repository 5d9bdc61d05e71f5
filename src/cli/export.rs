use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use dbdi::export::export_to_spectra;
use dbdi::io::write_mgf_file;
use dbdi::table::AlignedTable;

use super::ensure_exists;

/// Split a feature table into one MGF ion block per scan
pub fn run(input: PathBuf, output: PathBuf) -> Result<()> {
    ensure_exists(&input)?;

    let table = AlignedTable::read_csv_file(&input)
        .with_context(|| format!("Failed to read table: {}", input.display()))?;
    let scans = export_to_spectra(&table);

    write_mgf_file(&output, &scans)
        .with_context(|| format!("Failed to write MGF file: {}", output.display()))?;

    info!(
        "Exported {} scans ({} peaks) to {}",
        scans.len(),
        scans.iter().map(|s| s.peak_count()).sum::<usize>(),
        output.display()
    );

    Ok(())
}
