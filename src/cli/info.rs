use anyhow::{Context, Result};
use std::path::PathBuf;

use dbdi::table::{AlignedTable, TableSummary};

use super::ensure_exists;

/// Display information about a feature table
pub fn run(file: PathBuf) -> Result<()> {
    ensure_exists(&file)?;

    let table = AlignedTable::read_csv_file(&file)
        .with_context(|| format!("Failed to read table: {}", file.display()))?;
    let summary = TableSummary::of(&table);

    println!("File: {}", file.display());
    println!();

    #[cfg(feature = "colorized_output")]
    {
        print!("{}", summary.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        print!("{}", summary);
    }

    println!();
    println!("Features per scan:");
    for (column, count) in summary.features_per_scan.iter().enumerate() {
        println!("  scan{:<4} {}", column + 1, count);
    }

    Ok(())
}
