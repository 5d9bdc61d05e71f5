use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use dbdi::table::FilledTable;
use dbdi::traces::{select_traces, TraceTransform};

use super::ensure_exists;

/// Write the selected traces as long-format CSV
pub fn run(input: PathBuf, ids: Vec<String>, log2: bool, output: Option<PathBuf>) -> Result<()> {
    ensure_exists(&input)?;

    let table = FilledTable::read_csv_file(&input)
        .with_context(|| format!("Failed to read imputed table: {}", input.display()))?;
    let transform = if log2 {
        TraceTransform::Log2
    } else {
        TraceTransform::Identity
    };
    let set = select_traces(&table, ids.as_slice(), transform).context("Trace selection failed")?;

    for trace in &set.traces {
        info!("  {} (m/z {:.4})", trace.label(), trace.mean_mz);
    }

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            set.write_csv(BufWriter::new(file))?;
            info!("Wrote {} traces to {}", set.traces.len(), path.display());
        }
        None => set.write_csv(io::stdout().lock())?,
    }

    Ok(())
}
