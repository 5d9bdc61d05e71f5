//! # dbdi
//!
//! Command-line curation of direct-infusion MS1 scan series.
//!
//! ## Usage
//!
//! ```bash
//! # Align the scans of an MGF file (writes run.aligned.csv)
//! dbdi align run.mgf --ppm 2
//!
//! # Fill missing cells (writes run.aligned.imputed.csv)
//! dbdi impute run.aligned.csv --seed 42
//!
//! # Search for adducts and in-source fragments
//! dbdi adducts run.aligned.imputed.csv --method spearman --threshold 0.9
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
