use anyhow::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use dbdi::impute::{impute_intensities, ImputeConfig, InterpolationMethod};
use dbdi::table::AlignedTable;

use super::config::Config;
use super::{derive_output, ensure_exists};

const DEFAULT_SEED: u64 = 42;

/// Impute the missing cells of an aligned table
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    method: Option<InterpolationMethod>,
    seed: Option<u64>,
    config: Option<PathBuf>,
) -> Result<()> {
    ensure_exists(&input)?;
    let file_config = Config::load(config.as_deref())?.imputation;

    let mut impute_config =
        ImputeConfig::default().with_method(method.or(file_config.method).unwrap_or_default());
    if let Some(spread) = file_config.baseline_spread {
        impute_config = impute_config.with_baseline_spread(spread);
    }
    let seed = seed.or(file_config.seed).unwrap_or(DEFAULT_SEED);
    let output = output.unwrap_or_else(|| derive_output(&input, "imputed.csv"));

    info!("dbdi impute");
    info!("===========");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Method: {}, seed: {}", impute_config.method, seed);

    let table = AlignedTable::read_csv_file(&input)
        .with_context(|| format!("Failed to read table: {}", input.display()))?;
    let missing = table.n_features() * table.n_scans() - table.present_count();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let filled = impute_intensities(&table, &impute_config, &mut rng).context("Imputation failed")?;

    filled
        .write_csv_file(&output)
        .with_context(|| format!("Failed to write table: {}", output.display()))?;

    info!("Imputation complete!");
    info!("  Cells filled: {}", missing);

    Ok(())
}
