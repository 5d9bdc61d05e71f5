use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use dbdi::align::{align_scans, AlignConfig, AlignMode, CollisionPolicy, DEFAULT_PPM_WINDOW};
use dbdi::io::read_mgf_file;

use super::config::Config;
use super::{derive_output, ensure_exists};

/// Align the scans of an MGF file and write the feature table as CSV
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    ppm: Option<f64>,
    mode: Option<AlignMode>,
    collision: Option<CollisionPolicy>,
    config: Option<PathBuf>,
) -> Result<()> {
    ensure_exists(&input)?;
    let file_config = Config::load(config.as_deref())?.alignment;

    let ppm = ppm.or(file_config.ppm).unwrap_or(DEFAULT_PPM_WINDOW);
    let align_config = AlignConfig::new(ppm)?
        .with_mode(mode.or(file_config.mode).unwrap_or_default())
        .with_collision(collision.or(file_config.collision).unwrap_or_default());

    let output = output.unwrap_or_else(|| derive_output(&input, "aligned.csv"));

    info!("dbdi align");
    info!("==========");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Window: {}", align_config.tolerance);
    info!("Mode: {}, collisions: {}", align_config.mode, align_config.collision);

    let scans = read_mgf_file(&input)
        .with_context(|| format!("Failed to read MGF file: {}", input.display()))?;
    let alignment = align_scans(&scans, &align_config).context("Alignment failed")?;

    alignment
        .table
        .write_csv_file(&output)
        .with_context(|| format!("Failed to write table: {}", output.display()))?;

    info!("Alignment complete!");
    info!("  {}", alignment.stats);
    info!(
        "  Table: {} features x {} scans, {} cells present",
        alignment.table.n_features(),
        alignment.table.n_scans(),
        alignment.table.present_count()
    );

    Ok(())
}
