use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use dbdi::adducts::{identify_adducts, read_rules_file, AdductSearch, CorrelationMethod};
use dbdi::table::FilledTable;

use super::config::Config;
use super::{derive_output, ensure_exists};

/// Search an imputed table for adducts and write the report
#[allow(clippy::too_many_arguments)]
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    method: Option<CorrelationMethod>,
    threshold: Option<f64>,
    mass_error: Option<f64>,
    rules: Option<PathBuf>,
    json: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    ensure_exists(&input)?;
    let file_config = Config::load(config.as_deref())?.adducts;

    let mut search = AdductSearch::default().with_rules(file_config.rules);
    if let Some(method) = method.or(file_config.method) {
        search = search.with_method(method);
    }
    if let Some(threshold) = threshold.or(file_config.threshold) {
        search = search.with_threshold(threshold);
    }
    if let Some(mass_error) = mass_error.or(file_config.mass_error) {
        search = search.with_mass_error(mass_error);
    }
    if let Some(path) = rules {
        let custom = read_rules_file(&path)
            .with_context(|| format!("Failed to read adduct rules: {}", path.display()))?;
        search = search.with_rules(custom);
    }

    let output = output.unwrap_or_else(|| {
        derive_output(&input, if json { "adducts.json" } else { "adducts.csv" })
    });

    info!("dbdi adducts");
    info!("============");
    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!(
        "Method: {}, threshold: {}, mass error: {} ppm",
        search.method, search.threshold, search.mass_error
    );

    let table = FilledTable::read_csv_file(&input)
        .with_context(|| format!("Failed to read imputed table: {}", input.display()))?;
    let report = identify_adducts(&table, &search).context("Adduct search failed")?;

    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    if json {
        report.write_json(writer)?;
    } else {
        report.write_csv(writer)?;
    }

    info!("Adduct search complete!");
    for group in &report.groups {
        info!("  {}: {} pairs", group.motive, group.pairs.len());
    }

    Ok(())
}
