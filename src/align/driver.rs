//! Scan-by-scan alignment driver.
//!
//! The driver walks through `Empty → Seeded → Folding(n) → Finalized`:
//! the first scan seeds one feature per peak, every later scan is matched and
//! folded peak by peak, and [`Aligner::finish`] hands the finalized table to
//! the caller.
//!
//! Folding consumes the aligner and gives it back on success. On error the
//! aligner, and with it every intermediate table state, is dropped, so an
//! aborted run never exposes partial results.

use log::{debug, info};

use super::batch;
use super::config::{AlignConfig, AlignMode, CollisionPolicy};
use super::error::AlignError;
use super::feature_table::FeatureTable;
use super::matcher::{match_peak, MatchResult};
use super::stats::AlignStats;
use crate::spectrum::Scan;
use crate::table::AlignedTable;

/// Lifecycle of an alignment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerState {
    /// No scan folded yet
    Empty,
    /// First scan folded, one feature per peak
    Seeded,
    /// The scan with this 1-based column index was the last one folded
    Folding(usize),
    /// Table handed over to the caller
    Finalized,
}

/// Result of a completed alignment run
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Finalized feature matrix, rows ascending by mean m/z
    pub table: AlignedTable,
    /// Run statistics
    pub stats: AlignStats,
}

/// Folds scans into a [`FeatureTable`]
#[derive(Debug, Clone)]
pub struct Aligner {
    config: AlignConfig,
    table: FeatureTable,
    state: AlignerState,
    stats: AlignStats,
}

impl Aligner {
    /// Create an aligner with an empty feature table
    pub fn new(config: AlignConfig) -> Self {
        Self {
            config,
            table: FeatureTable::new(),
            state: AlignerState::Empty,
            stats: AlignStats::default(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AlignerState {
        self.state
    }

    /// The configuration this aligner runs with
    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Read-only view of the table built so far
    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    /// Statistics accumulated so far
    pub fn stats(&self) -> &AlignStats {
        &self.stats
    }

    /// Fold one scan into the table.
    ///
    /// The scan is validated before anything is mutated; a malformed scan
    /// aborts the run and drops the aligner.
    pub fn fold_scan(mut self, scan: &Scan) -> Result<Self, AlignError> {
        validate_scan(scan, self.stats.scans_folded + 1)?;

        let column = self.table.open_scan();
        match self.state {
            AlignerState::Empty => {
                self.seed(column, scan);
                self.state = AlignerState::Seeded;
            }
            AlignerState::Seeded | AlignerState::Folding(_) | AlignerState::Finalized => {
                match self.config.mode {
                    AlignMode::Sequential => self.fold_sequential(column, scan),
                    AlignMode::Batch => {
                        batch::fold_scan(&mut self.table, column, scan, self.config.tolerance, &mut self.stats)
                    }
                }
                self.state = AlignerState::Folding(column);
            }
        }

        self.table.refresh();
        self.stats.scans_folded += 1;
        self.stats.peaks_processed += scan.peak_count();

        debug!(
            "Folded scan {} ({} peaks, TIC {:.1}, base peak m/z {:.4}), table now holds {} features",
            column,
            scan.peak_count(),
            scan.total_ion_current(),
            scan.base_peak().map_or(f64::NAN, |p| p.mz),
            self.table.len()
        );

        Ok(self)
    }

    /// Finalize the run and hand the aligned table to the caller
    pub fn finish(mut self) -> Result<Alignment, AlignError> {
        if self.state == AlignerState::Empty {
            return Err(AlignError::EmptyInput);
        }

        self.table.refresh();
        self.state = AlignerState::Finalized;
        let table = AlignedTable::from_feature_table(&self.table);

        info!("{}", self.stats);

        Ok(Alignment {
            table,
            stats: self.stats,
        })
    }

    fn seed(&mut self, column: usize, scan: &Scan) {
        for peak in &scan.peaks {
            self.table.insert(column, *peak);
        }
        self.stats.features_created += scan.peak_count();
    }

    fn fold_sequential(&mut self, column: usize, scan: &Scan) {
        for peak in &scan.peaks {
            let result = match_peak(peak.mz, &self.table, self.config.tolerance);
            match &result {
                MatchResult::NoMatch => {}
                MatchResult::UniqueMatch(_) => self.stats.unique_matches += 1,
                MatchResult::AmbiguousMatch(_) => self.stats.ambiguous_matches += 1,
            }

            let Some(row) = result.resolve(&self.table, peak.mz) else {
                self.table.insert(column, *peak);
                self.stats.features_created += 1;
                continue;
            };

            let (representative_mz, incumbent) = match self.table.get(row) {
                Some(feature) => (feature.representative_mz(), feature.observation(column).copied()),
                None => continue,
            };

            let Some(incumbent) = incumbent else {
                self.table.update(row, column, *peak);
                continue;
            };

            self.stats.collisions += 1;
            match self.config.collision {
                CollisionPolicy::LastWriteWins => {
                    self.table.update(row, column, *peak);
                    self.stats.peaks_overwritten += 1;
                }
                CollisionPolicy::NearestWins => {
                    let challenger = (peak.mz - representative_mz).abs();
                    let holder = (incumbent.mz - representative_mz).abs();
                    if challenger < holder {
                        self.table.update(row, column, *peak);
                        self.table.insert(column, incumbent.peak());
                    } else {
                        self.table.insert(column, *peak);
                    }
                    self.stats.features_created += 1;
                }
            }
        }
    }
}

/// Align a sequence of scans into one feature matrix.
///
/// Every scan is validated before the first one is folded, so invalid input
/// fails before any table mutation.
pub fn align_scans(scans: &[Scan], config: &AlignConfig) -> Result<Alignment, AlignError> {
    if scans.is_empty() {
        return Err(AlignError::EmptyInput);
    }
    for (i, scan) in scans.iter().enumerate() {
        validate_scan(scan, i + 1)?;
    }

    info!(
        "Aligning {} scans ({} peaks) with a {} window, {} mode",
        scans.len(),
        scans.iter().map(|s| s.peak_count()).sum::<usize>(),
        config.tolerance,
        config.mode
    );

    let mut aligner = Aligner::new(config.clone());
    for scan in scans {
        aligner = aligner.fold_scan(scan)?;
    }
    aligner.finish()
}

fn validate_scan(scan: &Scan, position: usize) -> Result<(), AlignError> {
    if scan.is_empty() {
        return Err(AlignError::EmptyScan { position });
    }
    if let Some((peak, bad)) = scan.peaks.iter().enumerate().find(|(_, p)| !p.is_valid()) {
        return Err(AlignError::InvalidPeak {
            position,
            peak,
            mz: bad.mz,
            intensity: bad.intensity,
        });
    }

    // one peak per mass per scan keeps representative masses unique
    let mut order: Vec<usize> = (0..scan.peaks.len()).collect();
    order.sort_by(|&a, &b| scan.peaks[a].mz.total_cmp(&scan.peaks[b].mz).then(a.cmp(&b)));
    if let Some(pair) = order
        .windows(2)
        .find(|pair| scan.peaks[pair[0]].mz == scan.peaks[pair[1]].mz)
    {
        return Err(AlignError::DuplicatePeak {
            position,
            first: pair[0],
            peak: pair[1],
            mz: scan.peaks[pair[1]].mz,
        });
    }
    Ok(())
}
