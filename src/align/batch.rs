//! Batch (vectorized) folding of one scan.
//!
//! All peaks of a scan are matched against the table snapshot taken at scan
//! start in a single pass, then the results are applied. This differs from
//! the sequential driver in two documented ways:
//!
//! - Peaks that start new features are inserted only after the matching
//!   pass, so two unmatched peaks of one scan never merge with each other.
//! - Several peaks may resolve to the same feature; they are applied in
//!   acquisition order and the last one overwrites the earlier ones,
//!   regardless of the configured collision policy.
//!
//! The sequential driver is the reference for correctness.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::PpmTolerance;
use super::feature_table::FeatureTable;
use super::matcher::{match_peak, MatchResult};
use super::stats::AlignStats;
use crate::spectrum::{Peak, Scan};

/// Match every peak of `scan` against the current snapshot of `table`
pub fn match_scan(table: &FeatureTable, peaks: &[Peak], tolerance: PpmTolerance) -> Vec<MatchResult> {
    #[cfg(feature = "parallel")]
    {
        peaks
            .par_iter()
            .map(|peak| match_peak(peak.mz, table, tolerance))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        peaks
            .iter()
            .map(|peak| match_peak(peak.mz, table, tolerance))
            .collect()
    }
}

pub(crate) fn fold_scan(
    table: &mut FeatureTable,
    column: usize,
    scan: &Scan,
    tolerance: PpmTolerance,
    stats: &mut AlignStats,
) {
    let matches = match_scan(table, &scan.peaks, tolerance);
    let targets: Vec<Option<usize>> = scan
        .peaks
        .iter()
        .zip(&matches)
        .map(|(peak, result)| result.resolve(table, peak.mz))
        .collect();

    // row indices stay valid until the first insertion
    let mut unmatched = Vec::new();
    for ((peak, result), target) in scan.peaks.iter().zip(&matches).zip(targets) {
        match result {
            MatchResult::NoMatch => {}
            MatchResult::UniqueMatch(_) => stats.unique_matches += 1,
            MatchResult::AmbiguousMatch(_) => stats.ambiguous_matches += 1,
        }
        match target {
            Some(row) => {
                if table.update(row, column, *peak).is_some() {
                    stats.collisions += 1;
                    stats.peaks_overwritten += 1;
                }
            }
            None => unmatched.push(*peak),
        }
    }

    stats.features_created += unmatched.len();
    for peak in unmatched {
        table.insert(column, peak);
    }
}
