//! Tolerance matching of a candidate mass against the feature table.

use super::config::PpmTolerance;
use super::feature_table::FeatureTable;

/// Outcome of looking up one candidate mass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// No feature within the window
    NoMatch,
    /// Exactly one feature (row index) within the window
    UniqueMatch(usize),
    /// Several features within the window, ascending row order
    AmbiguousMatch(Vec<usize>),
}

impl MatchResult {
    /// Pick the feature to fold into.
    ///
    /// Ambiguous matches go to the feature whose representative mass is
    /// nearest to `mz`; equidistant candidates resolve to the lowest row.
    pub fn resolve(&self, table: &FeatureTable, mz: f64) -> Option<usize> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::UniqueMatch(row) => Some(*row),
            MatchResult::AmbiguousMatch(rows) => nearest_row(table, rows.iter().copied(), mz),
        }
    }

    /// True for [`MatchResult::AmbiguousMatch`]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MatchResult::AmbiguousMatch(_))
    }
}

/// Find all features whose representative mass lies within the ppm window
/// centred on `candidate_mz`.
///
/// Pure lookup against the current table snapshot.
pub fn match_peak(candidate_mz: f64, table: &FeatureTable, tolerance: PpmTolerance) -> MatchResult {
    let (lower, upper) = tolerance.bounds(candidate_mz);
    let rows = table.rows_in_range(lower, upper);
    match rows.len() {
        0 => MatchResult::NoMatch,
        1 => MatchResult::UniqueMatch(rows.start),
        _ => MatchResult::AmbiguousMatch(rows.collect()),
    }
}

fn nearest_row(table: &FeatureTable, rows: impl Iterator<Item = usize>, mz: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for row in rows {
        let Some(feature) = table.get(row) else {
            continue;
        };
        let distance = (feature.representative_mz() - mz).abs();
        match best {
            // strict: the first (lowest) row wins ties
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((row, distance)),
        }
    }
    best.map(|(row, _)| row)
}
