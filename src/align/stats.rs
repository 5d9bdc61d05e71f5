use std::fmt;

use serde::Serialize;

/// Statistics from a completed alignment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignStats {
    /// Number of scans folded into the table
    pub scans_folded: usize,
    /// Number of input peaks processed
    pub peaks_processed: usize,
    /// Number of features created
    pub features_created: usize,
    /// Peaks that matched exactly one feature
    pub unique_matches: usize,
    /// Peaks that matched several features and were resolved to the nearest
    pub ambiguous_matches: usize,
    /// Peaks that resolved to a feature already holding a value for the scan
    pub collisions: usize,
    /// Peaks whose value was overwritten by a later peak of the same scan
    pub peaks_overwritten: usize,
}

impl fmt::Display for AlignStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Aligned {} scans ({} peaks) into {} features: {} unique, {} ambiguous, {} collisions",
            self.scans_folded,
            self.peaks_processed,
            self.features_created,
            self.unique_matches,
            self.ambiguous_matches,
            self.collisions
        )?;
        if self.peaks_overwritten > 0 {
            write!(f, ", {} overwritten", self.peaks_overwritten)?;
        }
        Ok(())
    }
}
