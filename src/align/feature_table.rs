//! Growable, mass-ordered collection of features.
//!
//! Rows are kept sorted by representative m/z at all times: insertions use a
//! binary-searched insertion point, and [`FeatureTable::refresh`] re-sorts
//! after representative masses are recomputed at the end of each scan.

use std::ops::Range;

use crate::spectrum::Peak;

/// One peak assigned to a feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// 1-based scan column the peak was recorded in
    pub scan: usize,
    /// Observed m/z of the peak
    pub mz: f64,
    /// Observed intensity of the peak
    pub intensity: f64,
}

impl Observation {
    /// The observation as a plain peak
    pub fn peak(&self) -> Peak {
        Peak::new(self.mz, self.intensity)
    }
}

/// A putative chemical species: one row of the feature table
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    representative_mz: f64,
    // ascending by scan, at most one entry per scan
    observations: Vec<Observation>,
}

impl Feature {
    fn new(scan: usize, peak: Peak) -> Self {
        Self {
            representative_mz: peak.mz,
            observations: vec![Observation {
                scan,
                mz: peak.mz,
                intensity: peak.intensity,
            }],
        }
    }

    /// Current best estimate of the feature's mass
    pub fn representative_mz(&self) -> f64 {
        self.representative_mz
    }

    /// All peaks assigned to this feature, ordered by scan
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// History of masses contributing to the representative mass
    pub fn observed_masses(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.mz)
    }

    /// Observation recorded for `scan`, if any
    pub fn observation(&self, scan: usize) -> Option<&Observation> {
        self.observations
            .binary_search_by_key(&scan, |o| o.scan)
            .ok()
            .map(|i| &self.observations[i])
    }

    /// Intensity recorded for `scan`, `None` when the feature was not seen
    pub fn intensity(&self, scan: usize) -> Option<f64> {
        self.observation(scan).map(|o| o.intensity)
    }

    /// Record a peak for `scan`. Returns the observation it replaced when the
    /// feature already held a value for that scan.
    fn record(&mut self, scan: usize, peak: Peak) -> Option<Observation> {
        let observation = Observation {
            scan,
            mz: peak.mz,
            intensity: peak.intensity,
        };
        match self.observations.binary_search_by_key(&scan, |o| o.scan) {
            Ok(i) => Some(std::mem::replace(&mut self.observations[i], observation)),
            Err(i) => {
                self.observations.insert(i, observation);
                None
            }
        }
    }

    /// Recompute the representative mass from the full mass history
    fn recompute_mean(&mut self) {
        let sum: f64 = self.observed_masses().sum();
        self.representative_mz = sum / self.observations.len() as f64;
    }
}

/// Mutable, mass-ordered feature collection owned by one alignment run
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    features: Vec<Feature>,
    scan_count: usize,
}

impl FeatureTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of features (rows)
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no feature has been created yet
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of scan columns opened so far
    pub fn scan_count(&self) -> usize {
        self.scan_count
    }

    /// Features in ascending representative-mass order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Feature at row `index`
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Total number of recorded observations (non-missing cells)
    pub fn observation_count(&self) -> usize {
        self.features.iter().map(|f| f.observations.len()).sum()
    }

    /// Open the next scan column and return its 1-based index
    pub(crate) fn open_scan(&mut self) -> usize {
        self.scan_count += 1;
        self.scan_count
    }

    /// Rows whose representative mass lies in `[lower, upper]`
    pub fn rows_in_range(&self, lower: f64, upper: f64) -> Range<usize> {
        let start = self
            .features
            .partition_point(|f| f.representative_mz < lower);
        let end = self
            .features
            .partition_point(|f| f.representative_mz <= upper);
        start..end.max(start)
    }

    /// Create a new feature from `peak`, keeping mass order. Returns its row.
    pub fn insert(&mut self, scan: usize, peak: Peak) -> usize {
        let row = self
            .features
            .partition_point(|f| f.representative_mz <= peak.mz);
        self.features.insert(row, Feature::new(scan, peak));
        row
    }

    /// Record `peak` for `scan` on the feature at `row`. Returns the
    /// observation it replaced, if the feature already held one for `scan`.
    ///
    /// The representative mass is left untouched until [`refresh`](Self::refresh).
    pub fn update(&mut self, row: usize, scan: usize, peak: Peak) -> Option<Observation> {
        self.features[row].record(scan, peak)
    }

    /// Recompute every representative mass as the mean of its mass history
    /// and restore mass order.
    pub fn refresh(&mut self) {
        for feature in &mut self.features {
            feature.recompute_mean();
        }
        // stable: equal masses keep their creation order
        self.features
            .sort_by(|a, b| a.representative_mz.total_cmp(&b.representative_mz));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut table = FeatureTable::new();
        let scan = table.open_scan();
        table.insert(scan, Peak::new(300.0, 1.0));
        table.insert(scan, Peak::new(100.0, 1.0));
        let row = table.insert(scan, Peak::new(200.0, 1.0));

        assert_eq!(row, 1);
        let masses: Vec<f64> = table.features().iter().map(|f| f.representative_mz()).collect();
        assert_eq!(masses, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_update_overwrites_within_scan() {
        let mut table = FeatureTable::new();
        let scan = table.open_scan();
        let row = table.insert(scan, Peak::new(100.0, 5.0));

        let replaced = table.update(row, scan, Peak::new(100.0002, 7.0));
        assert_eq!(replaced.map(|o| o.intensity), Some(5.0));

        let feature = table.get(row).unwrap();
        assert_eq!(feature.observations().len(), 1);
        assert_eq!(feature.intensity(scan), Some(7.0));
    }

    #[test]
    fn test_refresh_recomputes_mean() {
        let mut table = FeatureTable::new();
        let first = table.open_scan();
        let row = table.insert(first, Peak::new(100.0, 1.0));
        let second = table.open_scan();
        table.update(row, second, Peak::new(100.002, 1.0));

        // untouched before refresh
        assert_eq!(table.get(row).unwrap().representative_mz(), 100.0);
        table.refresh();
        assert!((table.get(row).unwrap().representative_mz() - 100.001).abs() < 1e-9);
        assert_eq!(table.get(row).unwrap().intensity(first), Some(1.0));
        assert_eq!(table.get(row).unwrap().intensity(3), None);
    }

    #[test]
    fn test_rows_in_range() {
        let mut table = FeatureTable::new();
        let scan = table.open_scan();
        for mz in [100.0, 100.001, 100.002, 100.01] {
            table.insert(scan, Peak::new(mz, 1.0));
        }
        assert_eq!(table.rows_in_range(100.0005, 100.0025), 1..3);
        assert_eq!(table.rows_in_range(99.0, 99.5), 0..0);
        assert_eq!(table.rows_in_range(100.0, 100.01), 0..4);
    }
}
