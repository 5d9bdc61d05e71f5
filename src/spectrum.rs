//! # Scan Data Model
//!
//! Input types for the alignment engine. A [`Scan`] is one independently
//! acquired MS1 spectrum, an ordered list of already-picked [`Peak`]s kept in
//! acquisition order (not necessarily sorted by m/z).
//!
//! Scans are read-only inputs: the aligner borrows them and never mutates or
//! retains them.

use serde::{Deserialize, Serialize};

/// A single centroided peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Peak intensity
    pub intensity: f64,
}

impl Peak {
    /// Create a new peak
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }

    /// A peak is usable for alignment when its m/z is finite and positive
    /// and its intensity is finite.
    pub fn is_valid(&self) -> bool {
        self.mz.is_finite() && self.mz > 0.0 && self.intensity.is_finite()
    }
}

impl From<(f64, f64)> for Peak {
    fn from((mz, intensity): (f64, f64)) -> Self {
        Self { mz, intensity }
    }
}

/// One MS1 scan of a direct-infusion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// 1-based scan index within the run
    pub index: usize,
    /// Optional title carried over from the source file
    pub title: Option<String>,
    /// Retention time in seconds, when the source file provides one
    pub retention_time: Option<f64>,
    /// Peaks in acquisition order
    pub peaks: Vec<Peak>,
}

impl Scan {
    /// Create a scan from its index and peak list
    pub fn new(index: usize, peaks: Vec<Peak>) -> Self {
        Self {
            index,
            title: None,
            retention_time: None,
            peaks,
        }
    }

    /// Create a scan from parallel m/z and intensity arrays.
    ///
    /// Extra values in the longer array are ignored.
    pub fn from_arrays(index: usize, mz: &[f64], intensity: &[f64]) -> Self {
        let peaks = mz
            .iter()
            .zip(intensity)
            .map(|(&mz, &intensity)| Peak::new(mz, intensity))
            .collect();
        Self::new(index, peaks)
    }

    /// Number of peaks in this scan
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    /// True when the scan carries no peaks
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Sum of all peak intensities
    pub fn total_ion_current(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity).sum()
    }

    /// Most intense peak, if any
    pub fn base_peak(&self) -> Option<&Peak> {
        self.peaks
            .iter()
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
    }

    /// Sort the peaks by ascending m/z
    pub fn sort_by_mz(&mut self) {
        self.peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    }
}

/// Builder for creating scans
pub struct ScanBuilder {
    scan: Scan,
}

impl ScanBuilder {
    /// Start a new scan with the given 1-based index
    pub fn new(index: usize) -> Self {
        Self {
            scan: Scan::new(index, Vec::new()),
        }
    }

    /// Set the scan title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.scan.title = Some(title.into());
        self
    }

    /// Set the retention time in seconds
    pub fn retention_time(mut self, rt: f64) -> Self {
        self.scan.retention_time = Some(rt);
        self
    }

    /// Append a peak
    pub fn add_peak(mut self, mz: f64, intensity: f64) -> Self {
        self.scan.peaks.push(Peak::new(mz, intensity));
        self
    }

    /// Append many peaks
    pub fn add_peaks(mut self, peaks: impl IntoIterator<Item = Peak>) -> Self {
        self.scan.peaks.extend(peaks);
        self
    }

    /// Finish building
    pub fn build(self) -> Scan {
        self.scan
    }
}
