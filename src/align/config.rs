use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::AlignError;

/// Default alignment window in ppm
pub const DEFAULT_PPM_WINDOW: f64 = 2.0;

/// Relative mass tolerance in parts-per-million.
///
/// The window for a candidate mass `m` is `m ± ppm·1e-6·m`, always taken
/// relative to the candidate (incoming peak) mass.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PpmTolerance(f64);

impl PpmTolerance {
    /// Create a tolerance, rejecting non-finite and non-positive windows
    pub fn new(ppm: f64) -> Result<Self, AlignError> {
        if !ppm.is_finite() {
            return Err(AlignError::InvalidTolerance(format!(
                "ppm window must be finite, got {ppm}"
            )));
        }
        if ppm <= 0.0 {
            return Err(AlignError::InvalidTolerance(format!(
                "ppm window must be > 0, got {ppm}"
            )));
        }
        Ok(Self(ppm))
    }

    /// The window width in ppm
    pub fn ppm(&self) -> f64 {
        self.0
    }

    /// Absolute half-width of the window around `mz`, in Da
    pub fn half_width(&self, mz: f64) -> f64 {
        self.0 * 1e-6 * mz
    }

    /// Inclusive `(lower, upper)` bounds of the window around `mz`
    pub fn bounds(&self, mz: f64) -> (f64, f64) {
        let delta = self.half_width(mz);
        (mz - delta, mz + delta)
    }

    /// Whether `other` falls within the window centred on `reference`
    pub fn contains(&self, reference: f64, other: f64) -> bool {
        let (lower, upper) = self.bounds(reference);
        other >= lower && other <= upper
    }
}

impl Default for PpmTolerance {
    fn default() -> Self {
        Self(DEFAULT_PPM_WINDOW)
    }
}

impl TryFrom<f64> for PpmTolerance {
    type Error = AlignError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PpmTolerance> for f64 {
    fn from(value: PpmTolerance) -> Self {
        value.0
    }
}

impl FromStr for PpmTolerance {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| {
            AlignError::InvalidTolerance(format!("ppm window is not numeric: '{s}'"))
        })?;
        Self::new(value)
    }
}

impl fmt::Display for PpmTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ppm", self.0)
    }
}

/// Which driver folds scans into the feature table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Peak-by-peak fold in acquisition order (reference semantics)
    #[default]
    Sequential,
    /// One matching pass per scan against the table snapshot taken at scan
    /// start. Faster, but peaks of the same scan do not see each other.
    Batch,
}

impl FromStr for AlignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "batch" | "vectorized" => Ok(Self::Batch),
            other => Err(format!("unknown alignment mode '{other}'")),
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignMode::Sequential => write!(f, "sequential"),
            AlignMode::Batch => write!(f, "batch"),
        }
    }
}

/// What happens when two peaks of one scan resolve to the same feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The peak closer to the feature's representative mass keeps the cell;
    /// the other peak starts a new feature. On equal distance the earlier
    /// peak stays. Every input peak ends up in exactly one cell.
    #[default]
    NearestWins,
    /// The later peak overwrites intensity and recorded mass of the earlier
    /// one. The overwritten peak is lost.
    LastWriteWins,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "nearest-wins" => Ok(Self::NearestWins),
            "last-write" | "last-write-wins" | "overwrite" => Ok(Self::LastWriteWins),
            other => Err(format!("unknown collision policy '{other}'")),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::NearestWins => write!(f, "nearest-wins"),
            CollisionPolicy::LastWriteWins => write!(f, "last-write-wins"),
        }
    }
}

/// Configuration for an alignment run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignConfig {
    /// Mass tolerance window
    pub tolerance: PpmTolerance,
    /// Folding driver
    pub mode: AlignMode,
    /// Within-scan collision handling (sequential mode only; the batch
    /// driver always overwrites)
    pub collision: CollisionPolicy,
}

impl AlignConfig {
    /// Configuration with the given ppm window and default driver settings
    pub fn new(ppm_window: f64) -> Result<Self, AlignError> {
        Ok(Self {
            tolerance: PpmTolerance::new(ppm_window)?,
            ..Default::default()
        })
    }

    /// Select the folding driver
    pub fn with_mode(mut self, mode: AlignMode) -> Self {
        self.mode = mode;
        self
    }

    /// Select the collision policy
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }
}
