//! # Spectral Feature Alignment
//!
//! Merges a sequence of independently acquired MS1 scans into one feature
//! matrix. Every incoming peak either joins an existing feature whose
//! representative m/z lies within a relative (ppm) window of the peak, or
//! starts a new feature.
//!
//! ## Components
//!
//! - [`match_peak`]: tolerance matcher. Pure lookup returning a
//!   [`MatchResult`]; ambiguous matches resolve to the nearest feature.
//! - [`FeatureTable`]: mass-ordered feature rows with per-scan observations
//!   and running-mean representative masses.
//! - [`Aligner`] / [`align_scans`]: scan-by-scan driver.
//! - [`batch`]: single-pass matching per scan, selected with
//!   [`AlignMode::Batch`].
//!
//! ## Example
//!
//! ```rust
//! use dbdi::align::{align_scans, AlignConfig};
//! use dbdi::spectrum::Scan;
//!
//! let scans = vec![
//!     Scan::from_arrays(1, &[100.0000], &[10.0]),
//!     Scan::from_arrays(2, &[100.0010], &[12.0]),
//!     Scan::from_arrays(3, &[100.0020], &[11.0]),
//! ];
//!
//! let alignment = align_scans(&scans, &AlignConfig::new(50.0)?)?;
//! assert_eq!(alignment.table.n_features(), 1);
//! assert!((alignment.table.mean_mz(0) - 100.001).abs() < 1e-9);
//! # Ok::<(), dbdi::align::AlignError>(())
//! ```

pub mod batch;
mod config;
mod driver;
mod error;
mod feature_table;
mod matcher;
mod stats;


pub use config::{AlignConfig, AlignMode, CollisionPolicy, PpmTolerance, DEFAULT_PPM_WINDOW};
pub use driver::{align_scans, Aligner, AlignerState, Alignment};
pub use error::AlignError;
pub use feature_table::{Feature, FeatureTable, Observation};
pub use matcher::{match_peak, MatchResult};
pub use stats::AlignStats;
