//! # dbdi - Direct-Infusion MS1 Data Curation
//!
//! `dbdi` turns a series of independently acquired MS1 scans from a
//! direct-infusion (DBDI-MS) run into a feature × scan intensity matrix and
//! curates it for downstream statistics.
//!
//! ## Key Features
//!
//! - **Spectral Alignment**: peaks from successive scans are merged into
//!   features when their m/z agrees within a relative (ppm) window; each
//!   feature's mass is the running mean of the masses assigned to it.
//!
//! - **Typed Missing Values**: a feature absent from a scan is `None`, never
//!   a floating-point sentinel.
//!
//! - **Reproducible Imputation**: interpolation inside each trace's data
//!   region plus a noisy baseline drawn from an explicitly seeded generator.
//!
//! - **Adduct Detection**: correlated traces whose mass difference matches a
//!   known adduct or in-source fragment.
//!
//! ## Quick Start
//!
//! ```rust
//! use dbdi::align::{align_scans, AlignConfig};
//! use dbdi::impute::{impute_intensities, ImputeConfig};
//! use dbdi::spectrum::ScanBuilder;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let scans = vec![
//!     ScanBuilder::new(1).add_peak(100.0000, 10.0).add_peak(250.0, 3.0).build(),
//!     ScanBuilder::new(2).add_peak(100.0002, 12.0).build(),
//!     ScanBuilder::new(3).add_peak(100.0001, 11.0).add_peak(250.0001, 4.0).build(),
//! ];
//!
//! let alignment = align_scans(&scans, &AlignConfig::new(5.0)?)?;
//! assert_eq!(alignment.table.n_features(), 2);
//! assert_eq!(alignment.table.get(1, 1), None);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let filled = impute_intensities(&alignment.table, &ImputeConfig::default(), &mut rng)?;
//! assert_eq!(filled.get(1, 1), Some(3.5));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`spectrum`]: input scans and peaks
//! - [`align`]: tolerance matcher, feature table and alignment drivers
//! - [`table`]: aligned and filled feature matrices, CSV interchange
//! - [`impute`]: two-phase imputation
//! - [`adducts`]: correlation-based adduct and fragment search
//! - [`traces`]: trace selection for plotting
//! - [`export`]: tables back to per-scan peak lists
//! - [`io`]: MGF reader and writer

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod adducts;
pub mod align;
pub mod export;
pub mod impute;
pub mod io;
pub mod spectrum;
pub mod table;
pub mod traces;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::adducts::{
        identify_adducts, identify_adducts_with_masses, AdductError, AdductReport, AdductRule,
        AdductSearch, CorrelationMethod, RuleLibrary,
    };
    pub use crate::align::{
        align_scans, AlignConfig, AlignError, AlignMode, AlignStats, Aligner, Alignment,
        CollisionPolicy, PpmTolerance,
    };
    pub use crate::export::export_to_spectra;
    pub use crate::impute::{impute_intensities, ImputeConfig, ImputeError, InterpolationMethod};
    pub use crate::io::{read_mgf_file, write_mgf_file, MgfError};
    pub use crate::spectrum::{Peak, Scan, ScanBuilder};
    pub use crate::table::{AlignedTable, FilledTable, IntensityMatrix, TableError, TableSummary};
    pub use crate::traces::{select_traces, TraceError, TraceSet, TraceTransform};
}
