//! # Intensity Imputation
//!
//! Turns an [`AlignedTable`] into a dense [`FilledTable`] so that every
//! feature has an extracted ion chromatogram of the same length.
//!
//! Each row is filled in two phases:
//!
//! 1. Gaps strictly inside the data region (between the first and the last
//!    observed scan) are interpolated with the configured
//!    [`InterpolationMethod`].
//! 2. The remaining leading and trailing cells get a noisy baseline drawn
//!    uniformly from `[min * (1 - spread), min * (1 + spread)]`, where `min`
//!    is the row minimum after phase 1, rounded to two decimals.
//!
//! The random source is passed in by the caller; seeding it makes runs
//! reproducible.
//!
//! ```rust
//! use dbdi::impute::{impute_intensities, ImputeConfig};
//! use dbdi::table::AlignedTable;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let table = AlignedTable::new(vec![100.0], 4, vec![None, Some(10.0), None, Some(20.0)])?;
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let filled = impute_intensities(&table, &ImputeConfig::default(), &mut rng)?;
//!
//! assert_eq!(filled.get(0, 2), Some(15.0));
//! let baseline = filled.get(0, 0).unwrap();
//! assert!((9.9..=10.1).contains(&baseline));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;

use log::{debug, info};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

pub use config::{ImputeConfig, InterpolationMethod, DEFAULT_BASELINE_SPREAD};
pub use error::ImputeError;

use crate::table::{feature_id, AlignedTable, FilledTable};

/// Fill every missing cell of `table`.
///
/// Row order, identifiers and `mean_mz` are preserved.
pub fn impute_intensities<R: Rng + ?Sized>(
    table: &AlignedTable,
    config: &ImputeConfig,
    rng: &mut R,
) -> Result<FilledTable, ImputeError> {
    config.validate()?;

    let mut values = Vec::with_capacity(table.n_features() * table.n_scans());
    let mut interpolated = 0;
    let mut baseline = 0;

    for row in 0..table.n_features() {
        let mut cells = table.row(row).to_vec();
        let Some((first, last)) = data_region(&cells) else {
            return Err(ImputeError::EmptyRow {
                feature: feature_id(row),
            });
        };

        interpolated += interpolate_region(&mut cells[first..=last], config.method);
        let (filled, drawn) = fill_baseline(&cells, config.baseline_spread, rng);
        baseline += drawn;
        values.extend(filled);
    }

    debug!(
        "Imputation ({}): {} cells interpolated, {} baseline cells",
        config.method, interpolated, baseline
    );
    info!(
        "Imputed {} of {} cells across {} features",
        interpolated + baseline,
        values.len(),
        table.n_features()
    );

    Ok(FilledTable::new(
        table.mean_mz_values().to_vec(),
        table.n_scans(),
        values,
    )?)
}

/// Indices of the first and last observed cell
fn data_region(cells: &[Option<f64>]) -> Option<(usize, usize)> {
    let first = cells.iter().position(Option::is_some)?;
    let last = cells.iter().rposition(Option::is_some)?;
    Some((first, last))
}

/// Interpolate the gaps of a region that starts and ends with an observed
/// value. Returns the number of filled cells.
fn interpolate_region(region: &mut [Option<f64>], method: InterpolationMethod) -> usize {
    let mut filled = 0;
    let mut left = 0;

    while left < region.len() {
        let Some(right) = (left + 1..region.len()).find(|&i| region[i].is_some()) else {
            break;
        };
        if let (Some(lo), Some(hi)) = (region[left], region[right]) {
            let span = (right - left) as f64;
            for k in left + 1..right {
                let value = match method {
                    InterpolationMethod::Linear => lo + (hi - lo) * (k - left) as f64 / span,
                    InterpolationMethod::Nearest => {
                        if k - left <= right - k {
                            lo
                        } else {
                            hi
                        }
                    }
                    InterpolationMethod::Pad => lo,
                };
                region[k] = Some(value);
                filled += 1;
            }
        }
        left = right;
    }

    filled
}

/// Replace the remaining missing cells with baseline noise around the row
/// minimum. Returns the dense row and the number of drawn cells.
fn fill_baseline<R: Rng + ?Sized>(cells: &[Option<f64>], spread: f64, rng: &mut R) -> (Vec<f64>, usize) {
    let min = cells
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);

    let a = min * (1.0 - spread);
    let b = min * (1.0 + spread);
    let band = Uniform::new_inclusive(a.min(b), a.max(b));

    let mut drawn = 0;
    let row = cells
        .iter()
        .map(|cell| match cell {
            Some(value) => *value,
            None => {
                drawn += 1;
                round2(band.sample(rng))
            }
        })
        .collect();
    (row, drawn)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn impute_row(cells: Vec<Option<f64>>, method: InterpolationMethod) -> Vec<f64> {
        let n = cells.len();
        let table = AlignedTable::new(vec![100.0], n, cells).unwrap();
        let config = ImputeConfig::default().with_method(method);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        impute_intensities(&table, &config, &mut rng).unwrap().row(0).to_vec()
    }

    #[test]
    fn test_linear_interpolation() {
        let row = impute_row(
            vec![Some(10.0), None, None, Some(40.0), None, Some(50.0)],
            InterpolationMethod::Linear,
        );
        assert_eq!(row, vec![10.0, 20.0, 30.0, 40.0, 45.0, 50.0]);
    }

    #[test]
    fn test_nearest_prefers_earlier_on_tie() {
        let row = impute_row(
            vec![Some(1.0), None, Some(3.0), None, None, Some(9.0)],
            InterpolationMethod::Nearest,
        );
        assert_eq!(row, vec![1.0, 1.0, 3.0, 3.0, 9.0, 9.0]);
    }

    #[test]
    fn test_pad_carries_forward() {
        let row = impute_row(
            vec![Some(5.0), None, None, Some(8.0)],
            InterpolationMethod::Pad,
        );
        assert_eq!(row, vec![5.0, 5.0, 5.0, 8.0]);
    }

    #[test]
    fn test_baseline_outside_data_region() {
        let row = impute_row(
            vec![None, None, Some(200.0), None, Some(400.0), None],
            InterpolationMethod::Linear,
        );
        assert_eq!(row[2..5], [200.0, 300.0, 400.0]);
        for &value in [row[0], row[1], row[5]].iter() {
            assert!((198.0..=202.0).contains(&value), "baseline {value} outside band");
            assert_eq!(round2(value), value);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let table = AlignedTable::new(
            vec![100.0, 200.0],
            4,
            vec![None, Some(50.0), None, None, Some(7.0), None, None, Some(3.0)],
        )
        .unwrap();
        let config = ImputeConfig::default();

        let a = impute_intensities(&table, &config, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = impute_intensities(&table, &config, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.mean_mz_values(), table.mean_mz_values());
        assert_eq!(a.n_scans(), 4);
    }

    #[test]
    fn test_zero_spread_fills_with_minimum() {
        let table = AlignedTable::new(vec![100.0], 3, vec![Some(4.25), Some(8.0), None]).unwrap();
        let config = ImputeConfig::default().with_baseline_spread(0.0);
        let filled = impute_intensities(&table, &config, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(filled.row(0), &[4.25, 8.0, 4.25]);
    }

    #[test]
    fn test_empty_row_is_rejected() {
        let table = AlignedTable::new(vec![100.0, 200.0], 2, vec![Some(1.0), Some(2.0), None, None]).unwrap();
        let err = impute_intensities(&table, &ImputeConfig::default(), &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(err, ImputeError::EmptyRow { feature } if feature == "ID2"));
    }

    #[test]
    fn test_complete_table_is_unchanged() {
        let table = AlignedTable::new(vec![100.0], 2, vec![Some(1.5), Some(2.5)]).unwrap();
        let filled =
            impute_intensities(&table, &ImputeConfig::default(), &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(filled.row(0), &[1.5, 2.5]);
    }
}
