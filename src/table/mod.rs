//! # Aligned Feature Tables
//!
//! The alignment result is a feature × scan matrix. Rows are features ordered
//! ascending by mean m/z and identified as `ID1..IDn` in that order; columns
//! are scans `scan1..scanN`.
//!
//! Two concrete tables exist:
//!
//! - [`AlignedTable`]: cells are `Option<f64>`; `None` means the feature was
//!   not observed in that scan, which is distinct from a zero intensity.
//! - [`FilledTable`]: dense cells, produced by imputation.
//!
//! Both implement [`IntensityMatrix`], the interface consumed by export,
//! adduct search and trace selection.
//!
//! ## Interchange Layout (CSV)
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | id | String | `ID1..IDn` in row order |
//! | mean_mz | Float64 | Representative mass |
//! | scan1..scanN | Float64 or empty | Intensity, empty when missing |

mod aligned;
mod error;
mod filled;
mod interchange;
mod summary;

pub use aligned::AlignedTable;
pub use error::TableError;
pub use filled::FilledTable;
pub use interchange::write_matrix;
pub use summary::TableSummary;

/// Header of the mass column
pub const MEAN_MZ_COLUMN: &str = "mean_mz";
/// Header of the feature id column
pub const ID_COLUMN: &str = "id";

/// Identifier of the feature at 0-based `row` (`ID1` for row 0)
pub fn feature_id(row: usize) -> String {
    format!("ID{}", row + 1)
}

/// Parse an `IDn` identifier back into a 0-based row
pub fn parse_feature_id(id: &str) -> Option<usize> {
    let n: usize = id.trim().strip_prefix("ID")?.parse().ok()?;
    n.checked_sub(1)
}

/// Header of the 0-based scan `column` (`scan1` for column 0)
pub fn scan_column_name(column: usize) -> String {
    format!("scan{}", column + 1)
}

/// Read access to a feature × scan intensity matrix.
///
/// Rows and columns are 0-based here; identifiers and headers are 1-based.
pub trait IntensityMatrix {
    /// Number of feature rows
    fn n_features(&self) -> usize;

    /// Number of scan columns
    fn n_scans(&self) -> usize;

    /// Representative mass of `row`
    fn mean_mz(&self, row: usize) -> f64;

    /// Intensity at (`row`, `column`), `None` when missing
    fn intensity(&self, row: usize, column: usize) -> Option<f64>;

    /// Identifier of `row`
    fn feature_id(&self, row: usize) -> String {
        feature_id(row)
    }

    /// Row index for an `IDn` identifier, if it exists in this table
    fn row_index_of(&self, id: &str) -> Option<usize> {
        parse_feature_id(id).filter(|&row| row < self.n_features())
    }

    /// Number of missing cells
    fn missing_count(&self) -> usize {
        (0..self.n_features())
            .map(|row| {
                (0..self.n_scans())
                    .filter(|&column| self.intensity(row, column).is_none())
                    .count()
            })
            .sum()
    }

    /// Copy `row` into a dense vector, failing on the first missing cell
    fn dense_row(&self, row: usize) -> Result<Vec<f64>, TableError> {
        (0..self.n_scans())
            .map(|column| {
                self.intensity(row, column)
                    .ok_or_else(|| TableError::MissingValue {
                        feature: self.feature_id(row),
                        scan: column + 1,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_ids() {
        assert_eq!(feature_id(0), "ID1");
        assert_eq!(parse_feature_id("ID1"), Some(0));
        assert_eq!(parse_feature_id("ID42"), Some(41));
        assert_eq!(parse_feature_id("ID0"), None);
        assert_eq!(parse_feature_id("42"), None);
        assert_eq!(scan_column_name(2), "scan3");
    }
}
