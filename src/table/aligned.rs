use super::{IntensityMatrix, TableError};
use crate::align::FeatureTable;

/// Feature × scan matrix with typed missing cells
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    pub(super) mean_mz: Vec<f64>,
    pub(super) n_scans: usize,
    // row-major, mean_mz.len() * n_scans
    pub(super) cells: Vec<Option<f64>>,
}

impl AlignedTable {
    /// Build a table from row masses and row-major cells
    pub fn new(mean_mz: Vec<f64>, n_scans: usize, cells: Vec<Option<f64>>) -> Result<Self, TableError> {
        let expected = mean_mz.len() * n_scans;
        if cells.len() != expected {
            return Err(TableError::ShapeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            mean_mz,
            n_scans,
            cells,
        })
    }

    pub(crate) fn from_feature_table(table: &FeatureTable) -> Self {
        let n_scans = table.scan_count();
        let mut mean_mz = Vec::with_capacity(table.len());
        let mut cells = vec![None; table.len() * n_scans];

        for (row, feature) in table.features().iter().enumerate() {
            mean_mz.push(feature.representative_mz());
            for observation in feature.observations() {
                cells[row * n_scans + observation.scan - 1] = Some(observation.intensity);
            }
        }

        Self {
            mean_mz,
            n_scans,
            cells,
        }
    }

    /// Number of feature rows
    pub fn n_features(&self) -> usize {
        self.mean_mz.len()
    }

    /// Number of scan columns
    pub fn n_scans(&self) -> usize {
        self.n_scans
    }

    /// Representative mass of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.n_features()`.
    pub fn mean_mz(&self, row: usize) -> f64 {
        self.mean_mz[row]
    }

    /// All representative masses in row order
    pub fn mean_mz_values(&self) -> &[f64] {
        &self.mean_mz
    }

    /// Cell at (`row`, `column`); `None` when missing or out of range
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.n_features() || column >= self.n_scans {
            return None;
        }
        self.cells[row * self.n_scans + column]
    }

    /// All cells of `row`
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.n_features()`.
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        assert!(row < self.n_features(), "row {row} out of range for {} features", self.n_features());
        let start = row * self.n_scans;
        &self.cells[start..start + self.n_scans]
    }

    /// Iterate over rows as `(mean_mz, cells)`
    pub fn rows(&self) -> impl Iterator<Item = (f64, &[Option<f64>])> + '_ {
        (0..self.n_features()).map(move |row| (self.mean_mz[row], self.row(row)))
    }

    /// Cells of scan `column` in row order
    pub fn column(&self, column: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.n_features()).map(move |row| self.get(row, column))
    }

    /// Number of non-missing cells
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when no cell is missing
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Row-major cell buffer
    pub fn cells(&self) -> &[Option<f64>] {
        &self.cells
    }
}

impl IntensityMatrix for AlignedTable {
    fn n_features(&self) -> usize {
        self.n_features()
    }

    fn n_scans(&self) -> usize {
        self.n_scans
    }

    fn mean_mz(&self, row: usize) -> f64 {
        self.mean_mz[row]
    }

    fn intensity(&self, row: usize, column: usize) -> Option<f64> {
        self.get(row, column)
    }

    fn missing_count(&self) -> usize {
        self.cells.len() - self.present_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AlignedTable {
        AlignedTable::new(
            vec![100.0, 200.0],
            3,
            vec![Some(1.0), None, Some(3.0), None, Some(5.0), None],
        )
        .unwrap()
    }

    #[test]
    fn test_shape_checked() {
        let result = AlignedTable::new(vec![100.0], 2, vec![Some(1.0)]);
        assert!(matches!(
            result,
            Err(TableError::ShapeMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_accessors() {
        let table = sample();
        assert_eq!(table.n_features(), 2);
        assert_eq!(table.n_scans(), 3);
        assert_eq!(table.get(0, 2), Some(3.0));
        assert_eq!(table.get(1, 0), None);
        assert_eq!(table.get(5, 0), None);
        assert_eq!(table.row(1), &[None, Some(5.0), None]);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![None, Some(5.0)]);
        assert_eq!(table.present_count(), 3);
        assert_eq!(IntensityMatrix::missing_count(&table), 3);
        assert!(!table.is_complete());
        assert_eq!(table.row_index_of("ID2"), Some(1));
        assert_eq!(table.row_index_of("ID3"), None);
    }

    #[test]
    fn test_rows_without_scans() {
        let table = AlignedTable::new(vec![100.0, 200.0], 0, Vec::new()).unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, 200.0);
        assert!(rows.iter().all(|(_, cells)| cells.is_empty()));
        assert!(table.row(1).is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_row_out_of_range_panics() {
        let table = AlignedTable::new(vec![100.0], 0, Vec::new()).unwrap();
        table.row(1);
    }

    #[test]
    #[should_panic]
    fn test_mean_mz_out_of_range_panics() {
        sample().mean_mz(2);
    }

    #[test]
    fn test_dense_row_reports_missing_cell() {
        let table = sample();
        match table.dense_row(0) {
            Err(TableError::MissingValue { feature, scan }) => {
                assert_eq!(feature, "ID1");
                assert_eq!(scan, 2);
            }
            other => panic!("expected missing value, got {:?}", other),
        }
    }
}
