use super::{AlignedTable, IntensityMatrix, TableError};

/// Dense feature × scan matrix without missing cells
#[derive(Debug, Clone, PartialEq)]
pub struct FilledTable {
    mean_mz: Vec<f64>,
    n_scans: usize,
    values: Vec<f64>,
}

impl FilledTable {
    /// Build a table from row masses and row-major values
    pub fn new(mean_mz: Vec<f64>, n_scans: usize, values: Vec<f64>) -> Result<Self, TableError> {
        let expected = mean_mz.len() * n_scans;
        if values.len() != expected {
            return Err(TableError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            mean_mz,
            n_scans,
            values,
        })
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

    /// Value at (`row`, `column`)
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.n_features() || column >= self.n_scans {
            return None;
        }
        Some(self.values[row * self.n_scans + column])
    }

    /// All values of `row` (the feature's XIC)
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.n_features()`.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.n_features(), "row {row} out of range for {} features", self.n_features());
        let start = row * self.n_scans;
        &self.values[start..start + self.n_scans]
    }

    /// Iterate over rows as `(mean_mz, values)`
    pub fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        (0..self.n_features()).map(move |row| (self.mean_mz[row], self.row(row)))
    }
}

impl IntensityMatrix for FilledTable {
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
        0
    }

    fn dense_row(&self, row: usize) -> Result<Vec<f64>, TableError> {
        Ok(self.row(row).to_vec())
    }
}

impl TryFrom<AlignedTable> for FilledTable {
    type Error = TableError;

    fn try_from(table: AlignedTable) -> Result<Self, Self::Error> {
        let mut values = Vec::with_capacity(table.cells().len());
        for row in 0..table.n_features() {
            values.extend(table.dense_row(row)?);
        }
        Self::new(table.mean_mz_values().to_vec(), table.n_scans(), values)
    }
}

impl From<FilledTable> for AlignedTable {
    fn from(table: FilledTable) -> Self {
        AlignedTable {
            mean_mz: table.mean_mz,
            n_scans: table.n_scans,
            cells: table.values.into_iter().map(Some).collect(),
        }
    }
}
