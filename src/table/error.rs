/// Errors that can occur while building, converting or reading tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader or writer
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The input does not follow the aligned-table layout
    #[error("Invalid table format: {0}")]
    InvalidFormat(String),

    /// Cell buffer length does not match the declared shape
    #[error("Shape mismatch: expected {expected} cells, got {actual}")]
    ShapeMismatch {
        /// Number of cells implied by the declared shape
        expected: usize,
        /// Number of cells supplied
        actual: usize,
    },

    /// A dense table was requested but a cell is missing
    #[error("Missing value for feature {feature} in scan{scan}")]
    MissingValue {
        /// Feature identifier (`IDn`)
        feature: String,
        /// 1-based scan column
        scan: usize,
    },
}
