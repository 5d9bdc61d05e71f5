/// Errors that can occur during adduct identification
#[derive(Debug, thiserror::Error)]
pub enum AdductError {
    /// The intensity table still contains missing cells
    #[error("Missing value for feature {feature} in scan{scan}; impute the table first")]
    MissingValue {
        /// Feature identifier (`IDn`)
        feature: String,
        /// 1-based scan column
        scan: usize,
    },

    /// The external mass list does not have one entry per feature
    #[error("Dimension mismatch: {features} features but {masses} masses")]
    DimensionMismatch {
        /// Number of feature rows in the table
        features: usize,
        /// Number of supplied masses
        masses: usize,
    },

    /// Correlations need at least two scans
    #[error("At least two scans are required for correlation, found {0}")]
    TooFewScans(usize),

    /// Correlation threshold outside the open interval (0, 1)
    #[error("Invalid correlation threshold {0}: must lie strictly between 0 and 1")]
    InvalidThreshold(f64),

    /// Mass error is not a positive, finite ppm value
    #[error("Invalid mass error {0} ppm: must be positive and finite")]
    InvalidMassError(f64),

    /// Correlation method name not recognised
    #[error("Unknown correlation method '{0}' (expected pearson, spearman or kendall)")]
    UnknownMethod(String),

    /// Custom adduct rules do not follow the `deltamz,motive` layout
    #[error("Adduct rule schema mismatch: {0}")]
    SchemaMismatch(String),

    /// I/O error while reading rules or writing a report
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader or writer
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error while serializing a report to JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
