/// Errors that can occur during imputation
#[derive(Debug, thiserror::Error)]
pub enum ImputeError {
    /// Interpolation method name not recognised
    #[error("Unknown interpolation method '{0}' (expected linear, nearest or pad)")]
    UnknownMethod(String),

    /// A feature row has no observed value to interpolate or fill from
    #[error("Feature {feature} has no observed intensity")]
    EmptyRow {
        /// Feature identifier (`IDn`)
        feature: String,
    },

    /// Baseline spread outside `[0, 1)`
    #[error("Invalid baseline spread {0}: must be finite and in [0, 1)")]
    InvalidSpread(f64),

    /// The filled table could not be assembled
    #[error(transparent)]
    Table(#[from] crate::table::TableError),
}
