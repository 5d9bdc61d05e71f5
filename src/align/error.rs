/// Errors that can occur during spectral alignment
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// No scans were supplied
    #[error("Invalid input: the scan sequence is empty")]
    EmptyInput,

    /// A scan without any peaks was supplied
    #[error("Invalid input: scan at position {position} carries no peaks")]
    EmptyScan {
        /// 1-based position of the offending scan in the input sequence
        position: usize,
    },

    /// A peak with a non-finite or non-positive m/z, or a non-finite intensity
    #[error("Invalid input: peak {peak} of scan at position {position} is malformed (m/z {mz}, intensity {intensity})")]
    InvalidPeak {
        /// 1-based position of the scan in the input sequence
        position: usize,
        /// 0-based peak index within the scan
        peak: usize,
        /// Offending m/z value
        mz: f64,
        /// Offending intensity value
        intensity: f64,
    },

    /// A scan carries the same m/z twice
    #[error("Invalid input: peak {peak} of scan at position {position} repeats m/z {mz} of peak {first}")]
    DuplicatePeak {
        /// 1-based position of the scan in the input sequence
        position: usize,
        /// 0-based index of the first peak with this m/z
        first: usize,
        /// 0-based index of the repeating peak
        peak: usize,
        /// Repeated m/z value
        mz: f64,
    },

    /// The ppm window is not a positive, finite number
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),
}
