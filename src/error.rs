//! Error types for k-nearest-neighbor classification.

/// Error type for all fallible operations in this crate.
///
/// Every variant describes a malformed input. Errors are raised before any
/// query is processed, so a failed call never yields partial predictions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KnnError {
    /// Returned when k is zero or exceeds the number of training rows.
    ///
    /// An empty training set always lands here since no valid k exists.
    #[error("k must be in 1..={n}, got {k}")]
    InvalidK {
        /// The requested number of neighbors.
        k: usize,
        /// Number of training rows.
        n: usize,
    },

    /// Returned when a per-row training vector does not have one entry per row.
    #[error("{input} length {len} does not match training rows {expected}")]
    LengthMismatch {
        /// Name of the offending input.
        input: &'static str,
        /// Its length.
        len: usize,
        /// Number of training rows.
        expected: usize,
    },

    /// Returned when query and training feature counts differ.
    #[error("query dimension {query} does not match training dimension {train}")]
    DimensionMismatch {
        /// Training feature count.
        train: usize,
        /// Query feature count.
        query: usize,
    },

    /// Returned when a neighbor index points past the end of the label vector.
    #[error("neighbor index {index} out of range for {len} training rows")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of labels.
        len: usize,
    },

    /// Returned when the training set has zero features per row.
    #[error("feature vectors must have at least one dimension")]
    EmptyFeatures,

    /// Returned when an input contains NaN or infinity.
    #[error("non-finite value in {input}")]
    NonFiniteInput {
        /// Name of the input containing the non-finite value.
        input: &'static str,
    },
}

/// Convenience alias used by every fallible function in the crate.
pub type Result<T> = std::result::Result<T, KnnError>;
