use crate::error::{KnnError, Result};

/// Configuration options for a k-NN classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnnConfig {
    /// Number of neighbors that vote on each query.
    k: usize,
    /// Whether queries are spread across the rayon thread pool.
    parallel: bool,
}

impl KnnConfig {
    /// Create a new config for `k` neighbors, processing queries in parallel.
    pub fn new(k: usize) -> Self {
        Self { k, parallel: true }
    }

    /// Process queries on the calling thread instead of the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of neighbors.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Whether the batch runs in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Checks `k` against a training set of `n_train` rows.
    ///
    /// Fails when `k == 0` or `k > n_train`, which also covers an empty
    /// training set.
    pub fn validate(&self, n_train: usize) -> Result<()> {
        if self.k == 0 || self.k > n_train {
            return Err(KnnError::InvalidK {
                k: self.k,
                n: n_train,
            });
        }
        Ok(())
    }
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self::new(1)
    }
}
