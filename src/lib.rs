//! Batch k-nearest-neighbor classification.
//!
//! Distances use the expansion `‖a − b‖² = ‖a‖² + ‖b‖² − 2·a·b`, so with the
//! training norms computed once each query/row pair costs one dot product.
//! The k nearest rows are found by partial selection and vote on the label;
//! ties go to the smallest label.
//!
//! | Entry point | Use |
//! |-------------|-----|
//! | [`knn_euclidean`] | borrowed arrays and precomputed norms |
//! | [`knn_euclidean_with_config`] | same, with sequential/parallel choice |
//! | [`classify_one_with_scratch`] | one query at a time, reused buffers |
//! | [`KnnClassifier`] | owns the training set and caches its norms |

pub mod error;
pub mod k_nearest;

pub use error::{KnnError, Result};
pub use k_nearest::{
    classify_one_with_scratch, direct_sq_distance, expanded_sq_distances, knn_euclidean,
    knn_euclidean_with_config, majority_vote, select_k_smallest, squared_norm, squared_norms,
    vote_counts, KnnClassifier, KnnConfig, KnnScratch,
};
