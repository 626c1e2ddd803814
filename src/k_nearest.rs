//! Batch k-nearest-neighbor classification with Euclidean distance.
//!
//! Each query runs through three stages:
//!
//! ```text
//! classify_query()
//!   ├─ expanded_sq_distances()   (distance.rs)
//!   ├─ select_k_smallest()       (select.rs)
//!   └─ majority_vote()           (vote.rs)
//! ```
//!
//! Queries are independent, so a batch is spread over the rayon pool with one
//! [`KnnScratch`] per worker. Every input check runs before the first query,
//! and a rejected call produces no predictions at all.
//!
//! # Example
//!
//! ```
//! use knn_euclid::{knn_euclidean, squared_norms};
//! use ndarray::array;
//!
//! let train = array![[0.0, 0.0], [1.0, 1.0], [5.0, 5.0]];
//! let labels = [0, 0, 1];
//! let queries = array![[0.1, 0.1], [4.0, 4.5]];
//!
//! let train_sq = squared_norms(train.view());
//! let predicted = knn_euclidean(train.view(), train_sq.view(), &labels, queries.view(), 1).unwrap();
//! assert_eq!(predicted, vec![0, 1]);
//! ```

pub mod classifier;
pub mod config;
pub mod distance;
pub mod select;
pub mod vote;

use log::debug;
use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

pub use classifier::KnnClassifier;
pub use config::KnnConfig;
pub use distance::{direct_sq_distance, expanded_sq_distances, squared_norm, squared_norms};
pub use select::select_k_smallest;
pub use vote::{majority_vote, vote_counts};

use crate::error::{KnnError, Result};

/// Per-worker buffers for one query at a time.
///
/// Both vectors are overwritten for every query, so reusing a scratch across
/// queries (or across training sets of different sizes) never leaks state.
#[derive(Debug, Clone, Default)]
pub struct KnnScratch {
    /// Squared distance to every training row.
    pub(crate) dists: Vec<f64>,
    /// Permutation of training row indices, k nearest first.
    pub(crate) indices: Vec<usize>,
}

impl KnnScratch {
    /// Creates scratch buffers sized for `n_train` training rows.
    pub fn new(n_train: usize) -> Self {
        Self {
            dists: Vec::with_capacity(n_train),
            indices: Vec::with_capacity(n_train),
        }
    }
}

fn check_finite<'a>(
    values: impl IntoIterator<Item = &'a f64>,
    input: &'static str,
) -> Result<()> {
    if values.into_iter().any(|v| !v.is_finite()) {
        return Err(KnnError::NonFiniteInput { input });
    }
    Ok(())
}

/// Validates the training side of a call against `k`.
pub(crate) fn validate_training<L>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    labels: &[L],
    k: usize,
) -> Result<()> {
    let n = train.nrows();
    KnnConfig::new(k).validate(n)?;
    if labels.len() != n {
        return Err(KnnError::LengthMismatch {
            input: "labels",
            len: labels.len(),
            expected: n,
        });
    }
    if train_sq.len() != n {
        return Err(KnnError::LengthMismatch {
            input: "squared norms",
            len: train_sq.len(),
            expected: n,
        });
    }
    if train.ncols() == 0 {
        return Err(KnnError::EmptyFeatures);
    }
    check_finite(train.iter(), "training data")?;
    check_finite(train_sq.iter(), "squared norms")
}

/// Validates the query side of a call against a training set of `dim` features.
///
/// Finite coordinates can still overflow `‖q‖²`, which would turn every
/// distance into infinity or NaN, so the norm of each query is checked too.
pub(crate) fn validate_queries(queries: ArrayView2<f64>, dim: usize) -> Result<()> {
    if queries.ncols() != dim {
        return Err(KnnError::DimensionMismatch {
            train: dim,
            query: queries.ncols(),
        });
    }
    check_finite(queries.iter(), "queries")?;
    if queries.rows().into_iter().any(|q| !squared_norm(q).is_finite()) {
        return Err(KnnError::NonFiniteInput {
            input: "query squared norms",
        });
    }
    Ok(())
}

/// Distance and selection stages: returns the indices of the `k` nearest rows.
pub(crate) fn nearest<'s>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    query: ArrayView1<f64>,
    k: usize,
    scratch: &'s mut KnnScratch,
) -> Result<&'s [usize]> {
    scratch.dists.clear();
    scratch.dists.resize(train.nrows(), 0.0);
    expanded_sq_distances(query, train, train_sq, &mut scratch.dists)?;
    select_k_smallest(&scratch.dists, k, &mut scratch.indices)
}

/// Full pipeline for one already-validated query.
pub(crate) fn classify_query<L: Ord + Clone>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    labels: &[L],
    query: ArrayView1<f64>,
    k: usize,
    scratch: &mut KnnScratch,
) -> Result<L> {
    let neighbors = nearest(train, train_sq, query, k, scratch)?;
    majority_vote(labels, neighbors)
}

/// Classifies every row of `queries` by majority vote among its `k` nearest
/// training rows.
///
/// # Arguments
///
/// * `train` — training matrix `[n × d]`
/// * `train_sq` — squared norm of every training row `[n]`, see [`squared_norms`]
/// * `labels` — label of every training row `[n]`
/// * `queries` — query matrix `[m × d]`
/// * `k` — number of voting neighbors, `1..=n`
///
/// Returns one label per query, in query order. Queries run in parallel.
///
/// # Errors
///
/// Returns [`KnnError`] if `k` is out of range, the per-row vectors do not
/// match the training rows, the query and training dimensions differ, any
/// input holds NaN or infinity, or a query's squared norm overflows `f64`.
pub fn knn_euclidean<L>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    labels: &[L],
    queries: ArrayView2<f64>,
    k: usize,
) -> Result<Vec<L>>
where
    L: Ord + Clone + Send + Sync,
{
    knn_euclidean_with_config(train, train_sq, labels, queries, &KnnConfig::new(k))
}

/// Same as [`knn_euclidean`], with the scheduling taken from `config`.
///
/// The sequential and parallel paths produce identical predictions.
pub fn knn_euclidean_with_config<L>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    labels: &[L],
    queries: ArrayView2<f64>,
    config: &KnnConfig,
) -> Result<Vec<L>>
where
    L: Ord + Clone + Send + Sync,
{
    let k = config.k();
    validate_training(train, train_sq, labels, k)
        .and_then(|()| validate_queries(queries, train.ncols()))
        .inspect_err(|e| debug!("rejected k-NN batch: {e}"))?;

    classify_batch(train, train_sq, labels, queries, config)
}

/// Batch driver over already-validated inputs.
pub(crate) fn classify_batch<L>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    labels: &[L],
    queries: ArrayView2<f64>,
    config: &KnnConfig,
) -> Result<Vec<L>>
where
    L: Ord + Clone + Send + Sync,
{
    let k = config.k();
    let n = train.nrows();
    debug!(
        "classifying {} queries against {} rows x {} features (k={}, parallel={})",
        queries.nrows(),
        n,
        train.ncols(),
        k,
        config.parallel()
    );

    if config.parallel() {
        (0..queries.nrows())
            .into_par_iter()
            .map_init(
                || KnnScratch::new(n),
                |scratch, i| classify_query(train, train_sq, labels, queries.row(i), k, scratch),
            )
            .collect()
    } else {
        let mut scratch = KnnScratch::new(n);
        queries
            .rows()
            .into_iter()
            .map(|query| classify_query(train, train_sq, labels, query, k, &mut scratch))
            .collect()
    }
}

/// Classifies a single query, reusing caller-held buffers.
///
/// Meant for loops that feed queries one at a time; the scratch grows to the
/// largest training set seen and is never shrunk.
///
/// # Errors
///
/// Same conditions as [`knn_euclidean`].
pub fn classify_one_with_scratch<L: Ord + Clone>(
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    labels: &[L],
    query: ArrayView1<f64>,
    k: usize,
    scratch: &mut KnnScratch,
) -> Result<L> {
    validate_training(train, train_sq, labels, k)
        .and_then(|()| validate_queries(query.insert_axis(Axis(0)), train.ncols()))
        .inspect_err(|e| debug!("rejected k-NN query: {e}"))?;
    classify_query(train, train_sq, labels, query, k, scratch)
}
