//! Squared Euclidean distances via the norm expansion
//! `‖a − b‖² = ‖a‖² + ‖b‖² − 2·a·b`.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::error::{KnnError, Result};

/// Returns `Σ v²`.
pub fn squared_norm(v: ArrayView1<f64>) -> f64 {
    v.dot(&v)
}

/// Returns the squared norm of every row of `train`.
///
/// This is the vector [`expanded_sq_distances`] expects as `train_sq`.
pub fn squared_norms(train: ArrayView2<f64>) -> Array1<f64> {
    train.map_axis(Axis(1), squared_norm)
}

/// Fills `out[j]` with the squared distance from `query` to row `j` of `train`.
///
/// ```text
/// out[j] = train_sq[j] + ‖query‖² − 2·(query · train[j])
/// ```
///
/// The query norm is computed once, so each row costs one dot product.
/// Cancellation can leave tiny negative values when the two norms are close;
/// they are kept as-is since only the ranking matters.
///
/// # Errors
///
/// [`KnnError::DimensionMismatch`] if `query` and `train` disagree on the
/// feature count, [`KnnError::LengthMismatch`] if `train_sq` or `out` does not
/// have one entry per training row. `out` is untouched on error.
pub fn expanded_sq_distances(
    query: ArrayView1<f64>,
    train: ArrayView2<f64>,
    train_sq: ArrayView1<f64>,
    out: &mut [f64],
) -> Result<()> {
    if query.len() != train.ncols() {
        return Err(KnnError::DimensionMismatch {
            train: train.ncols(),
            query: query.len(),
        });
    }
    for (input, len) in [("squared norms", train_sq.len()), ("output", out.len())] {
        if len != train.nrows() {
            return Err(KnnError::LengthMismatch {
                input,
                len,
                expected: train.nrows(),
            });
        }
    }

    let query_sq = squared_norm(query);
    for ((o, row), &row_sq) in out.iter_mut().zip(train.rows()).zip(train_sq.iter()) {
        *o = row_sq + query_sq - 2.0 * row.dot(&query);
    }
    Ok(())
}

/// Returns the **squared** Euclidean distance by summing squared differences.
///
/// Slower than the expansion but free of its cancellation error.
///
/// # Errors
///
/// [`KnnError::DimensionMismatch`] if `a` and `b` differ in length.
pub fn direct_sq_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            train: a.len(),
            query: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum())
}
