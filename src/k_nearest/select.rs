//! Partial selection of the k nearest training rows.

use crate::error::{KnnError, Result};

/// Partitions `indices` so its first `k` entries point at the `k` smallest
/// values of `dists`, and returns that prefix.
///
/// `indices` is refilled with `0..dists.len()` first, so it can be reused
/// across queries. Selection runs in expected linear time; neither the prefix
/// nor the remainder is sorted. Distances are compared with
/// [`f64::total_cmp`], and ties at the boundary are broken by the selection's
/// pivoting, which is deterministic for a given input.
///
/// # Errors
///
/// [`KnnError::InvalidK`] unless `1 <= k <= dists.len()`. `indices` is left
/// untouched in that case.
pub fn select_k_smallest<'a>(
    dists: &[f64],
    k: usize,
    indices: &'a mut Vec<usize>,
) -> Result<&'a [usize]> {
    if k == 0 || k > dists.len() {
        return Err(KnnError::InvalidK {
            k,
            n: dists.len(),
        });
    }

    indices.clear();
    indices.extend(0..dists.len());

    if k < dists.len() {
        indices.select_nth_unstable_by(k - 1, |&a, &b| dists[a].total_cmp(&dists[b]));
    }
    Ok(&indices[..k])
}
