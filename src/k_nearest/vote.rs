//! Majority vote over the labels of selected neighbors.

use std::collections::BTreeMap;

use crate::error::{KnnError, Result};

/// Counts how often each label occurs among `neighbors`.
///
/// The map is ordered by label value.
///
/// # Errors
///
/// [`KnnError::IndexOutOfRange`] if a neighbor index is not a row of `labels`.
pub fn vote_counts<L: Ord + Clone>(
    labels: &[L],
    neighbors: &[usize],
) -> Result<BTreeMap<L, usize>> {
    let mut counts = BTreeMap::new();
    for &idx in neighbors {
        let label = labels.get(idx).ok_or(KnnError::IndexOutOfRange {
            index: idx,
            len: labels.len(),
        })?;
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Returns the most frequent label among `neighbors`.
///
/// Labels are visited in ascending order and a label only replaces the current
/// winner with a strictly higher count, so ties go to the smallest label.
///
/// # Errors
///
/// [`KnnError::InvalidK`] with `k = 0` when `neighbors` is empty, and
/// [`KnnError::IndexOutOfRange`] for an index past the end of `labels`.
pub fn majority_vote<L: Ord + Clone>(labels: &[L], neighbors: &[usize]) -> Result<L> {
    let mut best: Option<(L, usize)> = None;
    for (label, count) in vote_counts(labels, neighbors)? {
        if best.as_ref().map_or(true, |(_, max)| count > *max) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label).ok_or(KnnError::InvalidK {
        k: 0,
        n: labels.len(),
    })
}
