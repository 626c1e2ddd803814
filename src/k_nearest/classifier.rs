use log::trace;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::{
    classify_batch, classify_query, distance::squared_norms, nearest, validate_queries,
    validate_training, KnnConfig, KnnScratch,
};
use crate::error::Result;

/// A k-NN classifier that owns its training data and caches the squared norm
/// of every training row.
///
/// # Type Parameters
/// - `L`: The label type. Must be `Ord` so votes are tallied in label order and
///   ties go to the smallest label.
///
/// # Fields
/// - `config`: number of neighbors and batch scheduling.
/// - `features`: training matrix, one row per sample.
/// - `sq_norms`: squared norm of every row of `features`.
/// - `labels`: corresponding label for each row.
#[derive(Debug, Clone)]
pub struct KnnClassifier<L: Ord + Clone> {
    config: KnnConfig,
    features: Array2<f64>,
    sq_norms: Array1<f64>,
    labels: Vec<L>,
}

impl<L: Ord + Clone + Send + Sync> KnnClassifier<L> {
    /// Constructs a new `KnnClassifier`, computing the row norms itself.
    ///
    /// # Errors
    ///
    /// - If `k == 0` or `k > features.nrows()`.
    /// - If `features.nrows() != labels.len()`.
    /// - If the feature vectors are empty or hold NaN or infinity.
    ///
    /// # Example
    ///
    /// ```
    /// use knn_euclid::KnnClassifier;
    /// use ndarray::array;
    ///
    /// let features = array![[1.0, 2.0], [2.0, 3.0], [3.0, 3.0], [6.0, 7.0]];
    /// let labels = vec![0, 0, 1, 1];
    ///
    /// let knn = KnnClassifier::new(3, features, labels).unwrap();
    /// let predicted = knn.predict(array![2.1, 2.9].view()).unwrap();
    /// assert_eq!(predicted, 0);
    /// ```
    pub fn new(k: usize, features: Array2<f64>, labels: Vec<L>) -> Result<Self> {
        let sq_norms = squared_norms(features.view());
        Self::with_squared_norms(k, features, sq_norms, labels)
    }

    /// Constructs a classifier from norms the caller already computed.
    ///
    /// The norms are trusted; stale values skew every distance.
    ///
    /// # Errors
    ///
    /// Same as [`KnnClassifier::new`], plus a length check on `sq_norms`.
    pub fn with_squared_norms(
        k: usize,
        features: Array2<f64>,
        sq_norms: Array1<f64>,
        labels: Vec<L>,
    ) -> Result<Self> {
        validate_training(features.view(), sq_norms.view(), &labels, k)?;
        trace!(
            "built k-NN classifier: {} rows x {} features, k={}",
            features.nrows(),
            features.ncols(),
            k
        );
        Ok(Self {
            config: KnnConfig::new(k),
            features,
            sq_norms,
            labels,
        })
    }

    /// Choose whether [`predict_batch`](Self::predict_batch) uses the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config = self.config.with_parallel(parallel);
        self
    }

    /// Predict the label for a single query point using majority vote among its `k` nearest neighbors.
    ///
    /// # Errors
    ///
    /// If `point` has the wrong dimension, holds NaN or infinity, or its squared
    /// norm overflows.
    pub fn predict(&self, point: ArrayView1<f64>) -> Result<L> {
        validate_queries(point.insert_axis(Axis(0)), self.n_features())?;
        let mut scratch = KnnScratch::new(self.n_samples());
        classify_query(
            self.features.view(),
            self.sq_norms.view(),
            &self.labels,
            point,
            self.k(),
            &mut scratch,
        )
    }

    /// Predict labels for every row of `points`, in row order.
    pub fn predict_batch(&self, points: ArrayView2<f64>) -> Result<Vec<L>> {
        validate_queries(points, self.n_features())?;
        classify_batch(
            self.features.view(),
            self.sq_norms.view(),
            &self.labels,
            points,
            &self.config,
        )
    }

    /// Indices of the `k` training rows nearest to `point`, in no particular order.
    pub fn neighbors(&self, point: ArrayView1<f64>) -> Result<Vec<usize>> {
        validate_queries(point.insert_axis(Axis(0)), self.n_features())?;
        let mut scratch = KnnScratch::new(self.n_samples());
        let picked = nearest(
            self.features.view(),
            self.sq_norms.view(),
            point,
            self.k(),
            &mut scratch,
        )?;
        Ok(picked.to_vec())
    }

    /// Number of neighbors that vote on each query.
    pub fn k(&self) -> usize {
        self.config.k()
    }

    /// Number of training rows.
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features per row.
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Label of every training row.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Cached squared norm of every training row.
    pub fn squared_norms(&self) -> ArrayView1<'_, f64> {
        self.sq_norms.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnnError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_basic_knn() {
        let features = array![[1.0, 2.0], [2.0, 3.0], [2.5, 2.7], [10.0, 10.0]];
        let labels = vec![0, 0, 1, 1];
        let knn = KnnClassifier::new(3, features, labels).unwrap();

        // two of the three nearest are 0
        assert_eq!(knn.predict(array![2.1, 2.9].view()).unwrap(), 0);
        // [10, 10] and [2.5, 2.7] outvote [2, 3]
        assert_eq!(
            knn.predict_batch(array![[2.1, 2.9], [9.5, 9.7]].view()).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_k1_far_cluster() {
        let features = array![[1.0, 2.0], [2.0, 3.0], [2.5, 2.7], [10.0, 10.0]];
        let knn = KnnClassifier::new(1, features, vec![0, 0, 1, 1])
            .unwrap()
            .with_parallel(false);
        assert_eq!(knn.predict(array![9.5, 9.7].view()).unwrap(), 1);
    }

    #[test]
    fn test_cached_norms() {
        let features = array![[3.0, 4.0], [1.0, 0.0]];
        let knn = KnnClassifier::new(1, features, vec![0, 1]).unwrap();
        assert_abs_diff_eq!(knn.squared_norms()[0], 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(knn.squared_norms()[1], 1.0, epsilon = 1e-12);
        assert_eq!(knn.n_samples(), 2);
        assert_eq!(knn.n_features(), 2);
        assert_eq!(knn.labels(), &[0, 1]);
    }

    #[test]
    fn test_neighbors() {
        let features = array![[0.0], [10.0], [1.0], [11.0]];
        let knn = KnnClassifier::new(2, features, vec![0, 1, 0, 1]).unwrap();
        let mut picked = knn.neighbors(array![0.4].view()).unwrap();
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn test_empty_features_rejected() {
        let features = Array2::<f64>::zeros((0, 2));
        let result = KnnClassifier::<i32>::new(3, features, vec![]);
        assert_eq!(result.unwrap_err(), KnnError::InvalidK { k: 3, n: 0 });
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let features = Array2::<f64>::zeros((2, 0));
        let result = KnnClassifier::new(1, features, vec![0, 1]);
        assert_eq!(result.unwrap_err(), KnnError::EmptyFeatures);
    }

    #[test]
    fn test_label_length_mismatch() {
        let features = array![[0.0], [1.0]];
        let result = KnnClassifier::new(1, features, vec![0]);
        assert_eq!(
            result.unwrap_err(),
            KnnError::LengthMismatch {
                input: "labels",
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_stale_norm_length_rejected() {
        let features = array![[0.0], [1.0]];
        let result = KnnClassifier::with_squared_norms(1, features, array![0.0], vec![0, 1]);
        assert!(matches!(
            result,
            Err(KnnError::LengthMismatch {
                input: "squared norms",
                ..
            })
        ));
    }

    #[test]
    fn test_predict_wrong_dimension() {
        let knn = KnnClassifier::new(1, array![[0.0, 0.0]], vec![7]).unwrap();
        assert_eq!(
            knn.predict(array![1.0].view()),
            Err(KnnError::DimensionMismatch { train: 2, query: 1 })
        );
    }

    #[test]
    fn test_predict_nan_query() {
        let knn = KnnClassifier::new(1, array![[0.0, 0.0]], vec![7]).unwrap();
        assert_eq!(
            knn.predict(array![f64::NAN, 0.0].view()),
            Err(KnnError::NonFiniteInput { input: "queries" })
        );
    }
}
