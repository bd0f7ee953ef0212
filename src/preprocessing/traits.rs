//! Core trait for fitted preprocessing transformers.

use crate::preprocessing::error::PreprocessingError;
use ndarray::{Array1, ArrayView1};

/// A transformer whose parameters were learned offline, ready for inference.
///
/// Only the inference half of the usual fit/transform pair exists here:
/// parameters arrive from an artifact file and never change afterwards.
///
/// # Errors
/// `transform` returns [`PreprocessingError::FeatureMismatch`] when the row
/// width differs from [`FittedTransformer::n_features_in`].
pub trait FittedTransformer {
    /// Transform one feature row.
    fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, PreprocessingError>;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Rejects rows whose width differs from the fitted width.
    fn check_features(&self, row: ArrayView1<'_, f64>) -> Result<(), PreprocessingError> {
        if row.len() != self.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in(),
                got_features: row.len(),
            });
        }
        Ok(())
    }
}
