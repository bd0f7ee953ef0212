//! MaxAbs Scaler: divides each feature by its fitted maximum absolute value,
//! mapping the training range into `[-1, 1]` without shifting zero.

use super::{check_finite, non_zero};
use crate::error::ArtifactError;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaxAbsScalerParams {
    /// Per-feature maximum absolute value seen during fit.
    pub max_abs: Vec<f64>,
}

impl MaxAbsScalerParams {
    pub fn new(max_abs: Vec<f64>) -> Self {
        Self { max_abs }
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.max_abs.is_empty() {
            return Err(ArtifactError::invalid("max-abs scaler", "no features"));
        }
        check_finite("max-abs scaler", &self.max_abs)
    }
}

impl FittedTransformer for MaxAbsScalerParams {
    fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, PreprocessingError> {
        self.check_features(row)?;
        let mut out = row.to_owned();
        out.zip_mut_with(&ArrayView1::from(&self.max_abs[..]), |x, &m| {
            *x /= non_zero(m.abs())
        });
        Ok(out)
    }

    fn n_features_in(&self) -> usize {
        self.max_abs.len()
    }
}
