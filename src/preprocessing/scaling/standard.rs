//! Standard Scaler (Z-score normalization).
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the standard
//! deviation. Both were computed offline; this type only applies them.

use super::{check_finite, check_len, non_zero};
use crate::error::ArtifactError;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If True, center the data before scaling.
    pub with_mean: bool,
    /// If True, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Fitted parameters of a StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    #[serde(default)]
    pub config: StandardScalerConfig,
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Standard deviation of each feature. Zero entries (constant features) act as 1.
    pub scale: Vec<f64>,
}

impl StandardScalerParams {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            config: StandardScalerConfig::default(),
            mean,
            scale,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        check_len("standard scaler", "mean", self.mean.len(), self.scale.len())?;
        check_finite("standard scaler", &self.mean)?;
        check_finite("standard scaler", &self.scale)
    }
}

impl FittedTransformer for StandardScalerParams {
    fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, PreprocessingError> {
        self.check_features(row)?;

        let mut out = row.to_owned();
        if self.config.with_mean {
            out -= &ArrayView1::from(&self.mean[..]);
        }
        if self.config.with_std {
            out.zip_mut_with(&ArrayView1::from(&self.scale[..]), |x, &s| *x /= non_zero(s));
        }
        Ok(out)
    }

    fn n_features_in(&self) -> usize {
        self.scale.len()
    }
}
