//! Robust Scaler: centers on the median and scales by the interquartile
//! range, both fitted offline.
//!
//! ```text
//! x_scaled = (x - center) / scale
//! ```

use super::{check_finite, check_len, non_zero};
use crate::error::ArtifactError;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

/// Configuration for RobustScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobustScalerConfig {
    /// Subtract the median.
    pub with_centering: bool,
    /// Divide by the interquartile range.
    pub with_scaling: bool,
}

impl Default for RobustScalerConfig {
    fn default() -> Self {
        Self {
            with_centering: true,
            with_scaling: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobustScalerParams {
    #[serde(default)]
    pub config: RobustScalerConfig,
    /// Per-feature median.
    pub center: Vec<f64>,
    /// Per-feature interquartile range.
    pub scale: Vec<f64>,
}

impl RobustScalerParams {
    pub fn new(center: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            config: RobustScalerConfig::default(),
            center,
            scale,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        check_len("robust scaler", "center", self.center.len(), self.scale.len())?;
        check_finite("robust scaler", &self.center)?;
        check_finite("robust scaler", &self.scale)
    }
}

impl FittedTransformer for RobustScalerParams {
    fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, PreprocessingError> {
        self.check_features(row)?;

        let RobustScalerConfig {
            with_centering,
            with_scaling,
        } = self.config;
        let mut out = row.to_owned();
        Zip::from(&mut out)
            .and(ArrayView1::from(&self.center[..]))
            .and(ArrayView1::from(&self.scale[..]))
            .for_each(|x, &c, &s| {
                if with_centering {
                    *x -= c;
                }
                if with_scaling {
                    *x /= non_zero(s);
                }
            });
        Ok(out)
    }

    fn n_features_in(&self) -> usize {
        self.scale.len()
    }
}
