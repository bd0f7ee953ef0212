//! MinMax Scaler: maps each feature from its fitted `[data_min, data_max]`
//! range onto `[config.min, config.max]` (default `[0, 1]`).
//!
//! ```text
//! x_scaled = (x - data_min) / (data_max - data_min) * (max - min) + min
//! ```
//! Values outside the fitted range are not clipped.

use super::{check_finite, check_len, non_zero};
use crate::error::ArtifactError;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

/// Target range of a MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerConfig {
    /// Lower bound of the output range.
    pub min: f64,
    /// Upper bound of the output range.
    pub max: f64,
}

impl Default for MinMaxScalerConfig {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// Fitted parameters of a MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    #[serde(default)]
    pub config: MinMaxScalerConfig,
    /// Per-feature minimum seen during fit.
    pub data_min: Vec<f64>,
    /// Per-feature maximum seen during fit.
    pub data_max: Vec<f64>,
}

impl MinMaxScalerParams {
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Self {
        Self {
            config: MinMaxScalerConfig::default(),
            data_min,
            data_max,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if !(self.config.min < self.config.max) {
            return Err(ArtifactError::invalid(
                "min-max scaler",
                format!(
                    "feature range [{}, {}] is empty",
                    self.config.min, self.config.max
                ),
            ));
        }
        check_len(
            "min-max scaler",
            "data_min",
            self.data_min.len(),
            self.data_max.len(),
        )?;
        check_finite("min-max scaler", &self.data_min)?;
        check_finite("min-max scaler", &self.data_max)
    }
}

impl FittedTransformer for MinMaxScalerParams {
    fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, PreprocessingError> {
        self.check_features(row)?;

        let span = self.config.max - self.config.min;
        let mut out = row.to_owned();
        Zip::from(&mut out)
            .and(ArrayView1::from(&self.data_min[..]))
            .and(ArrayView1::from(&self.data_max[..]))
            .for_each(|x, &lo, &hi| {
                *x = (*x - lo) / non_zero(hi - lo) * span + self.config.min;
            });
        Ok(out)
    }

    fn n_features_in(&self) -> usize {
        self.data_max.len()
    }
}
