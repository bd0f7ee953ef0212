//! Fitted scalers applied to a feature row before prediction.
//!
//! # Available Scalers
//!
//! | Scaler | Formula |
//! |--------|---------|
//! | [`StandardScalerParams`] | `(x - mean) / scale` |
//! | [`MinMaxScalerParams`] | `(x - data_min) / (data_max - data_min) * (max - min) + min` |
//! | [`RobustScalerParams`] | `(x - center) / scale` |
//! | [`MaxAbsScalerParams`] | `x / max_abs` |
//!
//! A scaler file holds one of these, tagged by kind, plus the feature names
//! it was fitted on when the training side recorded them:
//!
//! ```json
//! {
//!   "params": {"standard": {"mean": [10.2, 10.7], "scale": [3.3, 3.7]}},
//!   "feature_names": ["G1", "G2"]
//! }
//! ```

pub mod maxabs;
pub mod minmax;
pub mod robust;
pub mod standard;

pub use maxabs::MaxAbsScalerParams;
pub use minmax::{MinMaxScalerConfig, MinMaxScalerParams};
pub use robust::{RobustScalerConfig, RobustScalerParams};
pub use standard::{StandardScalerConfig, StandardScalerParams};

use crate::error::ArtifactError;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use crate::serialization::Artifact;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Parameters of one of the supported scalers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerParams {
    Standard(StandardScalerParams),
    MinMax(MinMaxScalerParams),
    Robust(RobustScalerParams),
    MaxAbs(MaxAbsScalerParams),
}

impl ScalerParams {
    fn inner(&self) -> &dyn FittedTransformer {
        match self {
            ScalerParams::Standard(p) => p,
            ScalerParams::MinMax(p) => p,
            ScalerParams::Robust(p) => p,
            ScalerParams::MaxAbs(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScalerParams::Standard(_) => "standard",
            ScalerParams::MinMax(_) => "min_max",
            ScalerParams::Robust(_) => "robust",
            ScalerParams::MaxAbs(_) => "max_abs",
        }
    }
}

/// Scaler artifact: fitted parameters plus the feature order they were fitted on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    pub params: ScalerParams,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl FittedScaler {
    pub fn new(params: ScalerParams) -> Self {
        Self {
            params,
            feature_names: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Feature order recorded at fit time, if any.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn kind(&self) -> &'static str {
        self.params.kind()
    }
}

impl FittedTransformer for FittedScaler {
    fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, PreprocessingError> {
        let out = self.params.inner().transform(row)?;
        if let Some(feature) = out.iter().position(|v| !v.is_finite()) {
            return Err(PreprocessingError::NonFiniteOutput { feature });
        }
        Ok(out)
    }

    fn n_features_in(&self) -> usize {
        self.params.inner().n_features_in()
    }
}

impl Artifact for FittedScaler {
    const NAME: &'static str = "scaler";

    fn validate(&self) -> Result<(), ArtifactError> {
        match &self.params {
            ScalerParams::Standard(p) => p.validate(),
            ScalerParams::MinMax(p) => p.validate(),
            ScalerParams::Robust(p) => p.validate(),
            ScalerParams::MaxAbs(p) => p.validate(),
        }?;
        if self.n_features_in() == 0 {
            return Err(ArtifactError::invalid(Self::NAME, "no features"));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features_in() {
                return Err(ArtifactError::invalid(
                    Self::NAME,
                    format!(
                        "{} feature names recorded for {} features",
                        names.len(),
                        self.n_features_in()
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Zero scales come from constant training features; leave those unscaled.
pub(crate) fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

pub(crate) fn check_len(
    artifact: &'static str,
    field: &str,
    got: usize,
    expected: usize,
) -> Result<(), ArtifactError> {
    if got != expected {
        return Err(ArtifactError::invalid(
            artifact,
            format!("{} has {} entries, expected {}", field, got, expected),
        ));
    }
    Ok(())
}

pub(crate) fn check_finite(artifact: &'static str, values: &[f64]) -> Result<(), ArtifactError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::invalid(artifact, "non-finite parameter"));
    }
    Ok(())
}
