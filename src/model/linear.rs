//! Linear models: regression (`y = w^T x + b`) and logistic classification.
//!
//! Both are inference-only: they carry fitted coefficients and nothing from
//! training (no optimizer state, no loss, no hyperparameters).

use super::{check_feature_names, check_width, ClassLabels, InferenceModel, Label, ModelError};
use crate::error::ArtifactError;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

const ARTIFACT: &str = "model";

/// Fitted linear regression model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            feature_names: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.weights.is_empty() {
            return Err(ArtifactError::invalid(ARTIFACT, "linear model has no weights"));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                "linear model has non-finite coefficients",
            ));
        }
        check_feature_names(self.feature_names.as_deref(), self.weights.len())
    }
}

impl InferenceModel for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn n_features_in(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, row: ArrayView1<'_, f64>) -> Result<Label, ModelError> {
        check_width(row, self.weights.len())?;
        let y = ArrayView1::from(&self.weights[..]).dot(&row) + self.bias;
        if !y.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(Label::Number(y))
    }
}

/// Fitted logistic regression classifier.
///
/// `coefficients` holds one row per class, or a single row for a binary
/// problem where a positive decision value selects `classes[1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    pub classes: ClassLabels,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticModel {
    fn n_features(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        let rows = self.coefficients.len();
        let cols = self.n_features();
        if rows == 0 || cols == 0 {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                "logistic model has no coefficients",
            ));
        }
        if self.coefficients.iter().any(|row| row.len() != cols) {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                "logistic coefficient rows differ in width",
            ));
        }
        if self.intercepts.len() != rows {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                format!(
                    "{} intercepts for {} coefficient rows",
                    self.intercepts.len(),
                    rows
                ),
            ));
        }
        let expected_classes = if rows == 1 { 2 } else { rows };
        if self.classes.len() != expected_classes {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                format!(
                    "expected {} classes, found {}",
                    expected_classes,
                    self.classes.len()
                ),
            ));
        }
        check_feature_names(self.feature_names.as_deref(), cols)
    }
}

impl InferenceModel for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn n_features_in(&self) -> usize {
        self.n_features()
    }

    fn predict(&self, row: ArrayView1<'_, f64>) -> Result<Label, ModelError> {
        check_width(row, self.n_features())?;

        let decisions: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(coef, b)| ArrayView1::from(&coef[..]).dot(&row) + b)
            .collect();
        if decisions.iter().any(|d| !d.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        let idx = if decisions.len() == 1 {
            usize::from(decisions[0] > 0.0)
        } else {
            argmax(&decisions)
        };
        self.classes.get(idx).ok_or(ModelError::ClassIndex(idx))
    }
}

/// Index of the first maximum.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
