//! Pre-trained models served by the prediction endpoint.
//!
//! A model is an opaque inference artifact: it may report the ordered names
//! of its inputs and predicts one label from a fixed-width feature row.
//! Training happens elsewhere; only fitted parameters live here.

pub mod linear;
pub mod tree;

use crate::error::ArtifactError;
use crate::serialization::Artifact;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub use linear::{LinearModel, LogisticModel};
pub use tree::DecisionTree;

/// Error raised by a model while predicting.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// The row width differs from the width the model was fitted on.
    #[error("expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },
    /// The winning class position has no recorded label.
    #[error("class index {0} out of range")]
    ClassIndex(usize),
    /// Tree traversal did not reach a leaf.
    #[error("corrupt tree: {0}")]
    CorruptTree(String),
    /// The model produced NaN or an infinite value.
    #[error("model produced a non-finite output")]
    NonFinite,
}

/// One model output: a numeric value or a categorical label.
#[derive(Clone, Debug, PartialEq)]
pub enum Label {
    Number(f64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(v) => write!(f, "{}", v),
            Label::Text(s) => f.write_str(s),
        }
    }
}

// Integral class codes are emitted as JSON integers (`1`, not `1.0`).
impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Label::Number(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*v as i64)
            }
            Label::Number(v) => serializer.serialize_f64(*v),
            Label::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Class labels a classifier was fitted on, indexed by class position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabels {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ClassLabels {
    pub fn len(&self) -> usize {
        match self {
            ClassLabels::Numeric(v) => v.len(),
            ClassLabels::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label of the class at `idx`.
    pub fn get(&self, idx: usize) -> Option<Label> {
        match self {
            ClassLabels::Numeric(v) => v.get(idx).map(|&x| Label::Number(x)),
            ClassLabels::Text(v) => v.get(idx).map(|s| Label::Text(s.clone())),
        }
    }
}

/// Inference interface every served model implements.
///
/// The feature-name capability is an explicit query: `Some` when the model
/// was fitted with named inputs, `None` when it only knows its input width.
pub trait InferenceModel: Send + Sync {
    /// Short model family name, e.g. `"decision_tree"`.
    fn kind(&self) -> &'static str;

    /// Ordered input names recorded at fit time, if any.
    fn feature_names(&self) -> Option<&[String]>;

    /// Number of inputs the model was fitted on.
    fn n_features_in(&self) -> usize;

    /// Predict on a single row.
    fn predict(&self, row: ArrayView1<'_, f64>) -> Result<Label, ModelError>;
}

/// Serialized model file, one variant per supported model family.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    DecisionTree(DecisionTree),
    Linear(LinearModel),
    Logistic(LogisticModel),
}

impl ModelArtifact {
    fn inner(&self) -> &dyn InferenceModel {
        match self {
            ModelArtifact::DecisionTree(m) => m,
            ModelArtifact::Linear(m) => m,
            ModelArtifact::Logistic(m) => m,
        }
    }
}

impl InferenceModel for ModelArtifact {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.inner().feature_names()
    }

    fn n_features_in(&self) -> usize {
        self.inner().n_features_in()
    }

    fn predict(&self, row: ArrayView1<'_, f64>) -> Result<Label, ModelError> {
        self.inner().predict(row)
    }
}

impl Artifact for ModelArtifact {
    const NAME: &'static str = "model";

    fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ModelArtifact::DecisionTree(m) => m.validate(),
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::Logistic(m) => m.validate(),
        }
    }
}

/// Rejects a model whose recorded feature names disagree with its width.
pub(crate) fn check_feature_names(
    names: Option<&[String]>,
    n_features: usize,
) -> Result<(), ArtifactError> {
    if let Some(names) = names {
        if names.len() != n_features {
            return Err(ArtifactError::invalid(
                ModelArtifact::NAME,
                format!(
                    "{} feature names recorded for {} inputs",
                    names.len(),
                    n_features
                ),
            ));
        }
    }
    Ok(())
}

pub(crate) fn check_width(row: ArrayView1<'_, f64>, expected: usize) -> Result<(), ModelError> {
    if row.len() != expected {
        return Err(ModelError::FeatureMismatch {
            expected,
            got: row.len(),
        });
    }
    Ok(())
}
