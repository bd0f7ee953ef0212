//! Decision tree stored as flat node arrays.
//!
//! Node `i` is a leaf when `children_left[i] == LEAF`. Internal nodes route a
//! row left when `row[feature[i]] <= threshold[i]` and right otherwise.
//! `value[i]` holds per-class weights for classifiers, or a single output
//! for regression trees.
//!
//! ```text
//!              [0] avg_grade <= 9.5
//!             /                    \
//!        [1] leaf            [2] absences <= 10
//!                             /              \
//!                        [3] leaf          [4] leaf
//! ```

use super::linear::argmax;
use super::{check_feature_names, check_width, ClassLabels, InferenceModel, Label, ModelError};
use crate::error::ArtifactError;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Child index marking a leaf.
pub const LEAF: i64 = -1;

const ARTIFACT: &str = "model";

/// Fitted decision tree (classifier when `classes` is set, regressor otherwise).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
    #[serde(default)]
    pub classes: Option<ClassLabels>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl DecisionTree {
    pub fn n_nodes(&self) -> usize {
        self.children_left.len()
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.n_nodes();
        if n == 0 {
            return Err(ArtifactError::invalid(ARTIFACT, "decision tree has no nodes"));
        }
        if self.n_features == 0 {
            return Err(ArtifactError::invalid(ARTIFACT, "decision tree has no inputs"));
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                "decision tree node arrays differ in length",
            ));
        }

        let in_range = |child: i64| child > 0 && (child as usize) < n;
        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(ArtifactError::invalid(
                        ARTIFACT,
                        format!("node {} has a right child but no left child", node),
                    ));
                }
                let width = self.value[node].len();
                let expected = self.classes.as_ref().map(ClassLabels::len).unwrap_or(1);
                if width == 0 || (self.classes.is_some() && width != expected) {
                    return Err(ArtifactError::invalid(
                        ARTIFACT,
                        format!(
                            "leaf {} holds {} values, expected {}",
                            node, width, expected
                        ),
                    ));
                }
                continue;
            }
            if !in_range(left) || !in_range(right) {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("node {} has out-of-range children", node),
                ));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= self.n_features {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("node {} splits on unknown feature {}", node, feature),
                ));
            }
        }

        if let Some(classes) = &self.classes {
            if classes.is_empty() {
                return Err(ArtifactError::invalid(ARTIFACT, "decision tree has no classes"));
            }
        }
        check_feature_names(self.feature_names.as_deref(), self.n_features)
    }
}

impl InferenceModel for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: ArrayView1<'_, f64>) -> Result<Label, ModelError> {
        check_width(row, self.n_features)?;

        // Trees built in code may skip `validate()`; every index is checked.
        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.n_nodes() {
            let here = node;
            let corrupt = move || ModelError::CorruptTree(format!("node {} is malformed", here));

            let left = *self.children_left.get(node).ok_or_else(corrupt)?;
            if left == LEAF {
                let value = self.value.get(node).ok_or_else(corrupt)?;
                return match &self.classes {
                    Some(classes) => {
                        let idx = argmax(value);
                        classes.get(idx).ok_or(ModelError::ClassIndex(idx))
                    }
                    None => value
                        .first()
                        .copied()
                        .map(Label::Number)
                        .ok_or_else(|| ModelError::CorruptTree(format!("empty leaf {}", node))),
                };
            }
            let right = *self.children_right.get(node).ok_or_else(corrupt)?;
            let threshold = *self.threshold.get(node).ok_or_else(corrupt)?;
            let x = self
                .feature
                .get(node)
                .and_then(|&f| usize::try_from(f).ok())
                .and_then(|f| row.get(f))
                .copied()
                .ok_or_else(corrupt)?;

            let next = if x <= threshold { left } else { right };
            node = usize::try_from(next)
                .map_err(|_| ModelError::CorruptTree(format!("bad child index {}", next)))?;
        }
        Err(ModelError::CorruptTree("no leaf reached".to_string()))
    }
}
