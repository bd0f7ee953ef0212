//! Label decoding for classification targets.
//!
//! During training the target column was label-encoded: each category
//! string became its position in the sorted class list. The decoder inverts
//! that mapping so a predicted class index can be reported by name.

use crate::error::ArtifactError;
use crate::model::Label;
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::Artifact;
use serde::{Deserialize, Serialize};

/// Fitted label decoder: class index `i` decodes to `classes[i]`.
///
/// # Example
/// ```
/// use performance_predictor::model::Label;
/// use performance_predictor::preprocessing::LabelDecoder;
///
/// let decoder = LabelDecoder::new(vec!["fail".into(), "pass".into()]);
/// assert_eq!(decoder.inverse_transform(&Label::Number(1.0)).unwrap(), "pass");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelDecoder {
    /// Original category names, in encoded order.
    classes: Vec<String>,
}

impl LabelDecoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Get the known classes.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Get the number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Map a predicted label back to its original category name.
    ///
    /// Numeric labels must be an integral index into the class list. A text
    /// label is accepted when it already names a known class.
    pub fn inverse_transform(&self, label: &Label) -> Result<String, PreprocessingError> {
        match label {
            Label::Number(v) => {
                let in_range =
                    v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v < self.n_classes() as f64;
                if !in_range {
                    return Err(PreprocessingError::UnknownClass(label.to_string()));
                }
                Ok(self.classes[*v as usize].clone())
            }
            Label::Text(s) => self
                .classes
                .iter()
                .find(|c| *c == s)
                .cloned()
                .ok_or_else(|| PreprocessingError::UnknownClass(s.clone())),
        }
    }
}

impl Artifact for LabelDecoder {
    const NAME: &'static str = "label decoder";

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.classes.is_empty() {
            return Err(ArtifactError::invalid(Self::NAME, "no classes"));
        }
        Ok(())
    }
}

/// Display form of a decoded label: first character upper-cased, the rest
/// lower-cased (`"pass"` -> `"Pass"`, `"FAIL"` -> `"Fail"`).
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
