//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Error, PartialEq)]
pub enum PreprocessingError {
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Transforming the value at `feature` produced NaN or infinity.
    #[error("Numerical error: non-finite output for feature {feature}")]
    NonFiniteOutput { feature: usize },
    /// A value has no entry in the fitted class list.
    #[error("Unknown class: {0}")]
    UnknownClass(String),
}
