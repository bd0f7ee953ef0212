//! Error types shared across the crate.
//!
//! Two families live here:
//! - [`ArtifactError`]: raised while loading artifacts at startup.
//! - [`PredictionError`]: raised while handling a single prediction request.
//!   Every variant except [`PredictionError::Internal`] is attributable to the
//!   caller and maps to a client-error response.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while reading or validating an artifact file.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid JSON document for the artifact type.
    #[error("failed to parse JSON artifact {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The file is not a valid bincode encoding of the artifact type.
    #[error("failed to decode binary artifact {}: {source}", .path.display())]
    Bincode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    /// The CSV header of a feature list could not be read.
    #[error("failed to read feature header {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The artifact parsed but its contents are inconsistent.
    #[error("invalid {artifact}: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
}

impl ArtifactError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

/// Error raised while handling one prediction request.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Neither the model nor a separate feature list names the model inputs.
    #[error("model does not declare its input features")]
    UndeclaredFeatures,
    /// The body is not a JSON object.
    #[error("invalid JSON input")]
    InvalidJson,
    /// One or more expected features are absent from the payload.
    #[error("missing features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    /// A feature value cannot be read as a finite number.
    #[error("feature '{name}' has non-numeric value {value}")]
    NonNumeric { name: String, value: String },
    /// A finite input overflowed once scaled or weighted by the model.
    #[error("feature '{name}' is out of range: {reason}")]
    OutOfRange { name: String, reason: String },
    /// The label decoder does not know the predicted class.
    #[error("unexpected predicted class: {0}")]
    UnknownClass(String),
    /// Failure inside the scaler or model, not caused by the caller.
    #[error("prediction failed: {0}")]
    Internal(String),
}

impl PredictionError {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictionError::Internal(_))
    }
}
