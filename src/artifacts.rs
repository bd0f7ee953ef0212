//! Startup loading of the model and its companion artifacts.
//!
//! The model is mandatory. The feature list, scaler and label decoder are
//! each optional: a missing or unreadable file is logged and recorded as
//! absent, and the service runs with reduced functionality.

use crate::config::ArtifactConfig;
use crate::error::ArtifactError;
use crate::features::FeatureNames;
use crate::model::{InferenceModel, ModelArtifact};
use crate::preprocessing::{FittedScaler, FittedTransformer, LabelDecoder};
use crate::serialization::Artifact;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Read-only state shared by every request for the life of the process.
pub struct Artifacts {
    model: Box<dyn InferenceModel>,
    feature_names: Option<FeatureNames>,
    scaler: Option<FittedScaler>,
    label_decoder: Option<LabelDecoder>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("model", &self.model.kind())
            .field("feature_names", &self.feature_names)
            .field("scaler", &self.scaler)
            .field("label_decoder", &self.label_decoder)
            .finish()
    }
}

impl Artifacts {
    /// Artifacts holding only a model; add the optional parts with the `with_*` methods.
    pub fn new(model: impl InferenceModel + 'static) -> Self {
        Self {
            model: Box::new(model),
            feature_names: None,
            scaler: None,
            label_decoder: None,
        }
    }

    pub fn with_feature_names(mut self, names: FeatureNames) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn with_scaler(mut self, scaler: FittedScaler) -> Self {
        self.scaler = Some(scaler);
        self
    }

    pub fn with_label_decoder(mut self, decoder: LabelDecoder) -> Self {
        self.label_decoder = Some(decoder);
        self
    }

    pub fn model(&self) -> &dyn InferenceModel {
        self.model.as_ref()
    }

    pub fn feature_names(&self) -> Option<&FeatureNames> {
        self.feature_names.as_ref()
    }

    pub fn scaler(&self) -> Option<&FittedScaler> {
        self.scaler.as_ref()
    }

    pub fn label_decoder(&self) -> Option<&LabelDecoder> {
        self.label_decoder.as_ref()
    }

    /// Feature order used for row assembly, if any source declares one.
    pub fn feature_order(&self) -> Option<&[String]> {
        self.model
            .feature_names()
            .or_else(|| self.feature_names.as_ref().map(FeatureNames::as_slice))
    }

    /// Load every artifact named by `config`.
    ///
    /// # Errors
    /// Fails when the model cannot be loaded, or when the loaded artifacts
    /// disagree with each other (see [`Artifacts::validate`]).
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        let model_path = config.model_path();
        let model = ModelArtifact::load_from_file(&model_path)?;
        info!(
            path = %model_path.display(),
            kind = model.kind(),
            n_features = model.n_features_in(),
            "loaded model"
        );

        let mut artifacts = Artifacts::new(model);
        artifacts.feature_names =
            load_optional(&config.features_path(), FeatureNames::NAME, |p| {
                FeatureNames::load(p)
            });
        artifacts.scaler = load_optional(&config.scaler_path(), FittedScaler::NAME, |p| {
            FittedScaler::load_from_file(p)
        });
        artifacts.label_decoder = load_optional(&config.labels_path(), LabelDecoder::NAME, |p| {
            LabelDecoder::load_from_file(p)
        });

        artifacts.validate()?;
        Ok(artifacts)
    }

    /// Cross-check the artifacts against the model.
    ///
    /// - The resolved feature order must have one name per model input.
    /// - A scaler must be fitted on as many features as the model takes.
    /// - A scaler that recorded its feature names must list them in exactly
    ///   the resolved order.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n_inputs = self.model.n_features_in();

        if let (Some(own), Some(list)) = (self.model.feature_names(), &self.feature_names) {
            if own != list.as_slice() {
                warn!("feature list differs from the model's own feature names; using the model's");
            }
        }

        let order = self.feature_order();
        match order {
            Some(order) if order.len() != n_inputs => {
                return Err(ArtifactError::invalid(
                    FeatureNames::NAME,
                    format!(
                        "{} feature names for a model with {} inputs",
                        order.len(),
                        n_inputs
                    ),
                ));
            }
            Some(_) => {}
            None => warn!("no feature order available; every prediction request will be rejected"),
        }

        if let Some(scaler) = &self.scaler {
            if scaler.n_features_in() != n_inputs {
                return Err(ArtifactError::invalid(
                    FittedScaler::NAME,
                    format!(
                        "fitted on {} features, model takes {}",
                        scaler.n_features_in(),
                        n_inputs
                    ),
                ));
            }
            if let (Some(fitted), Some(order)) = (scaler.feature_names(), order) {
                if fitted != order {
                    return Err(ArtifactError::invalid(
                        FittedScaler::NAME,
                        format!(
                            "fitted on features [{}], requests are assembled as [{}]",
                            fitted.join(", "),
                            order.join(", ")
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Load an optional artifact, logging and discarding any failure.
fn load_optional<T>(
    path: &Path,
    what: &str,
    load: impl FnOnce(&Path) -> Result<T, ArtifactError>,
) -> Option<T> {
    match load(path) {
        Ok(value) => {
            info!(path = %path.display(), "loaded {}", what);
            Some(value)
        }
        Err(ArtifactError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "{} not found; continuing without it", what);
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load {}; continuing without it", what);
            None
        }
    }
}
