//! # performance-predictor
//!
//! Serves a pre-trained student-performance model over HTTP.
//!
//! At startup the model and its optional companions (feature list, scaler,
//! label decoder) are loaded once into [`Artifacts`]. Each `POST /predict`
//! request then runs the [`Predictor`] pipeline:
//!
//! 1. resolve the feature order (model names, else the feature list)
//! 2. parse the JSON body and assemble a numeric row in that order
//! 3. scale the row, if a scaler was loaded
//! 4. predict
//! 5. decode and capitalize the class, if a label decoder was loaded
//!
//! ## Example
//!
//! ```
//! use performance_predictor::{Artifacts, Predictor};
//! use performance_predictor::model::{Label, LinearModel};
//!
//! let model = LinearModel::new(vec![0.5, 0.5], 0.0)
//!     .with_feature_names(vec!["G1".into(), "G2".into()]);
//! let predictor = Predictor::new(Artifacts::new(model));
//!
//! let label = predictor.predict_body(br#"{"G1": 14, "G2": 16}"#).unwrap();
//! assert_eq!(label, Label::Number(15.0));
//! ```

pub mod artifacts;
pub mod config;
pub mod error;
pub mod features;
pub mod http;
pub mod model;
pub mod predictor;
pub mod preprocessing;
pub mod serialization;

pub use artifacts::Artifacts;
pub use config::{ArtifactConfig, Config};
pub use error::{ArtifactError, PredictionError};
pub use features::FeatureNames;
pub use http::router;
pub use model::{InferenceModel, Label, ModelArtifact};
pub use predictor::Predictor;
pub use serialization::Artifact;
