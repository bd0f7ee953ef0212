//! The prediction pipeline for a single request.
//!
//! resolve feature order -> parse body -> assemble row -> scale -> predict -> decode
//!
//! Every step either succeeds or returns a [`PredictionError`]; nothing is
//! mutated along the way, so concurrent requests share one [`Predictor`].

use crate::artifacts::Artifacts;
use crate::error::PredictionError;
use crate::features::{assemble_row, parse_payload, resolve_feature_order};
use crate::model::linear::argmax;
use crate::model::{Label, ModelError};
use crate::preprocessing::{capitalize, FittedTransformer, PreprocessingError};
use ndarray::ArrayView1;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Cheap-to-clone handle over the loaded artifacts.
#[derive(Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
}

impl Predictor {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Run the whole pipeline on a raw request body.
    pub fn predict_body(&self, body: &[u8]) -> Result<Label, PredictionError> {
        // The feature order is checked before the body is even looked at.
        let order = self.feature_order()?;
        let payload = parse_payload(body)?;
        self.predict_ordered(&payload, order)
    }

    /// Run the pipeline on an already decoded JSON object.
    pub fn predict_payload(&self, payload: &Map<String, Value>) -> Result<Label, PredictionError> {
        let order = self.feature_order()?;
        self.predict_ordered(payload, order)
    }

    fn feature_order(&self) -> Result<&[String], PredictionError> {
        resolve_feature_order(self.artifacts.model(), self.artifacts.feature_names())
    }

    fn predict_ordered(
        &self,
        payload: &Map<String, Value>,
        order: &[String],
    ) -> Result<Label, PredictionError> {
        let artifacts = &*self.artifacts;
        let mut row = assemble_row(payload, order)?;

        if let Some(scaler) = artifacts.scaler() {
            row = scaler.transform(row.view()).map_err(|e| match e {
                PreprocessingError::NonFiniteOutput { feature } => PredictionError::OutOfRange {
                    name: feature_name(order, feature),
                    reason: format!("overflows the {} scaler", scaler.kind()),
                },
                other => PredictionError::Internal(other.to_string()),
            })?;
        }

        let raw = artifacts.model().predict(row.view()).map_err(|e| match e {
            // Parameters are finite once loaded, so only the caller's values can overflow.
            ModelError::NonFinite => PredictionError::OutOfRange {
                name: feature_name(order, largest_magnitude(row.view())),
                reason: format!("overflows the {} model", artifacts.model().kind()),
            },
            other => PredictionError::Internal(other.to_string()),
        })?;
        debug!(prediction = %raw, "model output");

        match artifacts.label_decoder() {
            Some(decoder) => {
                let name = decoder.inverse_transform(&raw).map_err(|e| match e {
                    PreprocessingError::UnknownClass(class) => PredictionError::UnknownClass(class),
                    other => PredictionError::Internal(other.to_string()),
                })?;
                Ok(Label::Text(capitalize(&name)))
            }
            None => Ok(raw),
        }
    }
}

fn feature_name(order: &[String], idx: usize) -> String {
    order
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("#{}", idx))
}

/// Position of the value furthest from zero.
fn largest_magnitude(row: ArrayView1<'_, f64>) -> usize {
    let magnitudes: Vec<f64> = row.iter().map(|v| v.abs()).collect();
    argmax(&magnitudes)
}
