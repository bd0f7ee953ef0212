//! HTTP surface: `POST /predict` and `GET /health`.

use crate::error::PredictionError;
use crate::model::Label;
use crate::predictor::Predictor;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: Label,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: &'static str,
    pub features: Option<Vec<String>>,
    pub scaler: bool,
    pub label_decoder: bool,
}

impl IntoResponse for PredictionError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            debug!(error = %self, "rejected prediction request");
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self, "prediction failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(predictor: Predictor) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(predictor)
}

// The body is taken as raw bytes so that malformed JSON reaches the
// pipeline and gets the service's own error shape.
async fn predict(
    State(predictor): State<Predictor>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, PredictionError> {
    let prediction = predictor.predict_body(&body)?;
    Ok(Json(PredictionResponse { prediction }))
}

async fn health(State(predictor): State<Predictor>) -> Json<HealthResponse> {
    let artifacts = predictor.artifacts();
    Json(HealthResponse {
        status: "ok",
        model: artifacts.model().kind(),
        features: artifacts.feature_order().map(<[String]>::to_vec),
        scaler: artifacts.scaler().is_some(),
        label_decoder: artifacts.label_decoder().is_some(),
    })
}
