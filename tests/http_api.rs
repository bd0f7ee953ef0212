use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use performance_predictor::model::{ClassLabels, DecisionTree, LinearModel};
use performance_predictor::preprocessing::{
    FittedScaler, LabelDecoder, ScalerParams, StandardScalerParams,
};
use performance_predictor::{router, Artifacts, FeatureNames, Predictor};
use serde_json::{json, Value};
use tower::ServiceExt;

const FEATURES: [&str; 5] = ["G1", "G2", "studytime", "absences", "avg_grade"];

// avg_grade <= 9.5 -> class 0; otherwise absences <= 10 -> class 1, else class 0.
fn student_tree() -> DecisionTree {
    DecisionTree {
        n_features: 5,
        children_left: vec![1, -1, 3, -1, -1],
        children_right: vec![2, -1, 4, -1, -1],
        feature: vec![4, -2, 3, -2, -2],
        threshold: vec![9.5, -2.0, 10.0, -2.0, -2.0],
        value: vec![
            vec![8.0, 8.0],
            vec![5.0, 0.0],
            vec![3.0, 8.0],
            vec![0.0, 7.0],
            vec![3.0, 1.0],
        ],
        classes: Some(ClassLabels::Numeric(vec![0.0, 1.0])),
        feature_names: None,
    }
}

fn feature_list() -> FeatureNames {
    FeatureNames::new(FEATURES.iter().map(|s| s.to_string()).collect())
}

fn app(artifacts: Artifacts) -> Router {
    router(Predictor::new(artifacts))
}

async fn post(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn student_payload() -> Value {
    json!({"G1": 15, "G2": 16, "studytime": 3, "absences": 2, "avg_grade": 14.5})
}

#[tokio::test]
async fn test_predict_with_feature_list() {
    let app = app(Artifacts::new(student_tree()).with_feature_names(feature_list()));
    let (status, body) = post(app, student_payload().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": 1}));
}

#[tokio::test]
async fn test_missing_features_are_listed() {
    let app = app(Artifacts::new(student_tree()).with_feature_names(feature_list()));
    let (status, body) = post(app, json!({"G1": 15, "studytime": 3}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    for name in ["G2", "absences", "avg_grade"] {
        assert!(message.contains(name), "{} not in {}", name, message);
    }
    assert!(!message.contains("G1"));
    assert!(!message.contains("studytime"));
}

#[tokio::test]
async fn test_non_numeric_value() {
    let app = app(Artifacts::new(student_tree()).with_feature_names(feature_list()));
    let mut payload = student_payload();
    payload["absences"] = json!("many");
    let (status, body) = post(app, payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("absences"));
}

#[tokio::test]
async fn test_truncated_json() {
    let app = app(Artifacts::new(student_tree()).with_feature_names(feature_list()));
    let (status, body) = post(app, r#"{"G1": 15, "G2":"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid JSON input"}));
}

#[tokio::test]
async fn test_no_feature_metadata() {
    let app = app(Artifacts::new(student_tree()));
    let (status, body) = post(app, student_payload().to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "model does not declare its input features"})
    );
}

#[tokio::test]
async fn test_decoded_label_is_capitalized() {
    let app = app(
        Artifacts::new(student_tree())
            .with_feature_names(feature_list())
            .with_label_decoder(LabelDecoder::new(vec!["fail".into(), "pass".into()])),
    );
    let (status, body) = post(app, student_payload().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": "Pass"}));
}

#[tokio::test]
async fn test_unexpected_class() {
    let app = app(
        Artifacts::new(student_tree())
            .with_feature_names(feature_list())
            .with_label_decoder(LabelDecoder::new(vec!["fail".into()])),
    );
    let (status, body) = post(app, student_payload().to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains('1'));
}

#[tokio::test]
async fn test_model_names_take_precedence() {
    let mut tree = student_tree();
    tree.feature_names = Some(FEATURES.iter().map(|s| s.to_string()).collect());
    // A stale feature list that the model's own names override.
    let stale = FeatureNames::new(vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()]);
    let app = app(Artifacts::new(tree).with_feature_names(stale));
    let (status, body) = post(app, student_payload().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], json!(1));
}

#[tokio::test]
async fn test_same_input_same_output() {
    let app = app(Artifacts::new(student_tree()).with_feature_names(feature_list()));
    let first = post(app.clone(), student_payload().to_string()).await;
    let second = post(app, student_payload().to_string()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_regression_output() {
    let model = LinearModel::new(vec![0.5, 0.5], 0.0)
        .with_feature_names(vec!["G1".into(), "G2".into()]);
    let (status, body) = post(app(Artifacts::new(model)), r#"{"G1": 12, "G2": 13}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": 12.5}));
}

#[tokio::test]
async fn test_overflowing_value_is_client_error() {
    let model = LinearModel::new(vec![10.0], 0.0).with_feature_names(vec!["G1".into()]);
    let (status, body) = post(app(Artifacts::new(model)), r#"{"G1": 1e308}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "feature 'G1' is out of range: overflows the linear model"})
    );
}

#[tokio::test]
async fn test_overflow_in_scaler_is_client_error() {
    let scaler = FittedScaler::new(ScalerParams::Standard(StandardScalerParams::new(
        vec![0.0],
        vec![0.01],
    )));
    let model = LinearModel::new(vec![1.0], 0.0).with_feature_names(vec!["G1".into()]);
    let (status, body) = post(
        app(Artifacts::new(model).with_scaler(scaler)),
        r#"{"G1": "1e307"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("'G1'"));
}

#[tokio::test]
async fn test_internal_failure_is_server_error() {
    // The feature list is wider than the model, so the model rejects the row.
    let model = LinearModel::new(vec![1.0], 0.0);
    let wide = FeatureNames::new(vec!["G1".into(), "G2".into()]);
    let (status, body) = post(
        app(Artifacts::new(model).with_feature_names(wide)),
        r#"{"G1": 1, "G2": 2}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let fields = body.as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(
        fields["error"],
        json!("prediction failed: expected 1 features, got 2")
    );
}

#[tokio::test]
async fn test_health() {
    let app = app(Artifacts::new(student_tree()).with_feature_names(feature_list()));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "model": "decision_tree",
            "features": FEATURES,
            "scaler": false,
            "label_decoder": false
        })
    );
}
