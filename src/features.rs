//! Feature-order resolution and request payload assembly.
//!
//! Turns an arbitrary JSON body into the fixed-width row the model expects:
//! the resolved feature order decides both which keys are required and the
//! position of each value in the row. Extra keys are ignored.

use crate::error::{ArtifactError, PredictionError};
use crate::model::InferenceModel;
use crate::serialization::Artifact;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Ordered input names kept beside a model that does not record them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureNames(Vec<String>);

impl FeatureNames {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load a feature list. `.csv` files contribute their header row;
    /// any other file is read as a serialized list of names.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Self::load_from_file(path);
        }

        let csv_err = |source| ArtifactError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;
        let names: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let names = Self(names);
        names.validate()?;
        Ok(names)
    }
}

impl Artifact for FeatureNames {
    const NAME: &'static str = "feature list";

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.0.is_empty() {
            return Err(ArtifactError::invalid(Self::NAME, "no feature names"));
        }
        if let Some(blank) = self.0.iter().position(|n| n.trim().is_empty()) {
            return Err(ArtifactError::invalid(
                Self::NAME,
                format!("name at position {} is blank", blank),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.0.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(ArtifactError::invalid(
                Self::NAME,
                format!("duplicate feature name '{}'", dup),
            ));
        }
        Ok(())
    }
}

/// Pick the feature order: the model's own names first, then the separate list.
pub fn resolve_feature_order<'a>(
    model: &'a dyn InferenceModel,
    fallback: Option<&'a FeatureNames>,
) -> Result<&'a [String], PredictionError> {
    model
        .feature_names()
        .or_else(|| fallback.map(FeatureNames::as_slice))
        .ok_or(PredictionError::UndeclaredFeatures)
}

/// Decode a request body into a JSON object.
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, PredictionError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(PredictionError::InvalidJson),
    }
}

/// Build the feature row in `order`.
///
/// All missing names are reported together before any value is coerced.
pub fn assemble_row(
    payload: &Map<String, Value>,
    order: &[String],
) -> Result<Array1<f64>, PredictionError> {
    let missing: Vec<String> = order
        .iter()
        .filter(|name| !payload.contains_key(name.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PredictionError::MissingFeatures(missing));
    }

    order
        .iter()
        .map(|name| coerce(name, &payload[name.as_str()]))
        .collect::<Result<Vec<f64>, _>>()
        .map(Array1::from)
}

/// Numbers pass through; strings are parsed after trimming. Everything else,
/// and anything non-finite, is rejected.
fn coerce(name: &str, value: &Value) -> Result<f64, PredictionError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| PredictionError::NonNumeric {
            name: name.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use ndarray::array;
    use serde_json::json;

    fn order() -> Vec<String> {
        ["G1", "G2", "studytime", "absences", "avg_grade"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_assemble_row_in_feature_order() {
        let payload = object(json!({
            "avg_grade": 14.5, "absences": 2, "studytime": 3, "G2": 16, "G1": 15
        }));
        let row = assemble_row(&payload, &order()).unwrap();
        assert_eq!(row, array![15.0, 16.0, 3.0, 2.0, 14.5]);
    }

    #[test]
    fn test_assemble_row_ignores_extra_keys() {
        let payload = object(json!({
            "G1": 15, "G2": 16, "studytime": 3, "absences": 2, "avg_grade": 14.5,
            "school": "GP"
        }));
        assert_eq!(assemble_row(&payload, &order()).unwrap().len(), 5);
    }

    #[test]
    fn test_assemble_row_reports_all_missing_in_order() {
        let payload = object(json!({"G1": 15, "studytime": 3, "avg_grade": 14.5}));
        match assemble_row(&payload, &order()) {
            Err(PredictionError::MissingFeatures(names)) => {
                assert_eq!(names, vec!["G2".to_string(), "absences".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_takes_priority_over_non_numeric() {
        let payload = object(json!({"G1": "abc"}));
        assert!(matches!(
            assemble_row(&payload, &order()),
            Err(PredictionError::MissingFeatures(_))
        ));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let payload = object(json!({
            "G1": "15", "G2": " 16.0 ", "studytime": 3, "absences": "2", "avg_grade": "1.45e1"
        }));
        let row = assemble_row(&payload, &order()).unwrap();
        assert_eq!(row, array![15.0, 16.0, 3.0, 2.0, 14.5]);
    }

    #[test]
    fn test_non_numeric_value_is_named() {
        let payload = object(json!({
            "G1": 15, "G2": 16, "studytime": 3, "absences": "many", "avg_grade": 14.5
        }));
        let err = assemble_row(&payload, &order()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "feature 'absences' has non-numeric value \"many\""
        );
    }

    #[test]
    fn test_rejects_non_scalar_values() {
        for bad in [json!(null), json!(true), json!([1]), json!({"v": 1}), json!("NaN"), json!("inf")] {
            assert!(
                coerce("G1", &bad).is_err(),
                "value {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_payload() {
        assert!(parse_payload(br#"{"G1": 15}"#).is_ok());
        assert!(matches!(
            parse_payload(br#"{"G1": 15"#),
            Err(PredictionError::InvalidJson)
        ));
        assert!(matches!(
            parse_payload(b"[1, 2, 3]"),
            Err(PredictionError::InvalidJson)
        ));
        assert!(matches!(parse_payload(b""), Err(PredictionError::InvalidJson)));
    }

    #[test]
    fn test_resolve_prefers_model_names() {
        let model = LinearModel::new(vec![1.0], 0.0).with_feature_names(vec!["G1".into()]);
        let fallback = FeatureNames::new(vec!["other".into()]);
        let resolved = resolve_feature_order(&model, Some(&fallback)).unwrap();
        assert_eq!(resolved, &["G1".to_string()][..]);
    }

    #[test]
    fn test_resolve_falls_back_to_feature_list() {
        let model = LinearModel::new(vec![1.0], 0.0);
        let fallback = FeatureNames::new(vec!["G1".into()]);
        let resolved = resolve_feature_order(&model, Some(&fallback)).unwrap();
        assert_eq!(resolved, fallback.as_slice());
    }

    #[test]
    fn test_resolve_without_metadata() {
        let model = LinearModel::new(vec![1.0], 0.0);
        let err = resolve_feature_order(&model, None).unwrap_err();
        assert_eq!(err.to_string(), "model does not declare its input features");
    }

    #[test]
    fn test_feature_names_validate() {
        assert!(FeatureNames::new(order()).validate().is_ok());
        assert!(FeatureNames::new(vec![]).validate().is_err());
        assert!(FeatureNames::new(vec!["G1".into(), " ".into()])
            .validate()
            .is_err());
        assert!(FeatureNames::new(vec!["G1".into(), "G1".into()])
            .validate()
            .is_err());
    }

    #[test]
    fn test_feature_names_from_csv_header() {
        let path = std::env::temp_dir().join(format!(
            "perf_predictor_{}_features.csv",
            std::process::id()
        ));
        std::fs::write(&path, "G1, G2,studytime,absences,avg_grade\n15,16,3,2,14.5\n").unwrap();
        let names = FeatureNames::load(&path).unwrap();
        assert_eq!(names.as_slice(), &order()[..]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_feature_names_from_json() {
        let path = std::env::temp_dir().join(format!(
            "perf_predictor_{}_features.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"["G1", "G2"]"#).unwrap();
        let names = FeatureNames::load(&path).unwrap();
        assert_eq!(names.len(), 2);
        std::fs::remove_file(path).ok();
    }
}
