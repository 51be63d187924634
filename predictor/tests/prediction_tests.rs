//! End-to-end prediction tests
//!
//! Tests for the full request pipeline including:
//! - Decisions for favorable and unfavorable conditions
//! - Uniform failure payloads for each error kind
//! - Loading model artifacts from disk

use chrono::{NaiveDate, Utc};
use maize_planting_predictor::config::ModelConfig;
use maize_planting_predictor::model::{Aggregation, LinearModel, RegressionTree, TreeEnsemble};
use maize_planting_predictor::service::{parse_observation, predict};
use maize_planting_predictor::{AppError, PredictionService};
use planting_shared::{
    Feature, FeatureVector, PlantingModel, PredictionError, FEATURE_COUNT, FEATURE_NAMES,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const FAVORABLE: &str = r#"{
    "temperature": 25,
    "rainfall": 10,
    "soil_moisture": 0.3,
    "temp_7d_avg": 23,
    "rainfall_7d_sum": 50,
    "soil_7d_avg": 0.25
}"#;

const COLD: &str = r#"{
    "temperature": 10,
    "rainfall": 10,
    "soil_moisture": 0.3,
    "temp_7d_avg": 12,
    "rainfall_7d_sum": 50,
    "soil_7d_avg": 0.25
}"#;

fn april() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
}

/// Linear model that ignores its inputs
fn constant_model(value: f64) -> LinearModel {
    LinearModel {
        intercept: value,
        coefficients: vec![0.0; FEATURE_COUNT],
    }
}

/// Echoes the planting score back as the prediction
fn score_model() -> LinearModel {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[Feature::PlantingScore.index()] = 1.0;
    LinearModel {
        intercept: 0.0,
        coefficients,
    }
}

/// Records the vector it was asked to score
#[derive(Debug, Default)]
struct RecordingModel {
    seen: std::sync::Mutex<Option<FeatureVector>>,
}

impl PlantingModel for RecordingModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(*features);
        }
        Ok(0.9)
    }
}

fn write_artifact(dir: &tempfile::TempDir, artifact: &Value) -> PredictionService {
    let path = dir.path().join("maize_planting_model.json");
    std::fs::write(&path, artifact.to_string()).unwrap();
    PredictionService::new(&ModelConfig {
        path: path.to_string_lossy().into_owned(),
    })
}

fn payload(err: &AppError) -> Value {
    serde_json::to_value(err.to_payload(Utc::now())).unwrap()
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn test_plant_recommended() {
        let observation = parse_observation(FAVORABLE).unwrap();
        let decision = predict(&constant_model(0.7), &observation, april(), Utc::now()).unwrap();

        assert!(decision.should_plant);
        assert!((decision.confidence - 0.7).abs() < 1e-12);
        assert_eq!(decision.days_to_optimal, None);
        assert_eq!(decision.model_version, "1.0");
    }

    #[test]
    fn test_too_cold_waits() {
        let observation = parse_observation(COLD).unwrap();
        let decision = predict(&constant_model(0.2), &observation, april(), Utc::now()).unwrap();

        assert!(!decision.should_plant);
        assert!((decision.confidence - 0.8).abs() < 1e-12);
        assert_eq!(decision.days_to_optimal, Some(16));
    }

    #[test]
    fn test_model_sees_feature_vector_in_order() {
        let observation = parse_observation(FAVORABLE).unwrap();
        let model = RecordingModel::default();
        predict(&model, &observation, april(), Utc::now()).unwrap();

        let seen = (*model.seen.lock().unwrap()).expect("model was called");
        assert_eq!(seen[Feature::Temperature], 25.0);
        assert_eq!(seen[Feature::Rainfall], 10.0);
        assert_eq!(seen[Feature::Month], 4.0);
        // 31 + 29 + 31 + 15
        assert_eq!(seen[Feature::DayOfYear], 106.0);
        assert_eq!(seen[Feature::PlantingScore], 1.0);
        assert!((seen[Feature::TempTrend] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_driven_model() {
        // planting_score = (0.5 + 1.0 + 1.0) / 3 for the cold observation
        let observation = parse_observation(COLD).unwrap();
        let decision = predict(&score_model(), &observation, april(), Utc::now()).unwrap();
        assert!(decision.should_plant);
        assert!((decision.prediction_value - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_soil_moisture_payload() {
        let err = parse_observation(
            r#"{"temperature": 25, "rainfall": 10, "temp_7d_avg": 23,
                "rainfall_7d_sum": 50, "soil_7d_avg": 0.25}"#,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::MissingField { ref field } if field == "soil_moisture"));
        let json = payload(&err);
        assert_eq!(json["error"], true);
        assert_eq!(json["code"], "MISSING_FIELD");
        assert!(json["message"].as_str().unwrap().contains("soil_moisture"));
    }

    #[test]
    fn test_non_finite_prediction_is_an_error() {
        let mut model = constant_model(0.0);
        model.coefficients[Feature::Rainfall7dSum.index()] = f64::MAX;
        let observation = parse_observation(FAVORABLE).unwrap();

        let err = predict(&model, &observation, april(), Utc::now()).unwrap_err();
        assert_eq!(err.code(), "PREDICTION_ERROR");
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let model = LinearModel {
            intercept: 0.5,
            coefficients: vec![0.1; 12],
        };
        let observation = parse_observation(FAVORABLE).unwrap();

        let err = predict(&model, &observation, april(), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Prediction(PredictionError::ShapeMismatch { expected: 14, actual: 12 })
        ));
        assert_eq!(payload(&err)["code"], "PREDICTION_ERROR");
    }
}

// ============================================================================
// Artifact Tests
// ============================================================================

#[cfg(test)]
mod artifact_tests {
    use super::*;

    #[test]
    fn test_handle_with_linear_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let service = write_artifact(
            &dir,
            &json!({
                "model": { "type": "linear", "intercept": 0.65, "coefficients": vec![0.0; FEATURE_COUNT] },
                "feature_names": FEATURE_NAMES,
            }),
        );

        let decision = service.handle(FAVORABLE).unwrap();
        assert!(decision.should_plant);
        assert!((decision.confidence - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_handle_with_forest_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let stump = RegressionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![Feature::Temperature.index() as i64, -2, -2],
            threshold: vec![18.0, -2.0, -2.0],
            value: vec![0.5, 0.1, 0.9],
        };
        let forest = TreeEnsemble {
            trees: vec![stump.clone(), stump],
            base_prediction: 0.0,
            aggregation: Aggregation::Mean,
            learning_rate: 1.0,
        };
        let mut artifact = serde_json::to_value(&forest).unwrap();
        artifact["type"] = json!("tree_ensemble");
        let service = write_artifact(&dir, &artifact);

        let warm = service.handle(FAVORABLE).unwrap();
        assert!(warm.should_plant);
        assert!((warm.prediction_value - 0.9).abs() < 1e-12);

        let cold = service.handle(COLD).unwrap();
        assert!(!cold.should_plant);
        assert_eq!(cold.days_to_optimal, Some(16));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(&ModelConfig {
            path: dir.path().join("absent.json").to_string_lossy().into_owned(),
        });

        let err = service.handle(FAVORABLE).unwrap_err();
        assert_eq!(err.code(), "MODEL_UNAVAILABLE");
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_bad_input_reported_before_model_load() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictionService::new(&ModelConfig {
            path: dir.path().join("absent.json").to_string_lossy().into_owned(),
        });

        let err = service.handle("not json").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_INPUT");
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maize_planting_model.json");
        std::fs::write(&path, [0x80, 0x04, 0x95]).unwrap();
        let service = PredictionService::new(&ModelConfig {
            path: path.to_string_lossy().into_owned(),
        });

        let err = service.handle(FAVORABLE).unwrap_err();
        assert_eq!(payload(&err)["code"], "MODEL_UNAVAILABLE");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn observation_json() -> impl Strategy<Value = Value> {
        (-10.0f64..45.0, 0.0f64..60.0, 0.0f64..0.8).prop_map(|(temperature, rainfall, soil)| {
            json!({
                "temperature": temperature,
                "rainfall": rainfall,
                "soil_moisture": soil,
                "temp_7d_avg": temperature - 1.0,
                "rainfall_7d_sum": rainfall * 7.0,
                "soil_7d_avg": soil,
                "station": "KE-NAK-01"
            })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_pipeline_always_produces_consistent_decision(
            input in observation_json(),
            intercept in -1.0f64..2.0
        ) {
            let observation = parse_observation(&input.to_string()).unwrap();
            let decision = predict(&constant_model(intercept), &observation, april(), Utc::now()).unwrap();

            prop_assert_eq!(decision.should_plant, intercept >= 0.5);
            prop_assert_eq!(decision.days_to_optimal.is_none(), decision.should_plant);
            let p = decision.prediction_probability;
            prop_assert!((p.plant + p.no_plant - 1.0).abs() < 1e-12);
        }

        #[test]
        fn prop_any_missing_field_is_reported(index in 0usize..6, input in observation_json()) {
            let field = FEATURE_NAMES[index];
            let mut input = input;
            input.as_object_mut().unwrap().remove(field);

            let err = parse_observation(&input.to_string()).unwrap_err();
            prop_assert_eq!(err.code(), "MISSING_FIELD");
            prop_assert!(err.to_string().contains(field));
        }
    }
}
