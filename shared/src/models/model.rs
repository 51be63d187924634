//! Trained model capability

use thiserror::Error;

use crate::models::{FeatureVector, FEATURE_COUNT};
use crate::validation::validate_prediction_value;

/// Failures raised while running inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Tree {tree} is malformed: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("Model contains no trees")]
    EmptyEnsemble,

    #[error("{reason} (raw value: {value})")]
    NonFinite { value: f64, reason: &'static str },
}

/// A regression model trained on the planting feature vector.
///
/// Implementations are immutable once loaded, so a single instance can serve
/// concurrent requests.
pub trait PlantingModel: std::fmt::Debug + Send + Sync {
    /// Raw suitability score for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError>;

    /// Short description used in logs
    fn describe(&self) -> String {
        "model".to_string()
    }
}

/// Run the model and reject outputs the decision policy cannot interpret
pub fn predict_finite(
    model: &dyn PlantingModel,
    features: &FeatureVector,
) -> Result<f64, PredictionError> {
    let value = model.predict(features)?;
    validate_prediction_value(value).map_err(|reason| PredictionError::NonFinite { value, reason })?;
    Ok(value)
}

/// Check that a model was built for exactly [`FEATURE_COUNT`] inputs
pub fn ensure_feature_count(actual: usize) -> Result<(), PredictionError> {
    if actual != FEATURE_COUNT {
        return Err(PredictionError::ShapeMismatch {
            expected: FEATURE_COUNT,
            actual,
        });
    }
    Ok(())
}
