//! Linear regression model

use planting_shared::{ensure_feature_count, FeatureVector, PlantingModel, PredictionError};
use serde::{Deserialize, Serialize};

/// `intercept + Σ coefficient[i] * feature[i]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl PlantingModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        ensure_feature_count(self.coefficients.len())?;

        let weighted: f64 = self
            .coefficients
            .iter()
            .zip(features.as_array())
            .map(|(weight, value)| weight * value)
            .sum();

        Ok(self.intercept + weighted)
    }

    fn describe(&self) -> String {
        format!("linear regression ({} coefficients)", self.coefficients.len())
    }
}
