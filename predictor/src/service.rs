//! Prediction service: one observation payload in, one planting decision out

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, Utc};
use planting_shared::{
    build_features, decide_with_reason, predict_finite, Decision, Observation, PlantingModel,
};
use serde_json::Value;

use crate::config::ModelConfig;
use crate::error::{AppError, AppResult};
use crate::model::load_model;

/// Serves a single prediction request
#[derive(Debug, Clone)]
pub struct PredictionService {
    model_path: PathBuf,
}

impl PredictionService {
    /// Create a new PredictionService instance
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            model_path: PathBuf::from(&config.path),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Handle one raw request payload against the configured model artifact.
    ///
    /// The payload is checked before the model is loaded, so bad input never
    /// touches the filesystem.
    pub fn handle(&self, input: &str) -> AppResult<Decision> {
        let observation = parse_observation(input)?;
        let model = load_model(self.model_path())?;

        predict(
            model.as_ref(),
            &observation,
            Local::now().date_naive(),
            Utc::now(),
        )
    }
}

/// Read the whole request from `reader`
pub fn read_request<R: Read>(mut reader: R) -> AppResult<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("Failed to read request from stdin")?;

    String::from_utf8(bytes)
        .map_err(|_| AppError::MalformedInput("Input is not valid UTF-8".to_string()))
}

/// Decode a request payload into an observation
pub fn parse_observation(input: &str) -> AppResult<Observation> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::MalformedInput(
            "No input data provided via stdin".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(input)
        .map_err(|e| AppError::MalformedInput(format!("Invalid JSON: {}", e)))?;

    Ok(Observation::from_value(&value)?)
}

/// Run the full pipeline for one observation
pub fn predict(
    model: &dyn PlantingModel,
    observation: &Observation,
    reference_date: NaiveDate,
    timestamp: DateTime<Utc>,
) -> AppResult<Decision> {
    let features = build_features(observation, &reference_date);
    let named: Vec<(&str, f64)> = features.iter().map(|(f, v)| (f.name(), v)).collect();
    tracing::debug!(features = ?named, %reference_date, "Prepared feature vector");

    let prediction_value = predict_finite(model, &features)?;
    tracing::debug!(prediction_value, model = %model.describe(), "Model prediction");

    let (decision, reason) = decide_with_reason(prediction_value, &features, timestamp);

    match (decision.days_to_optimal, reason) {
        (Some(days), Some(reason)) => {
            tracing::info!(
                confidence = decision.confidence,
                days_to_optimal = days,
                %reason,
                "Planting not recommended"
            );
        }
        _ => {
            tracing::info!(confidence = decision.confidence, "Planting recommended");
        }
    }

    Ok(decision)
}
