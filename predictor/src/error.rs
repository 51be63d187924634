//! Error handling for the Maize Planting Predictor
//!
//! Every failure is reported to the caller as the same JSON payload shape.

use chrono::{DateTime, Utc};
use planting_shared::{ObservationError, PredictionError};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Missing required weather data field: '{field}'")]
    MissingField { field: String },

    #[error("Error making prediction: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable identifier for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AppError::MissingField { .. } => "MISSING_FIELD",
            AppError::Prediction(_) => "PREDICTION_ERROR",
            AppError::MalformedInput(_) => "MALFORMED_INPUT",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build the failure payload written to stdout
    pub fn to_payload(&self, timestamp: DateTime<Utc>) -> ErrorPayload {
        ErrorPayload {
            error: true,
            code: self.code().to_string(),
            message: self.to_string(),
            timestamp,
        }
    }
}

impl From<ObservationError> for AppError {
    fn from(err: ObservationError) -> Self {
        match err {
            ObservationError::MissingField(field) => AppError::MissingField {
                field: field.to_string(),
            },
            other => AppError::MalformedInput(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: bool,
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Result type alias for the predictor
pub type AppResult<T> = Result<T, AppError>;
