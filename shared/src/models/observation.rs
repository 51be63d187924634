//! Weather and soil observation snapshot

use serde_json::{Map, Value};
use thiserror::Error;

/// A weather/soil snapshot supplied by the caller for one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Current air temperature (°C)
    pub temperature: f64,
    /// Current rainfall (mm)
    pub rainfall: f64,
    /// Volumetric soil moisture (0-1)
    pub soil_moisture: f64,
    pub temp_7d_avg: f64,
    pub rainfall_7d_sum: f64,
    pub soil_7d_avg: f64,
}

/// Reasons a raw payload cannot be read as an [`Observation`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    #[error("Missing required weather data field: '{0}'")]
    MissingField(&'static str),

    #[error("Weather data field '{field}' must be a number, got {found}")]
    NotNumeric {
        field: &'static str,
        found: &'static str,
    },

    #[error("Weather data must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl Observation {
    /// Read an observation from a decoded JSON payload.
    ///
    /// Unknown keys are ignored. A key holding `null` counts as absent.
    pub fn from_value(value: &Value) -> Result<Self, ObservationError> {
        let fields = value
            .as_object()
            .ok_or_else(|| ObservationError::NotAnObject(json_type_name(value)))?;

        Ok(Self {
            temperature: number_field(fields, "temperature")?,
            rainfall: number_field(fields, "rainfall")?,
            soil_moisture: number_field(fields, "soil_moisture")?,
            temp_7d_avg: number_field(fields, "temp_7d_avg")?,
            rainfall_7d_sum: number_field(fields, "rainfall_7d_sum")?,
            soil_7d_avg: number_field(fields, "soil_7d_avg")?,
        })
    }
}

fn number_field(fields: &Map<String, Value>, name: &'static str) -> Result<f64, ObservationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(ObservationError::MissingField(name)),
        Some(value) => value.as_f64().ok_or(ObservationError::NotNumeric {
            field: name,
            found: json_type_name(value),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
