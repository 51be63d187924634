//! Planting decision derived from a model prediction

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Feature, FeatureVector};
use crate::validation::{
    MAX_PLANTING_RAINFALL_MM, MAX_PLANTING_TEMP_C, MIN_PLANTING_RAINFALL_MM, MIN_PLANTING_TEMP_C,
};

/// Version tag reported with every decision
pub const MODEL_VERSION: &str = "1.0";

/// Predictions at or above this value recommend planting
pub const PLANTING_THRESHOLD: f64 = 0.5;

/// Shortest wait ever suggested, and the default when no rule applies
pub const MIN_WAIT_DAYS: u32 = 7;

/// Wait suggested when it is too dry to plant
pub const DRY_SEASON_WAIT_DAYS: u32 = 14;

/// Wait suggested for waterlogged fields
pub const DRAINAGE_WAIT_DAYS: u32 = 7;

/// Upper bound on any wait estimate
pub const MAX_WAIT_DAYS: u32 = 180;

/// Planting recommendation for one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub should_plant: bool,
    /// Always within [0, 1]
    pub confidence: f64,
    pub prediction_value: f64,
    pub prediction_probability: PredictionProbability,
    /// Only set when planting is not recommended
    pub days_to_optimal: Option<u32>,
    pub model_version: String,
    pub prediction_timestamp: DateTime<Utc>,
}

/// Confidence split across both outcomes; the pair sums to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionProbability {
    pub no_plant: f64,
    pub plant: f64,
}

/// Why planting should be postponed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitReason {
    TooCold,
    TooHot,
    TooDry,
    TooWet,
    /// Temperature and rainfall look fine but the model still declines
    Unfavorable,
}

impl std::fmt::Display for WaitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitReason::TooCold => write!(f, "Too cold"),
            WaitReason::TooHot => write!(f, "Too hot"),
            WaitReason::TooDry => write!(f, "Too dry"),
            WaitReason::TooWet => write!(f, "Too wet"),
            WaitReason::Unfavorable => write!(f, "Unfavorable conditions"),
        }
    }
}

/// Map a raw prediction to `(should_plant, confidence)`
pub fn confidence_for(prediction_value: f64) -> (bool, f64) {
    if prediction_value >= PLANTING_THRESHOLD {
        (true, prediction_value.min(1.0))
    } else {
        (false, (1.0 - prediction_value).min(1.0))
    }
}

/// Estimate how long to wait for better conditions.
///
/// Only temperature and rainfall are considered; the first matching rule wins.
pub fn estimate_wait(features: &FeatureVector) -> (WaitReason, u32) {
    let temperature = features[Feature::Temperature];
    let rainfall = features[Feature::Rainfall];

    if temperature < MIN_PLANTING_TEMP_C {
        (WaitReason::TooCold, scaled_wait((MIN_PLANTING_TEMP_C - temperature) * 2.0))
    } else if temperature > MAX_PLANTING_TEMP_C {
        (WaitReason::TooHot, scaled_wait((temperature - MAX_PLANTING_TEMP_C) * 1.5))
    } else if rainfall < MIN_PLANTING_RAINFALL_MM {
        (WaitReason::TooDry, DRY_SEASON_WAIT_DAYS)
    } else if rainfall > MAX_PLANTING_RAINFALL_MM {
        (WaitReason::TooWet, DRAINAGE_WAIT_DAYS)
    } else {
        (WaitReason::Unfavorable, MIN_WAIT_DAYS)
    }
}

fn scaled_wait(days: f64) -> u32 {
    days.round().clamp(MIN_WAIT_DAYS as f64, MAX_WAIT_DAYS as f64) as u32
}

/// Turn a model prediction into a planting decision
pub fn decide(prediction_value: f64, features: &FeatureVector, timestamp: DateTime<Utc>) -> Decision {
    decide_with_reason(prediction_value, features, timestamp).0
}

/// Like [`decide`], also returning the rule that set `days_to_optimal`
pub fn decide_with_reason(
    prediction_value: f64,
    features: &FeatureVector,
    timestamp: DateTime<Utc>,
) -> (Decision, Option<WaitReason>) {
    let (should_plant, confidence) = confidence_for(prediction_value);

    let prediction_probability = if should_plant {
        PredictionProbability {
            no_plant: 1.0 - confidence,
            plant: confidence,
        }
    } else {
        PredictionProbability {
            no_plant: confidence,
            plant: 1.0 - confidence,
        }
    };

    let wait = if should_plant {
        None
    } else {
        Some(estimate_wait(features))
    };

    let decision = Decision {
        should_plant,
        confidence,
        prediction_value,
        prediction_probability,
        days_to_optimal: wait.map(|(_, days)| days),
        model_version: MODEL_VERSION.to_string(),
        prediction_timestamp: timestamp,
    };

    (decision, wait.map(|(reason, _)| reason))
}
