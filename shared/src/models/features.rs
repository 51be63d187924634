//! Model feature vector and its derivation from an observation
//!
//! The trained model consumes exactly [`FEATURE_COUNT`] values in the order of
//! [`Feature`]. Values are always written and read through a `Feature` key so
//! the ordering lives in one place.

use std::f64::consts::PI;
use std::ops::{Index, IndexMut};

use chrono::Datelike;
use serde::Serialize;

use crate::models::Observation;
use crate::validation::{
    is_favorable_rainfall, is_favorable_soil_moisture, is_favorable_temperature,
};

/// Number of model inputs
pub const FEATURE_COUNT: usize = 14;

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "temperature",
    "rainfall",
    "soil_moisture",
    "temp_7d_avg",
    "rainfall_7d_sum",
    "soil_7d_avg",
    "temp_trend",
    "rainfall_trend",
    "soil_trend",
    "month",
    "day_of_year",
    "sin_day",
    "cos_day",
    "planting_score",
];

const DAYS_PER_YEAR: f64 = 365.25;

/// One model input; the discriminant is its position in the vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Feature {
    Temperature = 0,
    Rainfall = 1,
    SoilMoisture = 2,
    Temp7dAvg = 3,
    Rainfall7dSum = 4,
    Soil7dAvg = 5,
    TempTrend = 6,
    RainfallTrend = 7,
    SoilTrend = 8,
    Month = 9,
    DayOfYear = 10,
    SinDay = 11,
    CosDay = 12,
    PlantingScore = 13,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Temperature,
        Feature::Rainfall,
        Feature::SoilMoisture,
        Feature::Temp7dAvg,
        Feature::Rainfall7dSum,
        Feature::Soil7dAvg,
        Feature::TempTrend,
        Feature::RainfallTrend,
        Feature::SoilTrend,
        Feature::Month,
        Feature::DayOfYear,
        Feature::SinDay,
        Feature::CosDay,
        Feature::PlantingScore,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        FEATURE_NAMES[self as usize]
    }
}

/// Ordered model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Iterate `(feature, value)` pairs in model order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL
            .into_iter()
            .map(move |f| (f, self.0[f.index()]))
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

impl IndexMut<Feature> for FeatureVector {
    fn index_mut(&mut self, feature: Feature) -> &mut f64 {
        &mut self.0[feature.index()]
    }
}

/// Coarse favorability score from the current conditions.
///
/// Each of temperature, rainfall and soil moisture contributes 1.0 when in
/// its favorable band and 0.5 otherwise; the score is their mean, so it is
/// one of 0.5, 2/3, 5/6 or 1.0. This approximates the finer score the model
/// was trained against.
pub fn planting_score(observation: &Observation) -> f64 {
    let band = |favorable: bool| if favorable { 1.0 } else { 0.5 };

    let temp_score = band(is_favorable_temperature(observation.temperature));
    let rain_score = band(is_favorable_rainfall(observation.rainfall));
    let soil_score = band(is_favorable_soil_moisture(observation.soil_moisture));

    (temp_score + rain_score + soil_score) / 3.0
}

/// Derive the model input from an observation and the reference date
pub fn build_features<D: Datelike>(observation: &Observation, reference: &D) -> FeatureVector {
    let day_of_year = reference.ordinal() as f64;
    let angle = 2.0 * PI * day_of_year / DAYS_PER_YEAR;

    let mut features = FeatureVector([0.0; FEATURE_COUNT]);

    features[Feature::Temperature] = observation.temperature;
    features[Feature::Rainfall] = observation.rainfall;
    features[Feature::SoilMoisture] = observation.soil_moisture;
    features[Feature::Temp7dAvg] = observation.temp_7d_avg;
    features[Feature::Rainfall7dSum] = observation.rainfall_7d_sum;
    features[Feature::Soil7dAvg] = observation.soil_7d_avg;

    // Deviation from the rolling 7-day baseline
    features[Feature::TempTrend] = observation.temperature - observation.temp_7d_avg;
    features[Feature::RainfallTrend] = observation.rainfall - observation.rainfall_7d_sum / 7.0;
    features[Feature::SoilTrend] = observation.soil_moisture - observation.soil_7d_avg;

    features[Feature::Month] = reference.month() as f64;
    features[Feature::DayOfYear] = day_of_year;
    features[Feature::SinDay] = angle.sin();
    features[Feature::CosDay] = angle.cos();

    features[Feature::PlantingScore] = planting_score(observation);

    features
}
