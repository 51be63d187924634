//! Agronomic thresholds and checks for maize planting conditions

// ============================================================================
// Planting Condition Bands
// ============================================================================

/// Lower bound of the favorable air temperature band (°C)
pub const MIN_PLANTING_TEMP_C: f64 = 18.0;

/// Upper bound of the favorable air temperature band (°C)
pub const MAX_PLANTING_TEMP_C: f64 = 30.0;

/// Lower bound of the favorable daily rainfall band (mm)
pub const MIN_PLANTING_RAINFALL_MM: f64 = 2.0;

/// Upper bound of the favorable daily rainfall band (mm)
pub const MAX_PLANTING_RAINFALL_MM: f64 = 20.0;

/// Soil moisture must be strictly above this to count as favorable
pub const MIN_SOIL_MOISTURE: f64 = 0.2;

/// Check if air temperature is in the favorable band (18-30°C inclusive)
pub fn is_favorable_temperature(temperature: f64) -> bool {
    (MIN_PLANTING_TEMP_C..=MAX_PLANTING_TEMP_C).contains(&temperature)
}

/// Check if rainfall is in the favorable band (2-20mm inclusive)
pub fn is_favorable_rainfall(rainfall: f64) -> bool {
    (MIN_PLANTING_RAINFALL_MM..=MAX_PLANTING_RAINFALL_MM).contains(&rainfall)
}

/// Check if soil moisture is above the favorable threshold
pub fn is_favorable_soil_moisture(soil_moisture: f64) -> bool {
    soil_moisture > MIN_SOIL_MOISTURE
}

// ============================================================================
// Model Output Validations
// ============================================================================

/// Validate that a raw model output can be turned into a decision
pub fn validate_prediction_value(value: f64) -> Result<(), &'static str> {
    if value.is_nan() {
        return Err("Model produced NaN");
    }
    if value.is_infinite() {
        return Err("Model produced an infinite value");
    }
    Ok(())
}
