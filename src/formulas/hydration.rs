//! Daily water intake

use crate::config::WaterConfig;
use crate::types::HydrationFactors;

pub const GLASS_ML: f64 = 250.0;

/// Recommended daily water (ml).
///
/// ```text
/// ml = kg × ml_per_kg + (exercise_minutes / 30) × ml_per_30_min + hot_climate_ml
/// ```
pub fn daily_water_ml(weight_kg: f64, factors: &HydrationFactors, config: &WaterConfig) -> f64 {
    let base = weight_kg * config.ml_per_kg;
    let exercise = factors.exercise_minutes / 30.0 * config.ml_per_30_min_exercise;
    let climate = if factors.hot_climate {
        config.hot_climate_ml
    } else {
        0.0
    };
    base + exercise + climate
}

/// Number of 250 ml glasses, rounded up
pub fn glasses(ml: f64) -> u32 {
    (ml / GLASS_ML).ceil().max(0.0) as u32
}
