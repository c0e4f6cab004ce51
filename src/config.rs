//! Calculator configuration
//!
//! Tunable constants that are not part of a published formula. Every section
//! has defaults, so a config file only needs the values it overrides.

use crate::error::ComputeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const MIN_CYCLE_MINUTES: u32 = 30;
const MAX_CYCLE_MINUTES: u32 = 180;
const MAX_FALL_ASLEEP_MINUTES: u32 = 120;

/// Sleep-cycle timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    /// Length of one sleep cycle (minutes)
    pub cycle_minutes: u32,
    /// Time it takes to fall asleep (minutes)
    pub fall_asleep_minutes: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            cycle_minutes: 90,
            fall_asleep_minutes: 14,
        }
    }
}

/// Post-computation plausibility band for body fat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyFatConfig {
    pub plausible_min: f64,
    pub plausible_max: f64,
}

impl Default for BodyFatConfig {
    fn default() -> Self {
        Self {
            plausible_min: 2.0,
            plausible_max: 70.0,
        }
    }
}

/// Water-intake coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub ml_per_kg: f64,
    pub ml_per_30_min_exercise: f64,
    pub hot_climate_ml: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            ml_per_kg: 35.0,
            ml_per_30_min_exercise: 350.0,
            hot_climate_ml: 500.0,
        }
    }
}

/// All calculator settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub sleep: SleepConfig,
    pub body_fat: BodyFatConfig,
    pub water: WaterConfig,
}

impl CalculatorConfig {
    /// Load config from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize config to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ComputeError> {
        debug!(path = %path.display(), "loading calculator config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject settings outside the ranges the calculators support
    pub fn check(&self) -> Result<(), ComputeError> {
        if !(MIN_CYCLE_MINUTES..=MAX_CYCLE_MINUTES).contains(&self.sleep.cycle_minutes) {
            return Err(ComputeError::Config(format!(
                "sleep.cycle_minutes must be between {MIN_CYCLE_MINUTES} and {MAX_CYCLE_MINUTES}"
            )));
        }
        if self.sleep.fall_asleep_minutes > MAX_FALL_ASLEEP_MINUTES {
            return Err(ComputeError::Config(format!(
                "sleep.fall_asleep_minutes must be at most {MAX_FALL_ASLEEP_MINUTES}"
            )));
        }
        if self.body_fat.plausible_min >= self.body_fat.plausible_max {
            return Err(ComputeError::Config(
                "body_fat.plausible_min must be below plausible_max".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.sleep.cycle_minutes, 90);
        assert_eq!(config.sleep.fall_asleep_minutes, 14);
        assert_eq!(config.body_fat.plausible_min, 2.0);
        assert_eq!(config.body_fat.plausible_max, 70.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CalculatorConfig::from_json(r#"{"sleep": {"fall_asleep_minutes": 20}}"#)
            .unwrap();
        assert_eq!(config.sleep.fall_asleep_minutes, 20);
        assert_eq!(config.sleep.cycle_minutes, 90);
        assert_eq!(config.water, WaterConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = CalculatorConfig::default();
        config.water.hot_climate_ml = 750.0;
        let loaded = CalculatorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(CalculatorConfig::from_json(r#"{"sleep": {"cycle_minutes": 0}}"#).is_err());
        assert!(
            CalculatorConfig::from_json(r#"{"sleep": {"cycle_minutes": 1000000000}}"#).is_err()
        );
        assert!(
            CalculatorConfig::from_json(r#"{"sleep": {"fall_asleep_minutes": 4000000000}}"#)
                .is_err()
        );
        assert!(CalculatorConfig::from_json(
            r#"{"body_fat": {"plausible_min": 50, "plausible_max": 10}}"#
        )
        .is_err());
        assert!(CalculatorConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"water": {"ml_per_kg": 30}}"#).unwrap();

        let config = CalculatorConfig::load(&path).unwrap();
        assert_eq!(config.water.ml_per_kg, 30.0);
    }
}
