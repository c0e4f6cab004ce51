//! healthcalc - Health and fitness calculation engine
//!
//! healthcalc turns user-entered body measurements into classified results
//! through a deterministic pipeline: validation → unit normalization →
//! formula computation → classification → result aggregation.
//!
//! ## Modules
//!
//! - **Calculators**: body fat, BMI, BMR and macros, heart-rate zones, ideal
//!   weight, water intake, blood pressure, sleep timing and quality, PHQ-9/GAD-7
//! - **History**: saved blood-pressure readings with sorting, summary and CSV export

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod formulas;
pub mod history;
pub mod normalizer;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use config::CalculatorConfig;
pub use error::{ComputeError, FieldError, FieldErrorKind, ValidationErrors};
pub use pipeline::{
    calculate, calculate_bmi, calculate_bmr, calculate_body_fat, calculate_heart_rate_zones,
    calculate_ideal_weight, calculate_macros, calculate_sleep_times, calculate_water_intake,
    check_blood_pressure, score_assessment, score_sleep_quality, CalculationRequest,
    HealthCalculator,
};

// History exports
pub use history::{BpReading, BpTracker, JsonFileRepository, NewReading, ReadingRepository};

/// healthcalc version
pub const HEALTHCALC_VERSION: &str = env!("CARGO_PKG_VERSION");
