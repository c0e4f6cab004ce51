//! Unit normalization
//!
//! This module converts caller-entered measurements into the metric units the
//! formula engine works in:
//! - Lengths (height, circumferences) to centimeters
//! - Mass to kilograms
//! - Skinfold thickness to millimeters
//!
//! Conversions are total over finite reals; range checking is the validator's job.

use crate::types::{MeasurementInput, MetricMeasurements, UnitSystem};
use serde::{Deserialize, Serialize};

pub const CM_PER_INCH: f64 = 2.54;
pub const CM_PER_FOOT: f64 = 30.48;
pub const MM_PER_INCH: f64 = 25.4;
pub const KG_PER_POUND: f64 = 0.453_592_37;
pub const ML_PER_FLUID_OUNCE: f64 = 29.573_529_562_5;

/// Unit for body lengths (height, circumferences)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Centimeters,
    Meters,
    Inches,
    Feet,
}

/// Unit for body mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    Kilograms,
    Pounds,
}

/// Unit for skinfold thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmallLengthUnit {
    Millimeters,
    Inches,
}

impl MassUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Kilograms => "kg",
            MassUnit::Pounds => "lb",
        }
    }
}

impl UnitSystem {
    pub fn length_unit(&self) -> LengthUnit {
        match self {
            UnitSystem::Metric => LengthUnit::Centimeters,
            UnitSystem::Imperial => LengthUnit::Inches,
        }
    }

    pub fn mass_unit(&self) -> MassUnit {
        match self {
            UnitSystem::Metric => MassUnit::Kilograms,
            UnitSystem::Imperial => MassUnit::Pounds,
        }
    }

    pub fn skinfold_unit(&self) -> SmallLengthUnit {
        match self {
            UnitSystem::Metric => SmallLengthUnit::Millimeters,
            UnitSystem::Imperial => SmallLengthUnit::Inches,
        }
    }
}

/// Convert a length to centimeters
pub fn to_metric_length(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Centimeters => value,
        LengthUnit::Meters => value * 100.0,
        LengthUnit::Inches => value * CM_PER_INCH,
        LengthUnit::Feet => value * CM_PER_FOOT,
    }
}

/// Convert centimeters to `unit`
pub fn from_metric_length(cm: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Centimeters => cm,
        LengthUnit::Meters => cm / 100.0,
        LengthUnit::Inches => cm / CM_PER_INCH,
        LengthUnit::Feet => cm / CM_PER_FOOT,
    }
}

/// Convert a mass to kilograms
pub fn to_metric_mass(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilograms => value,
        MassUnit::Pounds => value * KG_PER_POUND,
    }
}

/// Convert kilograms to `unit`
pub fn from_metric_mass(kg: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kilograms => kg,
        MassUnit::Pounds => kg / KG_PER_POUND,
    }
}

/// Convert a skinfold thickness to millimeters
pub fn to_metric_small_length(value: f64, unit: SmallLengthUnit) -> f64 {
    match unit {
        SmallLengthUnit::Millimeters => value,
        SmallLengthUnit::Inches => value * MM_PER_INCH,
    }
}

/// Convert millimeters to `unit`
pub fn from_metric_small_length(mm: f64, unit: SmallLengthUnit) -> f64 {
    match unit {
        SmallLengthUnit::Millimeters => mm,
        SmallLengthUnit::Inches => mm / MM_PER_INCH,
    }
}

/// Normalizer for converting raw measurements to metric
pub struct Normalizer;

impl Normalizer {
    /// Normalize a measurement input to metric units
    pub fn normalize(input: &MeasurementInput) -> MetricMeasurements {
        let length = input.unit_system.length_unit();
        let mass = input.unit_system.mass_unit();
        let skinfold = input.unit_system.skinfold_unit();

        let len = |v: Option<f64>| v.map(|v| to_metric_length(v, length));
        let fold = |v: Option<f64>| v.map(|v| to_metric_small_length(v, skinfold));

        MetricMeasurements {
            gender: input.gender,
            age: input.age,
            height_cm: len(input.height),
            weight_kg: input.weight.map(|v| to_metric_mass(v, mass)),
            neck_cm: len(input.neck),
            waist_cm: len(input.waist),
            hip_cm: len(input.hip),
            triceps_mm: fold(input.triceps),
            subscapular_mm: fold(input.subscapular),
            suprailiac_mm: fold(input.suprailiac),
            thigh_mm: fold(input.thigh),
            body_fat_pct: input.body_fat_pct,
            resting_hr: input.resting_hr,
            max_hr: input.max_hr,
        }
    }
}
