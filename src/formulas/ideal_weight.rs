//! Ideal body weight formulas.
//!
//! The classic formulas are linear in height above 5 ft (60 in); heights below
//! 5 ft extrapolate downward along the same line.

use crate::normalizer::CM_PER_INCH;
use crate::types::Gender;

/// BMI used by the BMI-based and Peterson formulas
pub const TARGET_BMI: f64 = 22.0;

/// Fraction either side of the average reported as the ideal range
pub const RANGE_FRACTION: f64 = 0.10;

/// Named ideal-weight formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdealWeightFormula {
    Hamwi,
    Devine,
    Robinson,
    Miller,
    BmiBased,
    Peterson,
}

impl IdealWeightFormula {
    pub const ALL: [IdealWeightFormula; 6] = [
        IdealWeightFormula::Hamwi,
        IdealWeightFormula::Devine,
        IdealWeightFormula::Robinson,
        IdealWeightFormula::Miller,
        IdealWeightFormula::BmiBased,
        IdealWeightFormula::Peterson,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IdealWeightFormula::Hamwi => "Hamwi",
            IdealWeightFormula::Devine => "Devine",
            IdealWeightFormula::Robinson => "Robinson",
            IdealWeightFormula::Miller => "Miller",
            IdealWeightFormula::BmiBased => "BMI",
            IdealWeightFormula::Peterson => "Peterson",
        }
    }

    /// Ideal weight in kg for a height in cm
    pub fn weight_kg(&self, height_cm: f64, gender: Gender) -> f64 {
        let inches_over_5ft = height_cm / CM_PER_INCH - 60.0;
        let height_m = height_cm / 100.0;

        // (base kg, kg per inch) for the linear formulas
        let linear = |male: (f64, f64), female: (f64, f64)| {
            let (base, per_inch) = match gender {
                Gender::Male => male,
                Gender::Female => female,
            };
            base + per_inch * inches_over_5ft
        };

        match self {
            IdealWeightFormula::Hamwi => linear((48.0, 2.7), (45.5, 2.2)),
            IdealWeightFormula::Devine => linear((50.0, 2.3), (45.5, 2.3)),
            IdealWeightFormula::Robinson => linear((52.0, 1.9), (49.0, 1.7)),
            IdealWeightFormula::Miller => linear((56.2, 1.41), (53.1, 1.36)),
            IdealWeightFormula::BmiBased => TARGET_BMI * height_m * height_m,
            IdealWeightFormula::Peterson => {
                2.2 * TARGET_BMI + 3.5 * TARGET_BMI * (height_m - 1.5)
            }
        }
    }
}

/// Mean of all formulas (kg)
pub fn average_ideal_weight(height_cm: f64, gender: Gender) -> f64 {
    let total: f64 = IdealWeightFormula::ALL
        .iter()
        .map(|f| f.weight_kg(height_cm, gender))
        .sum();
    total / IdealWeightFormula::ALL.len() as f64
}

/// Range (kg) around the average: average ± 10%
pub fn ideal_weight_range(average_kg: f64) -> (f64, f64) {
    (
        average_kg * (1.0 - RANGE_FRACTION),
        average_kg * (1.0 + RANGE_FRACTION),
    )
}
