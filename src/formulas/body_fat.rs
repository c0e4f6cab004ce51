//! Body-fat estimation formulas.
//!
//! All inputs are metric: circumferences and height in cm, skinfolds in mm,
//! weight in kg. Results are body-fat percentages.

use super::finite;
use crate::error::ComputeError;
use crate::types::Gender;

/// Siri equation: body fat % from body density (g/cm³).
///
/// ```text
/// BF% = 495 / density - 450
/// ```
///
/// A density of zero or below is a computation failure.
pub fn siri_body_fat(density: f64) -> Result<f64, ComputeError> {
    if !density.is_finite() || density <= 0.0 {
        return Err(ComputeError::ComputationFailure(format!(
            "body density {density:.5} is not positive"
        )));
    }
    finite(495.0 / density - 450.0, "body fat")
}

/// US Navy circumference method (men).
///
/// ```text
/// BF% = 495 / (1.0324 - 0.19077 × log10(waist - neck) + 0.15456 × log10(height)) - 450
/// ```
///
/// Clamped at 0. Fails if waist <= neck.
pub fn navy_male(waist_cm: f64, neck_cm: f64, height_cm: f64) -> Result<f64, ComputeError> {
    let d = waist_cm - neck_cm;
    if d <= 0.0 || height_cm <= 0.0 {
        return Err(ComputeError::ComputationFailure(
            "waist must exceed neck and height must be positive".to_string(),
        ));
    }

    let density = 1.0324 - 0.19077 * d.log10() + 0.15456 * height_cm.log10();
    Ok(siri_body_fat(density)?.max(0.0))
}

/// US Navy circumference method (women).
///
/// ```text
/// BF% = 495 / (1.29579 - 0.35004 × log10(waist + hip - neck) + 0.22100 × log10(height)) - 450
/// ```
///
/// Clamped at 0. Fails if waist + hip <= neck.
pub fn navy_female(
    waist_cm: f64,
    hip_cm: f64,
    neck_cm: f64,
    height_cm: f64,
) -> Result<f64, ComputeError> {
    let d = waist_cm + hip_cm - neck_cm;
    if d <= 0.0 || height_cm <= 0.0 {
        return Err(ComputeError::ComputationFailure(
            "waist plus hip must exceed neck and height must be positive".to_string(),
        ));
    }

    let density = 1.29579 - 0.35004 * d.log10() + 0.22100 * height_cm.log10();
    Ok(siri_body_fat(density)?.max(0.0))
}

/// Deurenberg BMI-based estimate.
///
/// ```text
/// BF% = 1.20 × BMI + 0.23 × age - 10.8 × sex - 5.4   (sex: 1 male, 0 female)
/// ```
pub fn deurenberg(bmi: f64, age: f64, gender: Gender) -> f64 {
    let sex = match gender {
        Gender::Male => 1.0,
        Gender::Female => 0.0,
    };
    1.20 * bmi + 0.23 * age - 10.8 * sex - 5.4
}

/// Jackson-Pollock 3-site body density (men).
///
/// `sum_mm` = triceps + subscapular + suprailiac.
pub fn jackson_pollock_male_density(sum_mm: f64, age: f64) -> f64 {
    1.10938 - 0.0008267 * sum_mm + 0.0000016 * sum_mm * sum_mm - 0.0002574 * age
}

/// Jackson-Pollock 4-site body density (women).
///
/// `sum_mm` = triceps + subscapular + suprailiac + thigh.
pub fn jackson_pollock_female_density(sum_mm: f64, age: f64) -> f64 {
    1.097 - 0.00046971 * sum_mm + 0.00000056 * sum_mm * sum_mm - 0.00012828 * age
}

/// Jackson-Pollock body fat for `gender` from a skinfold sum
pub fn jackson_pollock(sum_mm: f64, age: f64, gender: Gender) -> Result<f64, ComputeError> {
    let density = match gender {
        Gender::Male => jackson_pollock_male_density(sum_mm, age),
        Gender::Female => jackson_pollock_female_density(sum_mm, age),
    };
    siri_body_fat(density)
}

/// Reject results outside the plausible human range `[min, max]`
pub fn ensure_plausible(body_fat_pct: f64, min: f64, max: f64) -> Result<f64, ComputeError> {
    let value = finite(body_fat_pct, "body fat")?;
    if value < min || value > max {
        return Err(ComputeError::ComputationFailure(format!(
            "body fat {value:.1}% is outside the plausible range {min}-{max}%"
        )));
    }
    Ok(value)
}

/// Fat mass (kg) for a weight and body-fat percentage
pub fn fat_mass(weight_kg: f64, body_fat_pct: f64) -> f64 {
    weight_kg * body_fat_pct / 100.0
}

/// Lean mass (kg) for a weight and body-fat percentage.
///
/// ```text
/// LBM = weight × (1 - BF% / 100)
/// ```
pub fn lean_mass(weight_kg: f64, body_fat_pct: f64) -> f64 {
    weight_kg * (1.0 - body_fat_pct / 100.0)
}
