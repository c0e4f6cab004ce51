//! Body mass index

/// Lowest BMI considered a healthy weight
pub const HEALTHY_BMI_MIN: f64 = 18.5;
/// Highest BMI considered a healthy weight
pub const HEALTHY_BMI_MAX: f64 = 24.9;

/// BMI = kg / m²
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let m = height_cm / 100.0;
    weight_kg / (m * m)
}

/// Weight (kg) giving `bmi` at `height_cm`
pub fn weight_for_bmi(bmi: f64, height_cm: f64) -> f64 {
    let m = height_cm / 100.0;
    bmi * m * m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert!((bmi(70.0, 175.0) - 22.857_142).abs() < 1e-5);
    }

    #[test]
    fn test_weight_for_bmi_inverts_bmi() {
        let w = weight_for_bmi(22.0, 180.0);
        assert!((bmi(w, 180.0) - 22.0).abs() < 1e-9);
    }
}
