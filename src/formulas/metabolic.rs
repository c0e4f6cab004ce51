//! Energy expenditure and macronutrient formulas.
//!
//! # References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy
//!   expenditure. *Am J Clin Nutr*, 51(2), 241-247.
//! - Roza, A.M., & Shizgal, H.M. (1984). The Harris Benedict equation reevaluated.
//!   *Am J Clin Nutr*, 40(1), 168-182.
//! - McArdle, W.D., Katch, F.I., & Katch, V.L. *Exercise Physiology*.

use super::body_fat::lean_mass;
use crate::types::{ActivityLevel, Gender, Goal};

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Mifflin-St Jeor BMR (kcal/day).
///
/// ```text
/// BMR = 10 × kg + 6.25 × cm - 5 × age + 5     (men)
/// BMR = 10 × kg + 6.25 × cm - 5 × age - 161   (women)
/// ```
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: f64, gender: Gender) -> f64 {
    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age + offset
}

/// Revised Harris-Benedict BMR (kcal/day)
pub fn harris_benedict(weight_kg: f64, height_cm: f64, age: f64, gender: Gender) -> f64 {
    match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    }
}

/// Katch-McArdle BMR (kcal/day) from weight and body-fat percentage.
///
/// ```text
/// BMR = 370 + 21.6 × LBM,   LBM = kg × (1 - BF% / 100)
/// ```
pub fn katch_mcardle(weight_kg: f64, body_fat_pct: f64) -> f64 {
    370.0 + 21.6 * lean_mass(weight_kg, body_fat_pct)
}

impl ActivityLevel {
    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }
}

/// Percentage split of calories across macronutrients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

impl Goal {
    /// Factor applied to TDEE for this goal
    pub fn calorie_factor(&self) -> f64 {
        match self {
            Goal::Lose => 0.8,
            Goal::Maintain => 1.0,
            Goal::Gain => 1.1,
            Goal::Performance => 1.15,
        }
    }

    pub fn macro_split(&self) -> MacroSplit {
        let (protein_pct, carbs_pct, fat_pct) = match self {
            Goal::Lose => (35.0, 30.0, 35.0),
            Goal::Maintain => (30.0, 40.0, 30.0),
            Goal::Gain => (30.0, 45.0, 25.0),
            Goal::Performance => (25.0, 55.0, 20.0),
        };
        MacroSplit {
            protein_pct,
            carbs_pct,
            fat_pct,
        }
    }
}

/// Total daily energy expenditure
pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Daily calories adjusted for a goal
pub fn goal_calories(tdee: f64, goal: Goal) -> f64 {
    tdee * goal.calorie_factor()
}

/// Grams of a macronutrient supplying `pct` percent of `calories`
pub fn macro_grams(calories: f64, pct: f64, kcal_per_gram: f64) -> f64 {
    calories * pct / 100.0 / kcal_per_gram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mifflin_st_jeor_male() {
        let bmr = mifflin_st_jeor(70.0, 175.0, 30.0, Gender::Male);
        assert!((bmr - 1673.75).abs() < 1e-9);
    }

    #[test]
    fn test_mifflin_st_jeor_female_offset() {
        let male = mifflin_st_jeor(60.0, 165.0, 28.0, Gender::Male);
        let female = mifflin_st_jeor(60.0, 165.0, 28.0, Gender::Female);
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_harris_benedict() {
        let bmr = harris_benedict(70.0, 175.0, 30.0, Gender::Male);
        let expected = 88.362 + 13.397 * 70.0 + 4.799 * 175.0 - 5.677 * 30.0;
        assert!((bmr - expected).abs() < 1e-9);
    }

    #[test]
    fn test_katch_mcardle() {
        // LBM = 80 × 0.8 = 64 kg
        assert!((katch_mcardle(80.0, 20.0) - (370.0 + 21.6 * 64.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tdee_and_goal() {
        let t = tdee(1500.0, ActivityLevel::Moderate);
        assert!((t - 2325.0).abs() < 1e-9);
        assert!((goal_calories(t, Goal::Lose) - 1860.0).abs() < 1e-9);
        assert!((goal_calories(t, Goal::Performance) - 2673.75).abs() < 1e-9);
    }

    #[test]
    fn test_macro_splits_sum_to_100() {
        for goal in [Goal::Lose, Goal::Maintain, Goal::Gain, Goal::Performance] {
            let s = goal.macro_split();
            assert!((s.protein_pct + s.carbs_pct + s.fat_pct - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_macro_grams() {
        assert!((macro_grams(2000.0, 30.0, KCAL_PER_GRAM_PROTEIN) - 150.0).abs() < 1e-9);
        assert!((macro_grams(1800.0, 35.0, KCAL_PER_GRAM_FAT) - 70.0).abs() < 1e-9);
    }
}
