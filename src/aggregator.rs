//! Result aggregation
//!
//! Combines a formula's primary output with its classification and the derived
//! secondary metrics into one immutable record. Presentation only ever sees
//! these records, never the raw formula functions.

use crate::classifier::{self, Band};
use crate::error::ComputeError;
use crate::formulas::{blood_pressure, bmi, body_fat, heart_rate, hydration, ideal_weight};
use crate::formulas::{mental_health, metabolic, round_to, sleep};
use crate::normalizer::{from_metric_mass, MassUnit, ML_PER_FLUID_OUNCE};
use crate::types::{
    ActivityLevel, AssessmentInput, AssessmentResult, BloodPressureInput, BloodPressureResult,
    BmiResult, BmrMethod, BmrResult, BodyFatMethod, BodyFatResult, Category, Gender, Goal,
    HeartRateResult, HeartRateZone, IdealWeightEstimate, IdealWeightResult, MacroAmount,
    MacroResult, Range, SleepOption, SleepQualityInput, SleepQualityResult, SleepTarget,
    SleepTimesResult, TdeeEntry, WaterIntakeResult,
};

fn category_for(band: Option<&'static Band>, what: &str) -> Result<Category, ComputeError> {
    band.map(Band::to_category).ok_or_else(|| {
        ComputeError::ComputationFailure(format!("{what} could not be classified"))
    })
}

/// Aggregator for packaging calculator results
pub struct ResultAggregator;

impl ResultAggregator {
    /// Body fat with category, fat/lean mass and the ideal range for `gender`
    pub fn body_fat(
        method: BodyFatMethod,
        gender: Gender,
        body_fat_pct: f64,
        weight_kg: Option<f64>,
    ) -> Result<BodyFatResult, ComputeError> {
        let category = category_for(
            classifier::classify_body_fat(gender, body_fat_pct),
            "body fat",
        )?;
        let ideal = classifier::ideal_body_fat_band(gender);

        Ok(BodyFatResult {
            method,
            gender,
            body_fat_pct,
            category,
            fat_mass_kg: weight_kg.map(|w| body_fat::fat_mass(w, body_fat_pct)),
            lean_mass_kg: weight_kg.map(|w| body_fat::lean_mass(w, body_fat_pct)),
            ideal_range: Range {
                min: ideal.min,
                max: ideal.max.unwrap_or(ideal.min),
            },
        })
    }

    /// BMI with category and healthy weight range for the height
    pub fn bmi(value: f64, height_cm: f64) -> Result<BmiResult, ComputeError> {
        let category = category_for(classifier::classify(classifier::BMI, value), "BMI")?;

        Ok(BmiResult {
            bmi: value,
            category,
            healthy_weight_kg: Range {
                min: bmi::weight_for_bmi(bmi::HEALTHY_BMI_MIN, height_cm),
                max: bmi::weight_for_bmi(bmi::HEALTHY_BMI_MAX, height_cm),
            },
        })
    }

    /// BMR with a TDEE row for every activity level
    pub fn bmr(method: BmrMethod, bmr: f64, lean_body_mass_kg: Option<f64>) -> BmrResult {
        let tdee = ActivityLevel::ALL
            .iter()
            .map(|activity| TdeeEntry {
                activity: *activity,
                multiplier: activity.multiplier(),
                calories: metabolic::tdee(bmr, *activity),
            })
            .collect();

        BmrResult {
            method,
            bmr,
            lean_body_mass_kg,
            tdee,
        }
    }

    /// Calorie target and macro split for a goal
    pub fn macros(method: BmrMethod, bmr: f64, activity: ActivityLevel, goal: Goal) -> MacroResult {
        let tdee = metabolic::tdee(bmr, activity);
        let target_calories = metabolic::goal_calories(tdee, goal);
        let split = goal.macro_split();

        let amount = |percent: f64, kcal_per_gram: f64| MacroAmount {
            percent,
            grams: metabolic::macro_grams(target_calories, percent, kcal_per_gram),
            calories: target_calories * percent / 100.0,
        };

        MacroResult {
            method,
            bmr,
            activity,
            tdee,
            goal,
            target_calories,
            protein: amount(split.protein_pct, metabolic::KCAL_PER_GRAM_PROTEIN),
            carbs: amount(split.carbs_pct, metabolic::KCAL_PER_GRAM_CARBS),
            fat: amount(split.fat_pct, metabolic::KCAL_PER_GRAM_FAT),
        }
    }

    /// Training zones, VO2max estimate and resting-HR band
    pub fn heart_rate(
        max_hr: f64,
        max_hr_estimated: bool,
        resting_hr: Option<f64>,
    ) -> HeartRateResult {
        let zones = heart_rate::ZONES
            .iter()
            .map(|(zone, name, lo, hi)| HeartRateZone {
                zone: *zone,
                name: name.to_string(),
                min_pct: *lo,
                max_pct: *hi,
                min_bpm: heart_rate::target_hr(max_hr, resting_hr, *lo).round(),
                max_bpm: heart_rate::target_hr(max_hr, resting_hr, *hi).round(),
            })
            .collect();

        HeartRateResult {
            max_hr,
            max_hr_estimated,
            resting_hr,
            reserve: resting_hr.map(|rest| max_hr - rest),
            zones,
            vo2max_estimate: resting_hr.and_then(|rest| heart_rate::vo2max_uth(max_hr, rest)),
            resting_category: resting_hr
                .and_then(|rest| classifier::classify(classifier::RESTING_HEART_RATE, rest))
                .map(Band::to_category),
        }
    }

    /// Every ideal-weight formula, their average and the range around it.
    /// Values in the caller's unit are rounded to 0.1 for display.
    pub fn ideal_weight(height_cm: f64, gender: Gender, unit: MassUnit) -> IdealWeightResult {
        let estimates = ideal_weight::IdealWeightFormula::ALL
            .iter()
            .map(|formula| IdealWeightEstimate {
                formula: formula.name().to_string(),
                weight_kg: formula.weight_kg(height_cm, gender),
            })
            .collect();

        let average_kg = ideal_weight::average_ideal_weight(height_cm, gender);
        let (min_kg, max_kg) = ideal_weight::ideal_weight_range(average_kg);

        IdealWeightResult {
            estimates,
            average_kg,
            range_kg: Range {
                min: min_kg,
                max: max_kg,
            },
            average: round_to(from_metric_mass(average_kg, unit), 1),
            range: Range {
                min: round_to(from_metric_mass(min_kg, unit), 1),
                max: round_to(from_metric_mass(max_kg, unit), 1),
            },
            unit: unit.symbol().to_string(),
        }
    }

    /// Category, recommendations, MAP and pulse pressure for one reading
    pub fn blood_pressure(input: &BloodPressureInput) -> BloodPressureResult {
        let category = classifier::classify_blood_pressure(input.systolic, input.diastolic);
        let info = category.info();

        BloodPressureResult {
            systolic: input.systolic,
            diastolic: input.diastolic,
            pulse: input.pulse,
            category,
            display: category.to_category(),
            recommendations: info.recommendations.iter().map(|r| r.to_string()).collect(),
            mean_arterial_pressure: blood_pressure::mean_arterial_pressure(
                input.systolic,
                input.diastolic,
            ),
            pulse_pressure: blood_pressure::pulse_pressure(input.systolic, input.diastolic),
            emergency: category.is_emergency(),
        }
    }

    pub fn sleep_times(
        target: SleepTarget,
        options: Vec<SleepOption>,
        cycle_minutes: u32,
        fall_asleep_minutes: u32,
    ) -> SleepTimesResult {
        SleepTimesResult {
            target,
            cycle_minutes,
            fall_asleep_minutes,
            options,
        }
    }

    /// Composite sleep score (mean of four sub-scores) and its band
    pub fn sleep_quality(input: &SleepQualityInput) -> Result<SleepQualityResult, ComputeError> {
        let duration_score = sleep::duration_score(input.hours_slept);
        let latency_score = sleep::latency_score(input.latency_minutes);
        let continuity_score = sleep::continuity_score(input.awakenings);
        let rating_score = sleep::rating_score(input.rating);
        let score = (duration_score + latency_score + continuity_score + rating_score) / 4.0;

        let category = category_for(
            classifier::classify(classifier::SLEEP_QUALITY, score),
            "sleep quality",
        )?;

        Ok(SleepQualityResult {
            score,
            duration_score,
            latency_score,
            continuity_score,
            rating_score,
            category,
        })
    }

    pub fn water_intake(millilitres: f64) -> WaterIntakeResult {
        WaterIntakeResult {
            millilitres,
            litres: millilitres / 1000.0,
            glasses: hydration::glasses(millilitres),
            fluid_ounces: millilitres / ML_PER_FLUID_OUNCE,
        }
    }

    /// Questionnaire total, band and urgent-support flag
    pub fn assessment(input: &AssessmentInput) -> Result<AssessmentResult, ComputeError> {
        let score = mental_health::total_score(&input.answers);
        let category = category_for(
            classifier::classify(
                classifier::questionnaire_table(input.questionnaire),
                f64::from(score),
            ),
            "assessment score",
        )?;

        Ok(AssessmentResult {
            questionnaire: input.questionnaire,
            score,
            max_score: mental_health::max_score(input.questionnaire),
            category,
            urgent_support: mental_health::needs_urgent_support(
                input.questionnaire,
                &input.answers,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BloodPressureCategory, Questionnaire};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_body_fat_masses() {
        let result =
            ResultAggregator::body_fat(BodyFatMethod::Navy, Gender::Male, 20.0, Some(80.0))
                .unwrap();
        assert_eq!(result.category.label, "Average");
        assert!((result.fat_mass_kg.unwrap() - 16.0).abs() < 1e-9);
        assert!((result.lean_mass_kg.unwrap() - 64.0).abs() < 1e-9);
        assert_eq!(result.ideal_range, Range { min: 14.0, max: 18.0 });
    }

    #[test]
    fn test_body_fat_without_weight() {
        let result =
            ResultAggregator::body_fat(BodyFatMethod::Skinfold, Gender::Female, 23.0, None)
                .unwrap();
        assert_eq!(result.category.label, "Fitness");
        assert_eq!(result.fat_mass_kg, None);
        assert_eq!(result.lean_mass_kg, None);
    }

    #[test]
    fn test_bmr_has_all_activity_levels() {
        let result = ResultAggregator::bmr(BmrMethod::MifflinStJeor, 1500.0, None);
        assert_eq!(result.tdee.len(), 5);
        assert_eq!(result.tdee[0].calories, 1800.0);
        assert!((result.tdee[4].calories - 2850.0).abs() < 1e-9);
    }

    #[test]
    fn test_macros_add_up() {
        let result = ResultAggregator::macros(
            BmrMethod::MifflinStJeor,
            1600.0,
            ActivityLevel::Light,
            Goal::Gain,
        );
        let total = result.protein.calories + result.carbs.calories + result.fat.calories;
        assert!((total - result.target_calories).abs() < 1e-6);
        assert!((result.target_calories - 1600.0 * 1.375 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_heart_rate_zones() {
        let result = ResultAggregator::heart_rate(190.0, true, Some(60.0));
        assert_eq!(result.zones.len(), 5);
        assert_eq!(result.zones[0].min_bpm, 125.0);
        assert_eq!(result.zones[4].max_bpm, 190.0);
        assert_eq!(result.reserve, Some(130.0));
        assert_eq!(result.resting_category.unwrap().label, "Excellent");
    }

    #[test]
    fn test_ideal_weight_in_pounds() {
        let result = ResultAggregator::ideal_weight(177.8, Gender::Male, MassUnit::Pounds);
        assert_eq!(result.estimates.len(), 6);
        assert_eq!(result.unit, "lb");
        assert!((result.average - result.average_kg / 0.453_592_37).abs() <= 0.05);
        assert_eq!(result.average, round_to(result.average, 1));
    }

    #[test]
    fn test_blood_pressure_crisis() {
        let result = ResultAggregator::blood_pressure(&BloodPressureInput {
            systolic: 185.0,
            diastolic: 125.0,
            pulse: None,
        });
        assert_eq!(result.category, BloodPressureCategory::HypertensiveCrisis);
        assert_eq!(result.display.label, "Hypertensive Crisis");
        assert!(result.emergency);
        assert!((result.mean_arterial_pressure - 145.0).abs() < 1e-9);
        assert_eq!(result.pulse_pressure, 60.0);
    }

    #[test]
    fn test_sleep_quality() {
        let result = ResultAggregator::sleep_quality(&SleepQualityInput {
            hours_slept: 8.0,
            latency_minutes: 10.0,
            awakenings: 1,
            rating: 4,
        })
        .unwrap();
        // (100 + 100 + 80 + 75) / 4
        assert!((result.score - 88.75).abs() < 1e-9);
        assert_eq!(result.category.label, "Excellent");
    }

    #[test]
    fn test_water_units() {
        let result = ResultAggregator::water_intake(2000.0);
        assert_eq!(result.litres, 2.0);
        assert_eq!(result.glasses, 8);
        assert!((result.fluid_ounces - 67.628).abs() < 1e-3);
    }

    #[test]
    fn test_assessment() {
        let result = ResultAggregator::assessment(&AssessmentInput {
            questionnaire: Questionnaire::Phq9,
            answers: vec![2, 2, 2, 1, 1, 1, 1, 1, 0],
        })
        .unwrap();
        assert_eq!(result.score, 11);
        assert_eq!(result.max_score, 27);
        assert_eq!(result.category.label, "Moderate");
        assert!(!result.urgent_support);
    }
}
