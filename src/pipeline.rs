//! Pipeline orchestration
//!
//! This module provides the public API for healthcalc. Every calculator runs
//! the same stages: validate (caller's units) → normalize (metric) → compute →
//! classify → aggregate. A calculation either fails before any formula runs or
//! returns a fully populated result.

use crate::aggregator::ResultAggregator;
use crate::config::CalculatorConfig;
use crate::error::{ComputeError, FieldError, ValidationErrors};
use crate::formulas::{bmi, body_fat, finite, heart_rate, hydration, metabolic, sleep};
use crate::normalizer::Normalizer;
use crate::types::{
    ActivityLevel, AssessmentInput, AssessmentResult, BloodPressureInput, BloodPressureResult,
    BmiResult, BmrMethod, BmrResult, BodyFatMethod, BodyFatResult, CalculationResult, Gender,
    Goal, HeartRateResult, HydrationFactors, IdealWeightResult, MacroResult, MeasurementInput,
    MetricMeasurements, SleepQualityInput, SleepQualityResult, SleepTarget, SleepTimesResult,
    WaterIntakeResult,
};
use crate::validation::{self, Calculator, Field};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Value of a field that validation has already required
fn present(value: Option<f64>, field: Field) -> Result<f64, ComputeError> {
    value.ok_or_else(|| ComputeError::field(FieldError::missing(field.key(), field.label())))
}

fn validated(
    calculator: Calculator,
    input: &MeasurementInput,
) -> Result<MetricMeasurements, ComputeError> {
    validation::validate_measurements(calculator, input)?;
    let metric = Normalizer::normalize(input);
    debug!(?calculator, units = ?input.unit_system, "validated and normalized input");
    Ok(metric)
}

/// Estimate body-fat percentage with the chosen method.
///
/// # Example
/// ```ignore
/// let input = MeasurementInput {
///     height: Some(180.0),
///     neck: Some(38.0),
///     waist: Some(85.0),
///     ..MeasurementInput::new(Gender::Male, UnitSystem::Metric)
/// };
/// let result = calculate_body_fat(BodyFatMethod::Navy, &input, &CalculatorConfig::default())?;
/// assert_eq!(result.category.label, "Fitness");
/// ```
pub fn calculate_body_fat(
    method: BodyFatMethod,
    input: &MeasurementInput,
    config: &CalculatorConfig,
) -> Result<BodyFatResult, ComputeError> {
    let m = validated(Calculator::BodyFat(method), input)?;

    let raw = match method {
        BodyFatMethod::Navy => {
            let height = present(m.height_cm, Field::Height)?;
            let neck = present(m.neck_cm, Field::Neck)?;
            let waist = present(m.waist_cm, Field::Waist)?;
            match m.gender {
                Gender::Male => body_fat::navy_male(waist, neck, height)?,
                Gender::Female => {
                    let hip = present(m.hip_cm, Field::Hip)?;
                    body_fat::navy_female(waist, hip, neck, height)?
                }
            }
        }
        BodyFatMethod::Bmi => {
            let height = present(m.height_cm, Field::Height)?;
            let weight = present(m.weight_kg, Field::Weight)?;
            let age = present(m.age, Field::Age)?;
            body_fat::deurenberg(bmi::bmi(weight, height), age, m.gender)
        }
        BodyFatMethod::Skinfold => {
            let age = present(m.age, Field::Age)?;
            let mut sum = present(m.triceps_mm, Field::Triceps)?
                + present(m.subscapular_mm, Field::Subscapular)?
                + present(m.suprailiac_mm, Field::Suprailiac)?;
            if m.gender == Gender::Female {
                sum += present(m.thigh_mm, Field::Thigh)?;
            }
            body_fat::jackson_pollock(sum, age, m.gender)?
        }
    };

    let body_fat_pct = body_fat::ensure_plausible(
        raw,
        config.body_fat.plausible_min,
        config.body_fat.plausible_max,
    )?;
    debug!(method = method.as_str(), body_fat_pct, "computed body fat");

    ResultAggregator::body_fat(method, m.gender, body_fat_pct, m.weight_kg)
}

/// Body-mass index with its band and the healthy weight range for the height
pub fn calculate_bmi(input: &MeasurementInput) -> Result<BmiResult, ComputeError> {
    let m = validated(Calculator::Bmi, input)?;
    let height = present(m.height_cm, Field::Height)?;
    let weight = present(m.weight_kg, Field::Weight)?;

    let value = finite(bmi::bmi(weight, height), "BMI")?;
    debug!(bmi = value, "computed BMI");

    ResultAggregator::bmi(value, height)
}

/// Method actually used for `input`: Katch-McArdle whenever body fat is known
pub fn effective_bmr_method(input: &MeasurementInput, requested: BmrMethod) -> BmrMethod {
    if input.body_fat_pct.is_some() {
        BmrMethod::KatchMcArdle
    } else {
        requested
    }
}

fn compute_bmr(
    input: &MeasurementInput,
    requested: BmrMethod,
) -> Result<(BmrMethod, f64, Option<f64>), ComputeError> {
    let method = effective_bmr_method(input, requested);
    let m = validated(Calculator::Bmr(method), input)?;
    let weight = present(m.weight_kg, Field::Weight)?;

    let (bmr, lean) = match method {
        BmrMethod::KatchMcArdle => {
            let bf = present(m.body_fat_pct, Field::BodyFatPct)?;
            (
                metabolic::katch_mcardle(weight, bf),
                Some(body_fat::lean_mass(weight, bf)),
            )
        }
        BmrMethod::MifflinStJeor | BmrMethod::HarrisBenedict => {
            let height = present(m.height_cm, Field::Height)?;
            let age = present(m.age, Field::Age)?;
            let bmr = if method == BmrMethod::MifflinStJeor {
                metabolic::mifflin_st_jeor(weight, height, age, m.gender)
            } else {
                metabolic::harris_benedict(weight, height, age, m.gender)
            };
            (bmr, None)
        }
    };

    let bmr = finite(bmr, "BMR")?;
    if bmr <= 0.0 {
        return Err(ComputeError::ComputationFailure(format!(
            "BMR {bmr:.0} kcal is not positive"
        )));
    }
    debug!(?method, bmr, "computed BMR");
    Ok((method, bmr, lean))
}

/// Basal metabolic rate with TDEE for every activity level
pub fn calculate_bmr(
    input: &MeasurementInput,
    method: BmrMethod,
) -> Result<BmrResult, ComputeError> {
    let (method, bmr, lean) = compute_bmr(input, method)?;
    Ok(ResultAggregator::bmr(method, bmr, lean))
}

/// Daily calorie target and macro split for an activity level and goal
pub fn calculate_macros(
    input: &MeasurementInput,
    method: BmrMethod,
    activity: ActivityLevel,
    goal: Goal,
) -> Result<MacroResult, ComputeError> {
    let (method, bmr, _) = compute_bmr(input, method)?;
    debug!(activity = activity.as_str(), ?goal, "computing macros");
    Ok(ResultAggregator::macros(method, bmr, activity, goal))
}

/// Training zones from age, with optional resting and measured max heart rate
pub fn calculate_heart_rate_zones(
    input: &MeasurementInput,
) -> Result<HeartRateResult, ComputeError> {
    let m = validated(Calculator::HeartRate, input)?;

    let (max_hr, estimated) = match m.max_hr {
        Some(max) => (max, false),
        None => (
            heart_rate::estimated_max_hr(present(m.age, Field::Age)?),
            true,
        ),
    };

    if let Some(rest) = m.resting_hr {
        if max_hr <= rest {
            return Err(ComputeError::field(FieldError::cross_field(
                Field::RestingHr.key(),
                "Resting heart rate must be below the estimated maximum heart rate",
            )));
        }
    }
    debug!(max_hr, estimated, "computed max heart rate");

    Ok(ResultAggregator::heart_rate(max_hr, estimated, m.resting_hr))
}

/// Ideal weight from six published formulas, in the caller's mass unit
pub fn calculate_ideal_weight(input: &MeasurementInput) -> Result<IdealWeightResult, ComputeError> {
    let m = validated(Calculator::IdealWeight, input)?;
    let height = present(m.height_cm, Field::Height)?;

    let result =
        ResultAggregator::ideal_weight(height, m.gender, input.unit_system.mass_unit());
    finite(result.average_kg, "ideal weight")?;
    debug!(average_kg = result.average_kg, "computed ideal weight");
    Ok(result)
}

/// Daily water intake from body weight, exercise and climate
pub fn calculate_water_intake(
    input: &MeasurementInput,
    factors: &HydrationFactors,
    config: &CalculatorConfig,
) -> Result<WaterIntakeResult, ComputeError> {
    let calculator = Calculator::WaterIntake;
    let mut errors = match validation::validate_measurements(calculator, input) {
        Ok(()) => ValidationErrors::default(),
        Err(ComputeError::Validation(errors)) => errors,
        Err(e) => return Err(e),
    };
    if let Err(e) = validation::validate(
        calculator,
        input.unit_system,
        Field::ExerciseMinutes,
        factors.exercise_minutes,
    ) {
        errors.push(e);
    }
    errors.into_result()?;

    let m = Normalizer::normalize(input);
    let weight = present(m.weight_kg, Field::Weight)?;
    let ml = finite(
        hydration::daily_water_ml(weight, factors, &config.water),
        "water intake",
    )?;
    debug!(ml, "computed water intake");

    Ok(ResultAggregator::water_intake(ml))
}

/// Categorize a single blood-pressure reading
pub fn check_blood_pressure(
    input: &BloodPressureInput,
) -> Result<BloodPressureResult, ComputeError> {
    validation::validate_blood_pressure(input)?;
    let result = ResultAggregator::blood_pressure(input);
    debug!(category = ?result.category, "classified blood pressure");
    Ok(result)
}

/// Bedtimes for a wake-up time, or wake-up times for a bedtime
pub fn calculate_sleep_times(target: SleepTarget, config: &CalculatorConfig) -> SleepTimesResult {
    let options = match target {
        SleepTarget::WakeAt(wake) => sleep::bedtimes_for_wake(wake, &config.sleep),
        SleepTarget::BedAt(bed) => sleep::wake_times_for_bed(bed, &config.sleep),
    };
    debug!(?target, count = options.len(), "computed sleep times");

    ResultAggregator::sleep_times(
        target,
        options,
        config.sleep.cycle_minutes,
        config.sleep.fall_asleep_minutes,
    )
}

/// Composite 0-100 sleep-quality score
pub fn score_sleep_quality(input: &SleepQualityInput) -> Result<SleepQualityResult, ComputeError> {
    validation::validate_sleep_quality(input)?;
    ResultAggregator::sleep_quality(input)
}

/// Score a PHQ-9 or GAD-7 questionnaire
pub fn score_assessment(input: &AssessmentInput) -> Result<AssessmentResult, ComputeError> {
    validation::validate_assessment(input)?;
    let result = ResultAggregator::assessment(input)?;
    debug!(
        questionnaire = input.questionnaire.as_str(),
        score = result.score,
        "scored assessment"
    );
    Ok(result)
}

/// One calculation of any kind, as accepted over JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationRequest {
    BodyFat {
        #[serde(default)]
        method: BodyFatMethod,
        input: MeasurementInput,
    },
    Bmi {
        input: MeasurementInput,
    },
    Bmr {
        #[serde(default)]
        method: BmrMethod,
        input: MeasurementInput,
    },
    Macros {
        #[serde(default)]
        method: BmrMethod,
        #[serde(default)]
        activity: ActivityLevel,
        #[serde(default)]
        goal: Goal,
        input: MeasurementInput,
    },
    HeartRate {
        input: MeasurementInput,
    },
    IdealWeight {
        input: MeasurementInput,
    },
    WaterIntake {
        #[serde(default)]
        factors: HydrationFactors,
        input: MeasurementInput,
    },
    BloodPressure {
        reading: BloodPressureInput,
    },
    SleepTimes {
        target: SleepTarget,
    },
    SleepQuality {
        night: SleepQualityInput,
    },
    Assessment {
        assessment: AssessmentInput,
    },
}

/// Run any calculation request
pub fn calculate(
    request: &CalculationRequest,
    config: &CalculatorConfig,
) -> Result<CalculationResult, ComputeError> {
    let result = match request {
        CalculationRequest::BodyFat { method, input } => {
            CalculationResult::BodyFat(calculate_body_fat(*method, input, config)?)
        }
        CalculationRequest::Bmi { input } => CalculationResult::Bmi(calculate_bmi(input)?),
        CalculationRequest::Bmr { method, input } => {
            CalculationResult::Bmr(calculate_bmr(input, *method)?)
        }
        CalculationRequest::Macros {
            method,
            activity,
            goal,
            input,
        } => CalculationResult::Macros(calculate_macros(input, *method, *activity, *goal)?),
        CalculationRequest::HeartRate { input } => {
            CalculationResult::HeartRate(calculate_heart_rate_zones(input)?)
        }
        CalculationRequest::IdealWeight { input } => {
            CalculationResult::IdealWeight(calculate_ideal_weight(input)?)
        }
        CalculationRequest::WaterIntake { factors, input } => {
            CalculationResult::WaterIntake(calculate_water_intake(input, factors, config)?)
        }
        CalculationRequest::BloodPressure { reading } => {
            CalculationResult::BloodPressure(check_blood_pressure(reading)?)
        }
        CalculationRequest::SleepTimes { target } => {
            CalculationResult::SleepTimes(calculate_sleep_times(*target, config))
        }
        CalculationRequest::SleepQuality { night } => {
            CalculationResult::SleepQuality(score_sleep_quality(night)?)
        }
        CalculationRequest::Assessment { assessment } => {
            CalculationResult::Assessment(score_assessment(assessment)?)
        }
    };
    Ok(result)
}

/// Calculator bound to one configuration.
///
/// Use this when several calculations share a loaded config file.
#[derive(Debug, Clone, Default)]
pub struct HealthCalculator {
    config: CalculatorConfig,
}

impl HealthCalculator {
    /// Create a calculator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with checked settings
    pub fn with_config(config: CalculatorConfig) -> Result<Self, ComputeError> {
        config.check()?;
        Ok(Self { config })
    }

    /// Load settings from JSON
    pub fn load_config(&mut self, json: &str) -> Result<(), ComputeError> {
        self.config = CalculatorConfig::from_json(json)?;
        Ok(())
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ComputeError> {
        calculate(request, &self.config)
    }

    /// Run a JSON-encoded request and return the JSON-encoded result
    pub fn calculate_json(&self, request_json: &str) -> Result<String, ComputeError> {
        let request: CalculationRequest = serde_json::from_str(request_json)?;
        let result = self.calculate(&request)?;
        Ok(serde_json::to_string(&result)?)
    }
}
