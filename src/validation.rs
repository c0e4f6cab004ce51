//! Input validation
//!
//! Every numeric field is checked against a calculator- and unit-specific
//! `[min, max]` range before it may reach the formula engine. Out-of-range values
//! are rejected, never clamped. All fields of a calculation are checked together
//! so the caller gets every failure at once; nothing is computed on partial input.
//!
//! Raw text from forms or the command line passes through [`parse_field`] first,
//! so the engine only ever sees finite `f64` values.

use crate::error::{ComputeError, FieldError, ValidationErrors};
use crate::types::{
    AssessmentInput, BloodPressureInput, BmrMethod, BodyFatMethod, Gender, MeasurementInput,
    SleepQualityInput, UnitSystem,
};
use chrono::NaiveTime;
use serde::Serialize;

/// Calculator whose range table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calculator {
    BodyFat(BodyFatMethod),
    Bmi,
    Bmr(BmrMethod),
    HeartRate,
    IdealWeight,
    WaterIntake,
    BloodPressure,
    SleepQuality,
}

/// An individually validated input field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Height,
    Weight,
    Neck,
    Waist,
    Hip,
    Triceps,
    Subscapular,
    Suprailiac,
    Thigh,
    BodyFatPct,
    RestingHr,
    MaxHr,
    Systolic,
    Diastolic,
    Pulse,
    ExerciseMinutes,
    HoursSlept,
    LatencyMinutes,
    Awakenings,
    Rating,
}

impl Field {
    /// Stable machine key, used as the `field` of a [`FieldError`]
    pub fn key(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Neck => "neck",
            Field::Waist => "waist",
            Field::Hip => "hip",
            Field::Triceps => "triceps",
            Field::Subscapular => "subscapular",
            Field::Suprailiac => "suprailiac",
            Field::Thigh => "thigh",
            Field::BodyFatPct => "body_fat_pct",
            Field::RestingHr => "resting_hr",
            Field::MaxHr => "max_hr",
            Field::Systolic => "systolic",
            Field::Diastolic => "diastolic",
            Field::Pulse => "pulse",
            Field::ExerciseMinutes => "exercise_minutes",
            Field::HoursSlept => "hours_slept",
            Field::LatencyMinutes => "latency_minutes",
            Field::Awakenings => "awakenings",
            Field::Rating => "rating",
        }
    }

    /// Human-readable label for messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Height => "Height",
            Field::Weight => "Weight",
            Field::Neck => "Neck circumference",
            Field::Waist => "Waist circumference",
            Field::Hip => "Hip circumference",
            Field::Triceps => "Triceps skinfold",
            Field::Subscapular => "Subscapular skinfold",
            Field::Suprailiac => "Suprailiac skinfold",
            Field::Thigh => "Thigh skinfold",
            Field::BodyFatPct => "Body fat percentage",
            Field::RestingHr => "Resting heart rate",
            Field::MaxHr => "Maximum heart rate",
            Field::Systolic => "Systolic pressure",
            Field::Diastolic => "Diastolic pressure",
            Field::Pulse => "Pulse",
            Field::ExerciseMinutes => "Exercise minutes",
            Field::HoursSlept => "Hours slept",
            Field::LatencyMinutes => "Time to fall asleep",
            Field::Awakenings => "Awakenings",
            Field::Rating => "Sleep rating",
        }
    }

    fn value_in(&self, input: &MeasurementInput) -> Option<f64> {
        match self {
            Field::Age => input.age,
            Field::Height => input.height,
            Field::Weight => input.weight,
            Field::Neck => input.neck,
            Field::Waist => input.waist,
            Field::Hip => input.hip,
            Field::Triceps => input.triceps,
            Field::Subscapular => input.subscapular,
            Field::Suprailiac => input.suprailiac,
            Field::Thigh => input.thigh,
            Field::BodyFatPct => input.body_fat_pct,
            Field::RestingHr => input.resting_hr,
            Field::MaxHr => input.max_hr,
            _ => None,
        }
    }
}

/// Valid range for one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl FieldRange {
    const fn new(min: f64, max: f64, unit: &'static str) -> Self {
        Self { min, max, unit }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Range of `field` for `calculator` in `units`
pub fn field_range(calculator: Calculator, units: UnitSystem, field: Field) -> FieldRange {
    let metric = units == UnitSystem::Metric;

    // (metric, imperial) pairs for unit-dependent fields
    let pick = |m: FieldRange, i: FieldRange| if metric { m } else { i };

    match field {
        Field::Age => match calculator {
            Calculator::BodyFat(BodyFatMethod::Skinfold) => FieldRange::new(18.0, 80.0, "years"),
            Calculator::BodyFat(_) => FieldRange::new(18.0, 100.0, "years"),
            Calculator::HeartRate => FieldRange::new(10.0, 100.0, "years"),
            _ => FieldRange::new(15.0, 100.0, "years"),
        },
        Field::Height => match calculator {
            Calculator::IdealWeight => pick(
                FieldRange::new(130.0, 230.0, "cm"),
                FieldRange::new(51.0, 91.0, "in"),
            ),
            _ => pick(
                FieldRange::new(100.0, 250.0, "cm"),
                FieldRange::new(39.0, 98.0, "in"),
            ),
        },
        Field::Weight => pick(
            FieldRange::new(30.0, 300.0, "kg"),
            FieldRange::new(66.0, 660.0, "lb"),
        ),
        Field::Neck => pick(
            FieldRange::new(20.0, 60.0, "cm"),
            FieldRange::new(8.0, 24.0, "in"),
        ),
        Field::Waist => pick(
            FieldRange::new(40.0, 200.0, "cm"),
            FieldRange::new(16.0, 79.0, "in"),
        ),
        Field::Hip => pick(
            FieldRange::new(50.0, 200.0, "cm"),
            FieldRange::new(20.0, 79.0, "in"),
        ),
        Field::Triceps | Field::Subscapular | Field::Suprailiac | Field::Thigh => pick(
            FieldRange::new(2.0, 100.0, "mm"),
            FieldRange::new(0.08, 4.0, "in"),
        ),
        Field::BodyFatPct => FieldRange::new(2.0, 70.0, "%"),
        Field::RestingHr => FieldRange::new(30.0, 120.0, "bpm"),
        Field::MaxHr => FieldRange::new(100.0, 230.0, "bpm"),
        Field::Systolic => FieldRange::new(70.0, 250.0, "mmHg"),
        Field::Diastolic => FieldRange::new(40.0, 150.0, "mmHg"),
        Field::Pulse => FieldRange::new(30.0, 220.0, "bpm"),
        Field::ExerciseMinutes => FieldRange::new(0.0, 600.0, "minutes"),
        Field::HoursSlept => FieldRange::new(0.0, 16.0, "hours"),
        Field::LatencyMinutes => FieldRange::new(0.0, 240.0, "minutes"),
        Field::Awakenings => FieldRange::new(0.0, 30.0, "times"),
        Field::Rating => FieldRange::new(1.0, 5.0, "stars"),
    }
}

/// Check one value against its range
pub fn validate(
    calculator: Calculator,
    units: UnitSystem,
    field: Field,
    value: f64,
) -> Result<(), FieldError> {
    if !value.is_finite() {
        return Err(FieldError::not_finite(field.key()));
    }

    let range = field_range(calculator, units, field);
    if range.contains(value) {
        Ok(())
    } else {
        Err(FieldError::out_of_range(
            field.key(),
            field.label(),
            range.min,
            range.max,
            range.unit,
        ))
    }
}

/// Fields that must be present for a calculator and gender
pub fn required_fields(calculator: Calculator, gender: Gender) -> &'static [Field] {
    match (calculator, gender) {
        (Calculator::BodyFat(BodyFatMethod::Navy), Gender::Male) => {
            &[Field::Height, Field::Neck, Field::Waist]
        }
        (Calculator::BodyFat(BodyFatMethod::Navy), Gender::Female) => {
            &[Field::Height, Field::Neck, Field::Waist, Field::Hip]
        }
        (Calculator::BodyFat(BodyFatMethod::Bmi), _) => &[Field::Age, Field::Height, Field::Weight],
        (Calculator::BodyFat(BodyFatMethod::Skinfold), Gender::Male) => {
            &[Field::Age, Field::Triceps, Field::Subscapular, Field::Suprailiac]
        }
        (Calculator::BodyFat(BodyFatMethod::Skinfold), Gender::Female) => &[
            Field::Age,
            Field::Triceps,
            Field::Subscapular,
            Field::Suprailiac,
            Field::Thigh,
        ],
        (Calculator::Bmi, _) => &[Field::Height, Field::Weight],
        (Calculator::Bmr(BmrMethod::KatchMcArdle), _) => &[Field::Weight, Field::BodyFatPct],
        (Calculator::Bmr(_), _) => &[Field::Age, Field::Height, Field::Weight],
        (Calculator::HeartRate, _) => &[Field::Age],
        (Calculator::IdealWeight, _) => &[Field::Height],
        (Calculator::WaterIntake, _) => &[Field::Weight],
        (Calculator::BloodPressure, _) => &[Field::Systolic, Field::Diastolic],
        (Calculator::SleepQuality, _) => &[
            Field::HoursSlept,
            Field::LatencyMinutes,
            Field::Awakenings,
            Field::Rating,
        ],
    }
}

/// Fields a calculator uses when present
pub fn optional_fields(calculator: Calculator) -> &'static [Field] {
    match calculator {
        Calculator::BodyFat(BodyFatMethod::Navy) | Calculator::BodyFat(BodyFatMethod::Skinfold) => {
            &[Field::Weight]
        }
        Calculator::HeartRate => &[Field::RestingHr, Field::MaxHr],
        Calculator::BloodPressure => &[Field::Pulse],
        _ => &[],
    }
}

/// Validate every field a calculator needs from `input`, plus cross-field rules.
///
/// Collects all failures instead of stopping at the first one.
pub fn validate_measurements(
    calculator: Calculator,
    input: &MeasurementInput,
) -> Result<(), ComputeError> {
    let mut errors = ValidationErrors::default();
    let units = input.unit_system;

    for field in required_fields(calculator, input.gender) {
        match field.value_in(input) {
            Some(value) => {
                if let Err(e) = validate(calculator, units, *field, value) {
                    errors.push(e);
                }
            }
            None => errors.push(FieldError::missing(field.key(), field.label())),
        }
    }

    for field in optional_fields(calculator) {
        if let Some(value) = field.value_in(input) {
            if let Err(e) = validate(calculator, units, *field, value) {
                errors.push(e);
            }
        }
    }

    if errors.is_empty() {
        check_cross_fields(calculator, input, &mut errors);
    }

    errors.into_result()
}

fn check_cross_fields(
    calculator: Calculator,
    input: &MeasurementInput,
    errors: &mut ValidationErrors,
) {
    match calculator {
        Calculator::BodyFat(BodyFatMethod::Navy) => {
            let (Some(neck), Some(waist)) = (input.neck, input.waist) else {
                return;
            };
            match input.gender {
                Gender::Male if waist <= neck => errors.push(FieldError::cross_field(
                    Field::Waist.key(),
                    "Waist circumference must be greater than neck circumference",
                )),
                Gender::Female => {
                    let hip = input.hip.unwrap_or(0.0);
                    if waist + hip <= neck {
                        errors.push(FieldError::cross_field(
                            Field::Waist.key(),
                            "Waist plus hip circumference must be greater than neck circumference",
                        ));
                    }
                }
                _ => {}
            }
        }
        Calculator::HeartRate => {
            if let (Some(rest), Some(max)) = (input.resting_hr, input.max_hr) {
                if max <= rest {
                    errors.push(FieldError::cross_field(
                        Field::MaxHr.key(),
                        "Maximum heart rate must be greater than resting heart rate",
                    ));
                }
            }
        }
        _ => {}
    }
}

/// Validate a blood-pressure measurement
pub fn validate_blood_pressure(input: &BloodPressureInput) -> Result<(), ComputeError> {
    let mut errors = ValidationErrors::default();
    let calc = Calculator::BloodPressure;
    let units = UnitSystem::Metric;

    for (field, value) in [
        (Field::Systolic, Some(input.systolic)),
        (Field::Diastolic, Some(input.diastolic)),
        (Field::Pulse, input.pulse),
    ] {
        if let Some(value) = value {
            if let Err(e) = validate(calc, units, field, value) {
                errors.push(e);
            }
        }
    }

    if errors.is_empty() && input.diastolic >= input.systolic {
        errors.push(FieldError::cross_field(
            Field::Diastolic.key(),
            "Diastolic pressure must be lower than systolic pressure",
        ));
    }

    errors.into_result()
}

/// Validate a self-reported night of sleep
pub fn validate_sleep_quality(input: &SleepQualityInput) -> Result<(), ComputeError> {
    let mut errors = ValidationErrors::default();
    let calc = Calculator::SleepQuality;
    let units = UnitSystem::Metric;

    for (field, value) in [
        (Field::HoursSlept, input.hours_slept),
        (Field::LatencyMinutes, input.latency_minutes),
        (Field::Awakenings, f64::from(input.awakenings)),
        (Field::Rating, f64::from(input.rating)),
    ] {
        if let Err(e) = validate(calc, units, field, value) {
            errors.push(e);
        }
    }

    errors.into_result()
}

/// Highest answer on the screening questionnaires ("nearly every day")
pub const MAX_ANSWER: u8 = 3;

/// Validate questionnaire answers: exact item count, each 0-3
pub fn validate_assessment(input: &AssessmentInput) -> Result<(), ComputeError> {
    let mut errors = ValidationErrors::default();
    let expected = input.questionnaire.item_count();

    if input.answers.len() != expected {
        errors.push(FieldError::cross_field(
            "answers",
            format!(
                "{} requires exactly {} answers, got {}",
                input.questionnaire.as_str().to_uppercase(),
                expected,
                input.answers.len()
            ),
        ));
    }

    for (i, answer) in input.answers.iter().enumerate() {
        if *answer > MAX_ANSWER {
            errors.push(FieldError::out_of_range(
                &format!("answers[{i}]"),
                &format!("Answer {}", i + 1),
                0.0,
                f64::from(MAX_ANSWER),
                "points",
            ));
        }
    }

    errors.into_result()
}

/// Parse raw text for `field` into a finite number.
///
/// Surrounding whitespace is ignored; empty text is reported as missing.
pub fn parse_field(field: &str, raw: &str) -> Result<f64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::missing(field, field));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| FieldError::not_a_number(field, trimmed))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldError::not_finite(field))
    }
}

/// Parse optional raw text; blank input means "not supplied"
pub fn parse_optional_field(field: &str, raw: Option<&str>) -> Result<Option<f64>, FieldError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_field(field, text).map(Some),
    }
}

/// Parse a clock time, either 24-hour `HH:MM` or 12-hour `h:mm AM`
pub fn parse_time(raw: &str) -> Result<NaiveTime, ComputeError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&trimmed.to_uppercase(), "%I:%M %p"))
        .map_err(|_| ComputeError::InvalidTime(format!("'{trimmed}' is not a valid time (HH:MM)")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrorKind;
    use crate::types::Questionnaire;

    fn navy_male() -> MeasurementInput {
        MeasurementInput {
            height: Some(180.0),
            neck: Some(38.0),
            waist: Some(85.0),
            ..MeasurementInput::new(Gender::Male, UnitSystem::Metric)
        }
    }

    #[test]
    fn test_neck_ranges_per_unit() {
        let calc = Calculator::BodyFat(BodyFatMethod::Navy);
        assert!(validate(calc, UnitSystem::Metric, Field::Neck, 20.0).is_ok());
        assert!(validate(calc, UnitSystem::Metric, Field::Neck, 60.0).is_ok());
        assert!(validate(calc, UnitSystem::Metric, Field::Neck, 61.0).is_err());
        assert!(validate(calc, UnitSystem::Imperial, Field::Neck, 24.0).is_ok());
        assert!(validate(calc, UnitSystem::Imperial, Field::Neck, 30.0).is_err());
    }

    #[test]
    fn test_skinfold_ranges_per_unit() {
        let calc = Calculator::BodyFat(BodyFatMethod::Skinfold);
        assert!(validate(calc, UnitSystem::Metric, Field::Triceps, 2.0).is_ok());
        assert!(validate(calc, UnitSystem::Metric, Field::Triceps, 1.9).is_err());
        assert!(validate(calc, UnitSystem::Imperial, Field::Triceps, 0.08).is_ok());
        assert!(validate(calc, UnitSystem::Imperial, Field::Triceps, 4.1).is_err());
    }

    #[test]
    fn test_out_of_range_message() {
        let err = validate(
            Calculator::BodyFat(BodyFatMethod::Navy),
            UnitSystem::Metric,
            Field::Neck,
            5.0,
        )
        .unwrap_err();

        assert_eq!(err.field, "neck");
        assert_eq!(err.message, "Neck circumference must be between 20 and 60 cm");
        assert!(matches!(err.kind, FieldErrorKind::OutOfRange { .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = validate(Calculator::Bmi, UnitSystem::Metric, Field::Weight, f64::NAN)
            .unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::NotFinite);
    }

    #[test]
    fn test_valid_navy_male() {
        let calc = Calculator::BodyFat(BodyFatMethod::Navy);
        assert!(validate_measurements(calc, &navy_male()).is_ok());
    }

    #[test]
    fn test_navy_male_waist_must_exceed_neck() {
        let input = MeasurementInput {
            waist: Some(38.0),
            neck: Some(40.0),
            ..navy_male()
        };
        let err = validate_measurements(Calculator::BodyFat(BodyFatMethod::Navy), &input)
            .unwrap_err();

        let field = &err.field_errors()[0];
        assert_eq!(field.kind, FieldErrorKind::CrossField);
        assert!(field.message.contains("greater than neck"));
    }

    #[test]
    fn test_navy_female_requires_hip() {
        let input = MeasurementInput {
            height: Some(165.0),
            waist: Some(70.0),
            neck: Some(32.0),
            ..MeasurementInput::new(Gender::Female, UnitSystem::Metric)
        };
        let err = validate_measurements(Calculator::BodyFat(BodyFatMethod::Navy), &input)
            .unwrap_err();

        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "hip");
        assert_eq!(errors[0].kind, FieldErrorKind::Missing);
    }

    #[test]
    fn test_all_failures_reported_together() {
        let input = MeasurementInput {
            age: Some(10.0),
            triceps: Some(500.0),
            ..MeasurementInput::new(Gender::Female, UnitSystem::Metric)
        };
        let err = validate_measurements(Calculator::BodyFat(BodyFatMethod::Skinfold), &input)
            .unwrap_err();

        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["age", "triceps", "subscapular", "suprailiac", "thigh"]
        );
    }

    #[test]
    fn test_unused_fields_are_ignored() {
        // Skinfold values are irrelevant to the Navy method
        let input = MeasurementInput {
            triceps: Some(9999.0),
            ..navy_male()
        };
        assert!(validate_measurements(Calculator::BodyFat(BodyFatMethod::Navy), &input).is_ok());
    }

    #[test]
    fn test_optional_weight_is_range_checked() {
        let input = MeasurementInput {
            weight: Some(5.0),
            ..navy_male()
        };
        let err = validate_measurements(Calculator::BodyFat(BodyFatMethod::Navy), &input)
            .unwrap_err();
        assert_eq!(err.field_errors()[0].field, "weight");
    }

    #[test]
    fn test_katch_mcardle_requires_body_fat() {
        let input = MeasurementInput {
            weight: Some(80.0),
            ..MeasurementInput::new(Gender::Male, UnitSystem::Metric)
        };
        let err = validate_measurements(Calculator::Bmr(BmrMethod::KatchMcArdle), &input)
            .unwrap_err();
        assert_eq!(err.field_errors()[0].field, "body_fat_pct");
    }

    #[test]
    fn test_heart_rate_max_above_rest() {
        let input = MeasurementInput {
            age: Some(30.0),
            resting_hr: Some(110.0),
            max_hr: Some(105.0),
            ..Default::default()
        };
        let err = validate_measurements(Calculator::HeartRate, &input).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "max_hr");
    }

    #[test]
    fn test_blood_pressure_validation() {
        let ok = BloodPressureInput {
            systolic: 120.0,
            diastolic: 80.0,
            pulse: Some(70.0),
        };
        assert!(validate_blood_pressure(&ok).is_ok());

        let inverted = BloodPressureInput {
            systolic: 80.0,
            diastolic: 90.0,
            pulse: None,
        };
        let err = validate_blood_pressure(&inverted).unwrap_err();
        assert_eq!(err.field_errors()[0].kind, FieldErrorKind::CrossField);

        let bad_pulse = BloodPressureInput {
            pulse: Some(10.0),
            ..ok
        };
        let err = validate_blood_pressure(&bad_pulse).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "pulse");
    }

    #[test]
    fn test_assessment_validation() {
        let short = AssessmentInput {
            questionnaire: Questionnaire::Phq9,
            answers: vec![0; 8],
        };
        assert!(validate_assessment(&short).is_err());

        let out_of_range = AssessmentInput {
            questionnaire: Questionnaire::Gad7,
            answers: vec![0, 1, 2, 3, 4, 0, 0],
        };
        let err = validate_assessment(&out_of_range).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "answers[4]");

        let ok = AssessmentInput {
            questionnaire: Questionnaire::Gad7,
            answers: vec![3; 7],
        };
        assert!(validate_assessment(&ok).is_ok());
    }

    #[test]
    fn test_sleep_quality_validation() {
        let bad = SleepQualityInput {
            hours_slept: 7.0,
            latency_minutes: 10.0,
            awakenings: 1,
            rating: 0,
        };
        let err = validate_sleep_quality(&bad).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "rating");
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("height", " 180.5 ").unwrap(), 180.5);
        assert_eq!(
            parse_field("height", "abc").unwrap_err().kind,
            FieldErrorKind::NotANumber
        );
        assert_eq!(
            parse_field("height", "").unwrap_err().kind,
            FieldErrorKind::Missing
        );
        assert_eq!(
            parse_field("height", "inf").unwrap_err().kind,
            FieldErrorKind::NotFinite
        );
        assert_eq!(parse_optional_field("hip", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_field("hip", None).unwrap(), None);
        assert_eq!(parse_optional_field("hip", Some("95")).unwrap(), Some(95.0));
    }

    #[test]
    fn test_parse_time() {
        let seven = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        assert_eq!(parse_time("07:00").unwrap(), seven);
        assert_eq!(parse_time(" 7:00 am ").unwrap(), seven);
        assert_eq!(
            parse_time("10:30 PM").unwrap(),
            NaiveTime::from_hms_opt(22, 30, 0).unwrap()
        );
        assert!(matches!(parse_time("25:00"), Err(ComputeError::InvalidTime(_))));
        assert!(parse_time("seven").is_err());
    }
}
