//! End-to-end calculator scenarios through the public API

use chrono::{NaiveDate, NaiveTime};
use healthcalc::error::FieldErrorKind;
use healthcalc::history::SortKey;
use healthcalc::history::SortOrder;
use healthcalc::types::{
    BloodPressureCategory, BloodPressureInput, BmrMethod, BodyFatMethod, CalculationResult,
    Gender, MeasurementInput, SleepTarget, UnitSystem,
};
use healthcalc::{
    calculate_bmr, calculate_body_fat, calculate_sleep_times, check_blood_pressure, BpTracker,
    CalculatorConfig, ComputeError, HealthCalculator, JsonFileRepository, NewReading,
    ReadingRepository,
};
use pretty_assertions::assert_eq;

fn reading(day: u32, systolic: f64, diastolic: f64) -> NewReading {
    NewReading {
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        systolic,
        diastolic,
        pulse: Some(68.0),
        notes: None,
    }
}

#[test]
fn navy_male_lands_in_fitness_band() {
    let input = MeasurementInput {
        height: Some(180.0),
        waist: Some(85.0),
        neck: Some(38.0),
        ..MeasurementInput::new(Gender::Male, UnitSystem::Metric)
    };

    let result =
        calculate_body_fat(BodyFatMethod::Navy, &input, &CalculatorConfig::default()).unwrap();
    assert!(result.body_fat_pct > 16.0 && result.body_fat_pct < 18.0);
    assert_eq!(result.category.label, "Fitness");
    assert_eq!(result.fat_mass_kg, None);
}

#[test]
fn navy_female_without_hip_is_rejected() {
    let input = MeasurementInput {
        height: Some(165.0),
        waist: Some(70.0),
        neck: Some(32.0),
        ..MeasurementInput::new(Gender::Female, UnitSystem::Metric)
    };

    let err =
        calculate_body_fat(BodyFatMethod::Navy, &input, &CalculatorConfig::default()).unwrap_err();
    let ComputeError::Validation(errors) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    let hip = errors.for_field("hip").unwrap();
    assert_eq!(hip.kind, FieldErrorKind::Missing);

    let with_hip = MeasurementInput {
        hip: Some(95.0),
        ..input
    };
    let result =
        calculate_body_fat(BodyFatMethod::Navy, &with_hip, &CalculatorConfig::default()).unwrap();
    assert!(result.body_fat_pct > 0.0);
}

#[test]
fn mifflin_st_jeor_bmr() {
    let input = MeasurementInput {
        age: Some(30.0),
        height: Some(175.0),
        weight: Some(70.0),
        ..MeasurementInput::new(Gender::Male, UnitSystem::Metric)
    };

    let result = calculate_bmr(&input, BmrMethod::MifflinStJeor).unwrap();
    assert!((result.bmr - 1673.75).abs() < 1e-9);
    assert_eq!(result.tdee.len(), 5);
}

#[test]
fn hypertensive_crisis_is_flagged() {
    let result = check_blood_pressure(&BloodPressureInput {
        systolic: 185.0,
        diastolic: 125.0,
        pulse: None,
    })
    .unwrap();

    assert_eq!(result.category, BloodPressureCategory::HypertensiveCrisis);
    assert_eq!(result.display.label, "Hypertensive Crisis");
    assert!((result.mean_arterial_pressure - 145.0).abs() < 0.05);
    assert!(result.emergency);
}

#[test]
fn bedtimes_for_seven_am() {
    let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    let result = calculate_sleep_times(SleepTarget::WakeAt(wake), &CalculatorConfig::default());

    let times: Vec<String> = result
        .options
        .iter()
        .map(|o| o.time.format("%H:%M").to_string())
        .collect();
    assert_eq!(times, vec!["21:46", "23:16", "00:46"]);

    let recommended: Vec<u32> = result
        .options
        .iter()
        .filter(|o| o.recommended)
        .map(|o| o.cycles)
        .collect();
    assert_eq!(recommended, vec![5]);
}

#[test]
fn clear_empties_history_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = BpTracker::open(JsonFileRepository::in_dir(dir.path()));
    for day in 1..=4 {
        tracker.add(reading(day, 118.0 + f64::from(day), 76.0)).unwrap();
    }
    assert_eq!(tracker.len(), 4);

    tracker.clear().unwrap();
    assert_eq!(tracker.len(), 0);
    assert!(JsonFileRepository::in_dir(dir.path()).load().is_empty());
}

#[test]
fn history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = BpTracker::open(JsonFileRepository::in_dir(dir.path()));
    let first = tracker.add(reading(1, 122.0, 78.0)).unwrap();
    let second = tracker.add(reading(2, 141.0, 92.0)).unwrap();

    let reopened = BpTracker::open(JsonFileRepository::in_dir(dir.path()));
    assert_eq!(reopened.readings(), tracker.readings());

    let oldest_first: Vec<_> = reopened
        .sorted(SortKey::Date, SortOrder::Ascending)
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(oldest_first, vec![first.id, second.id]);

    let csv = reopened.export_csv().unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("2024-03-02,07:30,141,92,68,"));
}

#[test]
fn json_request_through_calculator() {
    let calculator = HealthCalculator::new();
    let output = calculator
        .calculate_json(
            r#"{"calculator": "blood_pressure",
                "reading": {"systolic": 185, "diastolic": 125}}"#,
        )
        .unwrap();

    let result: CalculationResult = serde_json::from_str(&output).unwrap();
    let CalculationResult::BloodPressure(bp) = result else {
        panic!("expected a blood-pressure result");
    };
    assert!(bp.emergency);
}
