//! Core types for the healthcalc pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw measurement inputs (in the caller's unit system), metric
//! measurements, and the immutable result records handed to presentation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Biological sex used by the gender-specific formulas and bands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Unit system the caller entered measurements in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Body-fat estimation method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFatMethod {
    /// US Navy circumference method
    #[default]
    Navy,
    /// Deurenberg BMI-adjusted estimate
    Bmi,
    /// Jackson-Pollock skinfold method (3-site men, 4-site women)
    Skinfold,
}

impl BodyFatMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyFatMethod::Navy => "navy",
            BodyFatMethod::Bmi => "bmi",
            BodyFatMethod::Skinfold => "skinfold",
        }
    }
}

/// BMR equation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrMethod {
    #[default]
    MifflinStJeor,
    HarrisBenedict,
    KatchMcArdle,
}

/// Activity level used to scale BMR into TDEE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    Extreme,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Extreme => "extreme",
        }
    }
}

/// Nutrition goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    #[default]
    Maintain,
    Gain,
    Performance,
}

/// Raw user-entered body measurements for one calculation.
///
/// Values are in the units of `unit_system`: cm/kg/mm for metric and
/// in/lb/in for imperial. Which fields are required depends on the
/// calculator, method and gender; the validator reports missing ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementInput {
    pub unit_system: UnitSystem,
    pub gender: Gender,
    /// Age in years
    pub age: Option<f64>,
    /// Height (cm | in)
    pub height: Option<f64>,
    /// Body weight (kg | lb)
    pub weight: Option<f64>,
    /// Neck circumference (cm | in)
    pub neck: Option<f64>,
    /// Waist circumference (cm | in)
    pub waist: Option<f64>,
    /// Hip circumference (cm | in)
    pub hip: Option<f64>,
    /// Triceps skinfold (mm | in)
    pub triceps: Option<f64>,
    /// Subscapular skinfold (mm | in)
    pub subscapular: Option<f64>,
    /// Suprailiac skinfold (mm | in)
    pub suprailiac: Option<f64>,
    /// Thigh skinfold (mm | in)
    pub thigh: Option<f64>,
    /// Known body-fat percentage
    pub body_fat_pct: Option<f64>,
    /// Resting heart rate (bpm)
    pub resting_hr: Option<f64>,
    /// Measured maximum heart rate (bpm)
    pub max_hr: Option<f64>,
}

impl MeasurementInput {
    pub fn new(gender: Gender, unit_system: UnitSystem) -> Self {
        Self {
            gender,
            unit_system,
            ..Default::default()
        }
    }
}

/// Measurements after conversion to metric (cm, kg, mm)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricMeasurements {
    pub gender: Gender,
    pub age: Option<f64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub triceps_mm: Option<f64>,
    pub subscapular_mm: Option<f64>,
    pub suprailiac_mm: Option<f64>,
    pub thigh_mm: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub resting_hr: Option<f64>,
    pub max_hr: Option<f64>,
}

/// A single blood-pressure measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureInput {
    /// Systolic pressure (mmHg)
    pub systolic: f64,
    /// Diastolic pressure (mmHg)
    pub diastolic: f64,
    /// Pulse (bpm)
    pub pulse: Option<f64>,
}

/// Extra water-intake factors beyond body weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationFactors {
    /// Minutes of exercise per day
    pub exercise_minutes: f64,
    /// Hot or humid climate
    pub hot_climate: bool,
}

/// What the sleep calculator should solve for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "target", content = "time")]
pub enum SleepTarget {
    /// Given a wake-up time, suggest bedtimes
    WakeAt(NaiveTime),
    /// Given a bedtime, suggest wake-up times
    BedAt(NaiveTime),
}

/// Self-reported night of sleep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepQualityInput {
    pub hours_slept: f64,
    /// Minutes to fall asleep
    pub latency_minutes: f64,
    pub awakenings: u32,
    /// Subjective rating, 1 (very poor) to 5 (excellent)
    pub rating: u8,
}

/// Screening questionnaire for the mental-health self-assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Questionnaire {
    /// Patient Health Questionnaire (depression), 9 items
    Phq9,
    /// Generalized Anxiety Disorder scale, 7 items
    Gad7,
}

impl Questionnaire {
    pub fn item_count(&self) -> usize {
        match self {
            Questionnaire::Phq9 => 9,
            Questionnaire::Gad7 => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Questionnaire::Phq9 => "phq9",
            Questionnaire::Gad7 => "gad7",
        }
    }
}

/// Answers to a screening questionnaire, each 0-3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub questionnaire: Questionnaire,
    pub answers: Vec<u8>,
}

// ============================================================================
// Results
// ============================================================================

/// A named classification band as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub color: String,
    pub description: String,
}

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResult {
    pub method: BodyFatMethod,
    pub gender: Gender,
    pub body_fat_pct: f64,
    pub category: Category,
    /// Fat mass (kg), when weight was supplied
    pub fat_mass_kg: Option<f64>,
    /// Lean mass (kg), when weight was supplied
    pub lean_mass_kg: Option<f64>,
    /// Body-fat percentage band considered fit for this gender
    pub ideal_range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: Category,
    /// Weight range (kg) for a BMI of 18.5-24.9 at this height
    pub healthy_weight_kg: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdeeEntry {
    pub activity: ActivityLevel,
    pub multiplier: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmrResult {
    pub method: BmrMethod,
    pub bmr: f64,
    /// Lean body mass (kg), when body fat was supplied
    pub lean_body_mass_kg: Option<f64>,
    /// TDEE for every activity level
    pub tdee: Vec<TdeeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroAmount {
    pub percent: f64,
    pub grams: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroResult {
    pub method: BmrMethod,
    pub bmr: f64,
    pub activity: ActivityLevel,
    pub tdee: f64,
    pub goal: Goal,
    pub target_calories: f64,
    pub protein: MacroAmount,
    pub carbs: MacroAmount,
    pub fat: MacroAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZone {
    pub zone: u8,
    pub name: String,
    pub min_pct: f64,
    pub max_pct: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateResult {
    pub max_hr: f64,
    /// True when the max heart rate was estimated from age
    pub max_hr_estimated: bool,
    pub resting_hr: Option<f64>,
    /// Heart-rate reserve (max - resting), when resting HR is known
    pub reserve: Option<f64>,
    pub zones: Vec<HeartRateZone>,
    /// Uth-Sorensen VO2max estimate (ml/kg/min)
    pub vo2max_estimate: Option<f64>,
    pub resting_category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightEstimate {
    pub formula: String,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub estimates: Vec<IdealWeightEstimate>,
    pub average_kg: f64,
    pub range_kg: Range,
    /// Average and range in the caller's mass unit
    pub average: f64,
    pub range: Range,
    pub unit: String,
}

/// Blood-pressure category, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    Low,
    Normal,
    Elevated,
    Hypertension1,
    Hypertension2,
    HypertensiveCrisis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureResult {
    pub systolic: f64,
    pub diastolic: f64,
    pub pulse: Option<f64>,
    pub category: BloodPressureCategory,
    pub display: Category,
    pub recommendations: Vec<String>,
    /// Mean arterial pressure (mmHg)
    pub mean_arterial_pressure: f64,
    /// Systolic minus diastolic (mmHg)
    pub pulse_pressure: f64,
    /// Seek immediate care
    pub emergency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepOption {
    pub cycles: u32,
    pub time: NaiveTime,
    pub sleep_minutes: u32,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepTimesResult {
    pub target: SleepTarget,
    pub cycle_minutes: u32,
    pub fall_asleep_minutes: u32,
    pub options: Vec<SleepOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepQualityResult {
    pub score: f64,
    pub duration_score: f64,
    pub latency_score: f64,
    pub continuity_score: f64,
    pub rating_score: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterIntakeResult {
    pub millilitres: f64,
    pub litres: f64,
    /// 250 ml glasses, rounded up
    pub glasses: u32,
    /// Fluid ounces, for imperial callers
    pub fluid_ounces: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub questionnaire: Questionnaire,
    pub score: u32,
    pub max_score: u32,
    pub category: Category,
    /// Self-harm item answered above zero
    pub urgent_support: bool,
}

/// The packaged output of any calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationResult {
    BodyFat(BodyFatResult),
    Bmi(BmiResult),
    Bmr(BmrResult),
    Macros(MacroResult),
    HeartRate(HeartRateResult),
    IdealWeight(IdealWeightResult),
    BloodPressure(BloodPressureResult),
    SleepTimes(SleepTimesResult),
    SleepQuality(SleepQualityResult),
    WaterIntake(WaterIntakeResult),
    Assessment(AssessmentResult),
}
