//! healthcalc CLI - Command-line interface for healthcalc
//!
//! Commands:
//! - body-fat, bmi, bmr, macros, heart-rate, ideal-weight, water: body calculators
//! - sleep, sleep-quality: sleep timing and scoring
//! - mental-health: PHQ-9 / GAD-7 self-assessment
//! - bp: check a reading or manage the saved reading history
//! - doctor: diagnose configuration and storage

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use healthcalc::error::COMPUTATION_FAILURE_MESSAGE;
use healthcalc::history::{self, BpSummary, SortKey, SortOrder, STORAGE_KEY};
use healthcalc::normalizer::from_metric_mass;
use healthcalc::types::{
    ActivityLevel, AssessmentInput, BloodPressureInput, BmrMethod, BodyFatMethod,
    CalculationResult, Gender, Goal, HydrationFactors, MeasurementInput, Questionnaire,
    SleepQualityInput, SleepTarget, UnitSystem,
};
use healthcalc::validation::{self, parse_field, parse_optional_field};
use healthcalc::{
    BpReading, BpTracker, CalculatorConfig, ComputeError, FieldError, JsonFileRepository,
    NewReading, ValidationErrors, HEALTHCALC_VERSION,
};

/// healthcalc - Health and fitness calculators
#[derive(Parser)]
#[command(name = "healthcalc")]
#[command(version = HEALTHCALC_VERSION)]
#[command(
    about = "Body composition, metabolism, blood pressure and sleep calculators",
    long_about = None
)]
struct Cli {
    /// Load calculator settings from a JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Blood-pressure history file
    #[arg(long, global = true, default_value = "bloodPressureReadings.json")]
    store: PathBuf,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate body-fat percentage
    BodyFat {
        #[arg(long, value_enum, default_value = "navy")]
        method: BodyFatMethodArg,

        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Body-mass index
    Bmi {
        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Basal metabolic rate and daily energy expenditure
    Bmr {
        #[arg(long, value_enum, default_value = "mifflin-st-jeor")]
        method: BmrMethodArg,

        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Calorie target and macronutrient split
    Macros {
        #[arg(long, value_enum, default_value = "mifflin-st-jeor")]
        method: BmrMethodArg,

        #[arg(long, value_enum, default_value = "moderate")]
        activity: ActivityArg,

        #[arg(long, value_enum, default_value = "maintain")]
        goal: GoalArg,

        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Heart-rate training zones
    HeartRate {
        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Ideal body weight
    IdealWeight {
        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Daily water intake
    Water {
        /// Minutes of exercise per day
        #[arg(long, default_value = "0")]
        exercise_minutes: String,

        /// Hot or humid climate
        #[arg(long)]
        hot_climate: bool,

        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Bedtimes or wake-up times aligned to sleep cycles
    Sleep {
        /// Wake-up time (HH:MM)
        #[arg(long, conflicts_with = "bed", required_unless_present = "bed")]
        wake: Option<String>,

        /// Bedtime (HH:MM)
        #[arg(long)]
        bed: Option<String>,
    },

    /// Score a night of sleep
    SleepQuality {
        /// Hours slept
        #[arg(long)]
        hours: String,

        /// Minutes to fall asleep
        #[arg(long)]
        latency: String,

        /// Times woken during the night
        #[arg(long, default_value = "0")]
        awakenings: u32,

        /// How rested you feel, 1-5
        #[arg(long)]
        rating: u8,
    },

    /// PHQ-9 or GAD-7 self-assessment
    MentalHealth {
        #[arg(long, value_enum)]
        questionnaire: QuestionnaireArg,

        /// Comma-separated answers, each 0-3
        #[arg(long)]
        answers: String,
    },

    /// Blood-pressure check and reading history
    Bp {
        #[command(subcommand)]
        command: BpCommand,
    },

    /// Diagnose configuration and storage
    Doctor,
}

#[derive(Subcommand)]
enum BpCommand {
    /// Categorize a reading without saving it
    Check {
        #[command(flatten)]
        reading: ReadingArgs,
    },

    /// Save a reading to the history
    Add {
        #[command(flatten)]
        reading: ReadingArgs,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Time (HH:MM), defaults to now
        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List saved readings, newest entry first
    List {
        /// Sort by a column instead of entry order
        #[arg(long, value_enum)]
        sort: Option<SortKeyArg>,

        #[arg(long, value_enum, default_value = "desc", requires = "sort")]
        order: SortOrderArg,
    },

    /// Delete one reading by id
    Remove { id: String },

    /// Delete every reading
    Clear,

    /// Export readings as CSV
    Export {
        /// Output file (use - for stdout); defaults to blood-pressure-data-<today>.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Body measurements, parsed strictly before any calculation
#[derive(Args)]
struct MeasurementArgs {
    #[arg(long, value_enum, default_value = "metric")]
    units: UnitsArg,

    #[arg(long, value_enum, default_value = "male")]
    gender: GenderArg,

    /// Age (years)
    #[arg(long)]
    age: Option<String>,

    /// Height (cm | in)
    #[arg(long)]
    height: Option<String>,

    /// Weight (kg | lb)
    #[arg(long)]
    weight: Option<String>,

    /// Neck circumference (cm | in)
    #[arg(long)]
    neck: Option<String>,

    /// Waist circumference (cm | in)
    #[arg(long)]
    waist: Option<String>,

    /// Hip circumference (cm | in)
    #[arg(long)]
    hip: Option<String>,

    /// Triceps skinfold (mm | in)
    #[arg(long)]
    triceps: Option<String>,

    /// Subscapular skinfold (mm | in)
    #[arg(long)]
    subscapular: Option<String>,

    /// Suprailiac skinfold (mm | in)
    #[arg(long)]
    suprailiac: Option<String>,

    /// Thigh skinfold (mm | in)
    #[arg(long)]
    thigh: Option<String>,

    /// Known body-fat percentage
    #[arg(long)]
    body_fat: Option<String>,

    /// Resting heart rate (bpm)
    #[arg(long)]
    resting_hr: Option<String>,

    /// Measured maximum heart rate (bpm)
    #[arg(long)]
    max_hr: Option<String>,
}

impl MeasurementArgs {
    fn to_input(&self) -> Result<MeasurementInput, ComputeError> {
        let mut errors = ValidationErrors::default();
        let mut parse = |field: &str, raw: &Option<String>| {
            match parse_optional_field(field, raw.as_deref()) {
                Ok(value) => value,
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        };

        let input = MeasurementInput {
            unit_system: self.units.into(),
            gender: self.gender.into(),
            age: parse("age", &self.age),
            height: parse("height", &self.height),
            weight: parse("weight", &self.weight),
            neck: parse("neck", &self.neck),
            waist: parse("waist", &self.waist),
            hip: parse("hip", &self.hip),
            triceps: parse("triceps", &self.triceps),
            subscapular: parse("subscapular", &self.subscapular),
            suprailiac: parse("suprailiac", &self.suprailiac),
            thigh: parse("thigh", &self.thigh),
            body_fat_pct: parse("body_fat_pct", &self.body_fat),
            resting_hr: parse("resting_hr", &self.resting_hr),
            max_hr: parse("max_hr", &self.max_hr),
        };

        errors.into_result()?;
        Ok(input)
    }
}

#[derive(Args)]
struct ReadingArgs {
    /// Systolic pressure (mmHg)
    #[arg(long)]
    systolic: String,

    /// Diastolic pressure (mmHg)
    #[arg(long)]
    diastolic: String,

    /// Pulse (bpm)
    #[arg(long)]
    pulse: Option<String>,
}

impl ReadingArgs {
    fn to_input(&self) -> Result<BloodPressureInput, ComputeError> {
        let mut errors = ValidationErrors::default();
        let systolic = parse_field("systolic", &self.systolic).map_err(|e| errors.push(e));
        let diastolic = parse_field("diastolic", &self.diastolic).map_err(|e| errors.push(e));
        let pulse =
            parse_optional_field("pulse", self.pulse.as_deref()).map_err(|e| errors.push(e));

        match (systolic, diastolic, pulse) {
            (Ok(systolic), Ok(diastolic), Ok(pulse)) => Ok(BloodPressureInput {
                systolic,
                diastolic,
                pulse,
            }),
            _ => Err(ComputeError::Validation(errors)),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for UnitSystem {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Metric => UnitSystem::Metric,
            UnitsArg::Imperial => UnitSystem::Imperial,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BodyFatMethodArg {
    /// US Navy circumference method
    Navy,
    /// BMI-based (Deurenberg) estimate
    Bmi,
    /// Jackson-Pollock skinfolds
    Skinfold,
}

impl From<BodyFatMethodArg> for BodyFatMethod {
    fn from(arg: BodyFatMethodArg) -> Self {
        match arg {
            BodyFatMethodArg::Navy => BodyFatMethod::Navy,
            BodyFatMethodArg::Bmi => BodyFatMethod::Bmi,
            BodyFatMethodArg::Skinfold => BodyFatMethod::Skinfold,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BmrMethodArg {
    MifflinStJeor,
    HarrisBenedict,
    KatchMcardle,
}

impl From<BmrMethodArg> for BmrMethod {
    fn from(arg: BmrMethodArg) -> Self {
        match arg {
            BmrMethodArg::MifflinStJeor => BmrMethod::MifflinStJeor,
            BmrMethodArg::HarrisBenedict => BmrMethod::HarrisBenedict,
            BmrMethodArg::KatchMcardle => BmrMethod::KatchMcArdle,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActivityArg {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extreme,
}

impl From<ActivityArg> for ActivityLevel {
    fn from(arg: ActivityArg) -> Self {
        match arg {
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
            ActivityArg::Light => ActivityLevel::Light,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::Active => ActivityLevel::Active,
            ActivityArg::Extreme => ActivityLevel::Extreme,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    Lose,
    Maintain,
    Gain,
    Performance,
}

impl From<GoalArg> for Goal {
    fn from(arg: GoalArg) -> Self {
        match arg {
            GoalArg::Lose => Goal::Lose,
            GoalArg::Maintain => Goal::Maintain,
            GoalArg::Gain => Goal::Gain,
            GoalArg::Performance => Goal::Performance,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum QuestionnaireArg {
    /// Depression screening, 9 items
    Phq9,
    /// Anxiety screening, 7 items
    Gad7,
}

impl From<QuestionnaireArg> for Questionnaire {
    fn from(arg: QuestionnaireArg) -> Self {
        match arg {
            QuestionnaireArg::Phq9 => Questionnaire::Phq9,
            QuestionnaireArg::Gad7 => Questionnaire::Gad7,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKeyArg {
    Date,
    Systolic,
    Diastolic,
    Pulse,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Date => SortKey::Date,
            SortKeyArg::Systolic => SortKey::Systolic,
            SortKeyArg::Diastolic => SortKey::Diastolic,
            SortKeyArg::Pulse => SortKey::Pulse,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => SortOrder::Ascending,
            SortOrderArg::Desc => SortOrder::Descending,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CalcCliError> {
    let json = cli.json;

    if let Commands::Doctor = cli.command {
        return cmd_doctor(cli.config.as_deref(), &cli.store, json);
    }

    let config = match cli.config.as_deref() {
        Some(path) => CalculatorConfig::load(path)?,
        None => CalculatorConfig::default(),
    };

    match cli.command {
        Commands::BodyFat {
            method,
            measurements,
        } => {
            let input = measurements.to_input()?;
            let result = healthcalc::calculate_body_fat(method.into(), &input, &config)?;
            emit(&CalculationResult::BodyFat(result), input.unit_system, json)
        }
        Commands::Bmi { measurements } => {
            let input = measurements.to_input()?;
            let result = healthcalc::calculate_bmi(&input)?;
            emit(&CalculationResult::Bmi(result), input.unit_system, json)
        }
        Commands::Bmr {
            method,
            measurements,
        } => {
            let input = measurements.to_input()?;
            let result = healthcalc::calculate_bmr(&input, method.into())?;
            emit(&CalculationResult::Bmr(result), input.unit_system, json)
        }
        Commands::Macros {
            method,
            activity,
            goal,
            measurements,
        } => {
            let input = measurements.to_input()?;
            let result =
                healthcalc::calculate_macros(&input, method.into(), activity.into(), goal.into())?;
            emit(&CalculationResult::Macros(result), input.unit_system, json)
        }
        Commands::HeartRate { measurements } => {
            let input = measurements.to_input()?;
            let result = healthcalc::calculate_heart_rate_zones(&input)?;
            emit(&CalculationResult::HeartRate(result), input.unit_system, json)
        }
        Commands::IdealWeight { measurements } => {
            let input = measurements.to_input()?;
            let result = healthcalc::calculate_ideal_weight(&input)?;
            emit(&CalculationResult::IdealWeight(result), input.unit_system, json)
        }
        Commands::Water {
            exercise_minutes,
            hot_climate,
            measurements,
        } => {
            let input = measurements.to_input()?;
            let factors = HydrationFactors {
                exercise_minutes: parse_field("exercise_minutes", &exercise_minutes)
                    .map_err(ComputeError::field)?,
                hot_climate,
            };
            let result = healthcalc::calculate_water_intake(&input, &factors, &config)?;
            emit(&CalculationResult::WaterIntake(result), input.unit_system, json)
        }
        Commands::Sleep { wake, bed } => {
            let target = match (wake, bed) {
                (Some(wake), _) => SleepTarget::WakeAt(validation::parse_time(&wake)?),
                (None, Some(bed)) => SleepTarget::BedAt(validation::parse_time(&bed)?),
                (None, None) => {
                    return Err(CalcCliError::ParseError(
                        "Either --wake or --bed is required".to_string(),
                    ))
                }
            };
            let result = healthcalc::calculate_sleep_times(target, &config);
            emit(&CalculationResult::SleepTimes(result), UnitSystem::Metric, json)
        }
        Commands::SleepQuality {
            hours,
            latency,
            awakenings,
            rating,
        } => {
            let night = SleepQualityInput {
                hours_slept: parse_field("hours_slept", &hours).map_err(ComputeError::field)?,
                latency_minutes: parse_field("latency_minutes", &latency)
                    .map_err(ComputeError::field)?,
                awakenings,
                rating,
            };
            let result = healthcalc::score_sleep_quality(&night)?;
            emit(&CalculationResult::SleepQuality(result), UnitSystem::Metric, json)
        }
        Commands::MentalHealth {
            questionnaire,
            answers,
        } => {
            let answers = parse_answers(&answers)?;
            let result = healthcalc::score_assessment(&AssessmentInput {
                questionnaire: questionnaire.into(),
                answers,
            })?;
            emit(&CalculationResult::Assessment(result), UnitSystem::Metric, json)
        }
        Commands::Bp { command } => cmd_bp(command, &cli.store, json),
        Commands::Doctor => Ok(()),
    }
}

fn parse_answers(raw: &str) -> Result<Vec<u8>, CalcCliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| CalcCliError::ParseError(format!("'{s}' is not a valid answer (0-3)")))
        })
        .collect()
}

fn cmd_bp(command: BpCommand, store: &Path, json: bool) -> Result<(), CalcCliError> {
    if let BpCommand::Check { reading } = &command {
        let result = healthcalc::check_blood_pressure(&reading.to_input()?)?;
        return emit(&CalculationResult::BloodPressure(result), UnitSystem::Metric, json);
    }

    let mut tracker = BpTracker::open(JsonFileRepository::new(store));

    match command {
        BpCommand::Check { .. } => Ok(()),
        BpCommand::Add {
            reading,
            date,
            time,
            notes,
        } => {
            let input = reading.to_input()?;
            let now = Local::now();
            let date = match date {
                Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    CalcCliError::ParseError(format!("'{raw}' is not a valid date (YYYY-MM-DD)"))
                })?,
                None => now.date_naive(),
            };
            let time = match time {
                Some(raw) => validation::parse_time(&raw)?,
                None => NaiveTime::from_hms_opt(now.hour(), now.minute(), 0)
                    .unwrap_or_default(),
            };

            let saved = tracker.add(NewReading {
                date,
                time,
                systolic: input.systolic,
                diastolic: input.diastolic,
                pulse: input.pulse,
                notes,
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&saved)?);
            } else {
                println!("Saved reading {}", saved.id);
                print_reading(&saved);
                if saved.category().is_emergency() {
                    println!("\n!! {}", saved.category().info().recommendations.join("\n!! "));
                }
            }
            Ok(())
        }
        BpCommand::List { sort, order } => {
            let readings = tracker.list(sort.map(SortKey::from), order.into());
            let summary = tracker.summary();

            if json {
                let report = HistoryReport { readings, summary };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if readings.is_empty() {
                println!("No saved readings");
            } else {
                for reading in &readings {
                    print_reading(reading);
                }
                if let Some(summary) = summary {
                    print_summary(&summary);
                }
            }
            Ok(())
        }
        BpCommand::Remove { id } => {
            let id = Uuid::parse_str(id.trim())
                .map_err(|_| CalcCliError::ParseError(format!("'{id}' is not a reading id")))?;
            if tracker.remove(id)? {
                println!("Removed reading {id}");
                Ok(())
            } else {
                Err(CalcCliError::NotFound(id.to_string()))
            }
        }
        BpCommand::Clear => {
            let count = tracker.len();
            tracker.clear()?;
            println!("Removed {count} readings");
            Ok(())
        }
        BpCommand::Export { output } => {
            let csv = tracker.export_csv()?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(history::export_filename(Local::now().date_naive()))
            });

            if path.as_os_str() == "-" {
                print!("{csv}");
            } else {
                fs::write(&path, csv)?;
                println!("Exported {} readings to {}", tracker.len(), path.display());
            }
            Ok(())
        }
    }
}

fn emit(result: &CalculationResult, units: UnitSystem, json: bool) -> Result<(), CalcCliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_result(result, units);
    }
    Ok(())
}

fn mass(kg: f64, units: UnitSystem) -> String {
    let unit = units.mass_unit();
    format!("{:.1} {}", from_metric_mass(kg, unit), unit.symbol())
}

fn print_result(result: &CalculationResult, units: UnitSystem) {
    match result {
        CalculationResult::BodyFat(r) => {
            println!(
                "Body fat ({}): {:.1}%  [{}]",
                r.method.as_str(),
                r.body_fat_pct,
                r.category.label
            );
            println!("  {}", r.category.description);
            if let (Some(fat), Some(lean)) = (r.fat_mass_kg, r.lean_mass_kg) {
                println!("  Fat mass:  {}", mass(fat, units));
                println!("  Lean mass: {}", mass(lean, units));
            }
            println!(
                "  Ideal range ({}): {:.0}-{:.0}%",
                r.gender.as_str(),
                r.ideal_range.min,
                r.ideal_range.max
            );
        }
        CalculationResult::Bmi(r) => {
            println!("BMI: {:.1}  [{}]", r.bmi, r.category.label);
            println!("  {}", r.category.description);
            println!(
                "  Healthy weight for your height: {} - {}",
                mass(r.healthy_weight_kg.min, units),
                mass(r.healthy_weight_kg.max, units)
            );
        }
        CalculationResult::Bmr(r) => {
            println!("BMR ({:?}): {:.0} kcal/day", r.method, r.bmr);
            if let Some(lean) = r.lean_body_mass_kg {
                println!("  Lean body mass: {}", mass(lean, units));
            }
            println!("  Daily energy expenditure:");
            for entry in &r.tdee {
                println!(
                    "    {:<10} x{:<6} {:>6.0} kcal",
                    entry.activity.as_str(),
                    entry.multiplier,
                    entry.calories
                );
            }
        }
        CalculationResult::Macros(r) => {
            println!(
                "Target: {:.0} kcal/day ({:?}, {} activity, TDEE {:.0})",
                r.target_calories,
                r.goal,
                r.activity.as_str(),
                r.tdee
            );
            for (name, amount) in [("Protein", &r.protein), ("Carbs", &r.carbs), ("Fat", &r.fat)] {
                println!(
                    "  {:<8} {:>3.0}%  {:>4.0} g  {:>5.0} kcal",
                    name, amount.percent, amount.grams, amount.calories
                );
            }
        }
        CalculationResult::HeartRate(r) => {
            let source = if r.max_hr_estimated { "estimated" } else { "measured" };
            println!("Max heart rate: {:.0} bpm ({source})", r.max_hr);
            if let Some(category) = &r.resting_category {
                println!("  Resting heart rate: {}", category.label);
            }
            if let Some(vo2) = r.vo2max_estimate {
                println!("  VO2max estimate: {vo2:.1} ml/kg/min");
            }
            for zone in &r.zones {
                println!(
                    "  Zone {} {:<26} {:>3.0}-{:<3.0}%  {:.0}-{:.0} bpm",
                    zone.zone, zone.name, zone.min_pct, zone.max_pct, zone.min_bpm, zone.max_bpm
                );
            }
        }
        CalculationResult::IdealWeight(r) => {
            println!(
                "Ideal weight: {:.1} {} (range {:.1}-{:.1} {})",
                r.average, r.unit, r.range.min, r.range.max, r.unit
            );
            for estimate in &r.estimates {
                println!("  {:<10} {}", estimate.formula, mass(estimate.weight_kg, units));
            }
        }
        CalculationResult::BloodPressure(r) => {
            println!(
                "Blood pressure: {:.0}/{:.0} mmHg  [{}]",
                r.systolic, r.diastolic, r.display.label
            );
            println!("  {}", r.display.description);
            println!("  MAP: {:.1} mmHg", r.mean_arterial_pressure);
            println!("  Pulse pressure: {:.0} mmHg", r.pulse_pressure);
            if r.emergency {
                println!("\n!! This reading is in the hypertensive crisis range.");
            }
            for recommendation in &r.recommendations {
                println!("  - {recommendation}");
            }
        }
        CalculationResult::SleepTimes(r) => {
            let (heading, verb) = match r.target {
                SleepTarget::WakeAt(t) => (
                    format!("To wake up at {}", t.format("%H:%M")),
                    "go to bed at",
                ),
                SleepTarget::BedAt(t) => (
                    format!("Going to bed at {}", t.format("%H:%M")),
                    "wake up at",
                ),
            };
            println!("{heading}, {verb}:");
            for option in &r.options {
                let marker = if option.recommended { "  (recommended)" } else { "" };
                println!(
                    "  {}  {} cycles, {:.1} h{}",
                    option.time.format("%H:%M"),
                    option.cycles,
                    f64::from(option.sleep_minutes) / 60.0,
                    marker
                );
            }
            println!(
                "  Assumes {} min cycles and {} min to fall asleep",
                r.cycle_minutes, r.fall_asleep_minutes
            );
        }
        CalculationResult::SleepQuality(r) => {
            println!("Sleep quality: {:.0}/100  [{}]", r.score, r.category.label);
            println!("  {}", r.category.description);
            println!(
                "  Duration {:.0}, latency {:.0}, continuity {:.0}, rating {:.0}",
                r.duration_score, r.latency_score, r.continuity_score, r.rating_score
            );
        }
        CalculationResult::WaterIntake(r) => {
            if units == UnitSystem::Imperial {
                println!("Water: {:.0} fl oz per day ({} glasses)", r.fluid_ounces, r.glasses);
            } else {
                println!("Water: {:.1} L per day ({} glasses)", r.litres, r.glasses);
            }
        }
        CalculationResult::Assessment(r) => {
            println!(
                "{}: {}/{}  [{}]",
                r.questionnaire.as_str().to_uppercase(),
                r.score,
                r.max_score,
                r.category.label
            );
            println!("  {}", r.category.description);
            if r.urgent_support {
                println!(
                    "\n!! If you are having thoughts of harming yourself, \
                     please contact a crisis line or emergency services now."
                );
            }
            println!("\nThis is a screening tool, not a diagnosis.");
        }
    }
}

fn print_reading(reading: &BpReading) {
    let pulse = reading
        .pulse
        .map(|p| format!("  pulse {p:.0}"))
        .unwrap_or_default();
    println!(
        "{} {}  {:.0}/{:.0}{}  [{}]  {}",
        reading.date,
        reading.time.format("%H:%M"),
        reading.systolic,
        reading.diastolic,
        pulse,
        reading.category().label(),
        reading.id
    );
    if let Some(notes) = &reading.notes {
        println!("    {notes}");
    }
}

fn print_summary(summary: &BpSummary) {
    println!("\n{} readings", summary.count);
    println!(
        "  Average: {:.0}/{:.0} mmHg  [{}]",
        summary.avg_systolic,
        summary.avg_diastolic,
        summary.category.label()
    );
    println!(
        "  Systolic {:.0}-{:.0}, diastolic {:.0}-{:.0}",
        summary.min_systolic, summary.max_systolic, summary.min_diastolic, summary.max_diastolic
    );
    if let Some(pulse) = summary.avg_pulse {
        println!("  Average pulse: {pulse:.0} bpm");
    }
}

fn cmd_doctor(config: Option<&Path>, store: &Path, json: bool) -> Result<(), CalcCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "healthcalc_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("healthcalc version {}", HEALTHCALC_VERSION),
    });

    match config {
        Some(path) => {
            let check = match CalculatorConfig::load(path) {
                Ok(loaded) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid (sleep cycle {} min, fall asleep {} min)",
                        loaded.sleep.cycle_minutes, loaded.sleep.fall_asleep_minutes
                    ),
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot use config file: {}", e),
                },
            };
            checks.push(check);
        }
        None => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "No config file, using defaults".to_string(),
        }),
    }

    // Load directly so a malformed store is reported instead of silently discarded
    let store_check = if store.exists() {
        match fs::read_to_string(store) {
            Ok(content) => match serde_json::from_str::<Vec<BpReading>>(&content) {
                Ok(readings) => DoctorCheck {
                    name: STORAGE_KEY.to_string(),
                    status: CheckStatus::Ok,
                    message: format!("History file valid ({} readings)", readings.len()),
                },
                Err(e) => DoctorCheck {
                    name: STORAGE_KEY.to_string(),
                    status: CheckStatus::Error,
                    message: format!(
                        "Malformed history file, it will be discarded on next save: {}",
                        e
                    ),
                },
            },
            Err(e) => DoctorCheck {
                name: STORAGE_KEY.to_string(),
                status: CheckStatus::Error,
                message: format!("Cannot read history file: {}", e),
            },
        }
    } else {
        DoctorCheck {
            name: STORAGE_KEY.to_string(),
            status: CheckStatus::Warning,
            message: format!("History file {} does not exist yet", store.display()),
        }
    };
    checks.push(store_check);

    let stdout_check = if atty::is(atty::Stream::Stdout) {
        DoctorCheck {
            name: "stdout".to_string(),
            status: CheckStatus::Ok,
            message: "stdout is a TTY (text output)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdout".to_string(),
            status: CheckStatus::Ok,
            message: "stdout is a pipe (use --json for machine-readable output)".to_string(),
        }
    };
    checks.push(stdout_check);

    let report = DoctorReport {
        version: HEALTHCALC_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("healthcalc Doctor Report");
        println!("========================");
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CalcCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum CalcCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NotFound(String),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for CalcCliError {
    fn from(e: io::Error) -> Self {
        CalcCliError::Io(e)
    }
}

impl From<ComputeError> for CalcCliError {
    fn from(e: ComputeError) -> Self {
        CalcCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CalcCliError {
    fn from(e: serde_json::Error) -> Self {
        CalcCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl CliError {
    fn new(code: &str, message: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            hint: hint.map(str::to_string),
            fields: Vec::new(),
        }
    }
}

impl From<ComputeError> for CliError {
    fn from(e: ComputeError) -> Self {
        match e {
            ComputeError::Validation(errors) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: errors.to_string(),
                hint: Some("Fix the listed fields and retry".to_string()),
                fields: errors.0,
            },
            ComputeError::ComputationFailure(detail) => {
                CliError::new(
                    "COMPUTATION_FAILURE",
                    COMPUTATION_FAILURE_MESSAGE,
                    Some(detail.as_str()),
                )
            }
            ComputeError::InvalidTime(msg) => {
                CliError::new("INVALID_TIME", msg, Some("Use 24-hour HH:MM, e.g. 07:00"))
            }
            ComputeError::Config(msg) => {
                CliError::new("CONFIG_ERROR", msg, Some("Run 'healthcalc doctor --config <path>'"))
            }
            ComputeError::Persistence(msg) => {
                CliError::new("PERSISTENCE_ERROR", msg, Some("Check --store path and permissions"))
            }
            ComputeError::Csv(e) => {
                CliError::new("CSV_ERROR", e.to_string(), Some("Retry the export"))
            }
            ComputeError::JsonError(e) => {
                CliError::new("JSON_ERROR", e.to_string(), Some("Check JSON syntax"))
            }
            ComputeError::Io(e) => {
                CliError::new("IO_ERROR", e.to_string(), Some("Check file paths and permissions"))
            }
        }
    }
}

impl From<CalcCliError> for CliError {
    fn from(e: CalcCliError) -> Self {
        match e {
            CalcCliError::Io(e) => {
                CliError::new("IO_ERROR", e.to_string(), Some("Check file paths and permissions"))
            }
            CalcCliError::Compute(e) => CliError::from(e),
            CalcCliError::Json(e) => {
                CliError::new("JSON_ERROR", e.to_string(), Some("Check JSON syntax"))
            }
            CalcCliError::NotFound(id) => CliError::new(
                "NOT_FOUND",
                format!("No reading with id {id}"),
                Some("Run 'healthcalc bp list' to see reading ids"),
            ),
            CalcCliError::DoctorFailed => CliError::new(
                "DOCTOR_FAILED",
                "One or more health checks failed",
                Some("Review the doctor report for details"),
            ),
            CalcCliError::ParseError(msg) => {
                CliError::new("PARSE_ERROR", msg, Some("Check input format"))
            }
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct HistoryReport {
    readings: Vec<BpReading>,
    summary: Option<BpSummary>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
