//! Result classification
//!
//! Each metric has exactly one threshold table: ascending, non-overlapping
//! `[min, max)` bands starting at zero, the last band open-ended. Lookup is a
//! linear scan, so every finite value >= 0 lands in exactly one band.

use crate::types::{BloodPressureCategory, Category, Gender, Questionnaire};
use serde::Serialize;

/// One classification band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub min: f64,
    /// Exclusive upper bound; `None` for the open top band
    pub max: Option<f64>,
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

impl Band {
    const fn new(
        min: f64,
        max: Option<f64>,
        label: &'static str,
        color: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            label,
            color,
            description,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value < max)
    }

    pub fn to_category(&self) -> Category {
        Category {
            label: self.label.to_string(),
            color: self.color.to_string(),
            description: self.description.to_string(),
        }
    }
}

#[rustfmt::skip]
pub const BODY_FAT_MALE: &[Band] = &[
    Band::new(0.0, Some(2.0), "Dangerously Low", "#dc2626", "Below essential fat; a health risk"),
    Band::new(2.0, Some(6.0), "Essential Fat", "#f97316", "Minimum fat needed for basic physiological function"),
    Band::new(6.0, Some(14.0), "Athletic", "#16a34a", "Typical of competitive athletes"),
    Band::new(14.0, Some(18.0), "Fitness", "#22c55e", "Lean and fit, typical of regular exercisers"),
    Band::new(18.0, Some(25.0), "Average", "#eab308", "Typical of the general population"),
    Band::new(25.0, None, "Obese", "#dc2626", "Elevated risk of metabolic and cardiovascular disease"),
];

#[rustfmt::skip]
pub const BODY_FAT_FEMALE: &[Band] = &[
    Band::new(0.0, Some(10.0), "Dangerously Low", "#dc2626", "Below essential fat; a health risk"),
    Band::new(10.0, Some(14.0), "Essential Fat", "#f97316", "Minimum fat needed for basic physiological function"),
    Band::new(14.0, Some(21.0), "Athletic", "#16a34a", "Typical of competitive athletes"),
    Band::new(21.0, Some(25.0), "Fitness", "#22c55e", "Lean and fit, typical of regular exercisers"),
    Band::new(25.0, Some(32.0), "Average", "#eab308", "Typical of the general population"),
    Band::new(32.0, None, "Obese", "#dc2626", "Elevated risk of metabolic and cardiovascular disease"),
];

#[rustfmt::skip]
pub const BMI: &[Band] = &[
    Band::new(0.0, Some(18.5), "Underweight", "#3b82f6", "Below the healthy weight range for your height"),
    Band::new(18.5, Some(25.0), "Normal", "#22c55e", "Within the healthy weight range for your height"),
    Band::new(25.0, Some(30.0), "Overweight", "#eab308", "Above the healthy weight range for your height"),
    Band::new(30.0, Some(35.0), "Obese Class I", "#f97316", "Moderately increased health risk"),
    Band::new(35.0, Some(40.0), "Obese Class II", "#ef4444", "Severely increased health risk"),
    Band::new(40.0, None, "Obese Class III", "#dc2626", "Very severely increased health risk"),
];

#[rustfmt::skip]
pub const RESTING_HEART_RATE: &[Band] = &[
    Band::new(0.0, Some(60.0), "Athlete", "#16a34a", "Typical of well-trained endurance athletes"),
    Band::new(60.0, Some(66.0), "Excellent", "#22c55e", "Strong cardiovascular fitness"),
    Band::new(66.0, Some(74.0), "Good", "#84cc16", "Above-average cardiovascular fitness"),
    Band::new(74.0, Some(82.0), "Average", "#eab308", "Typical resting heart rate"),
    Band::new(82.0, None, "Below Average", "#f97316", "Consider more aerobic exercise"),
];

#[rustfmt::skip]
pub const SLEEP_QUALITY: &[Band] = &[
    Band::new(0.0, Some(40.0), "Poor", "#ef4444", "Your sleep is likely leaving you under-rested"),
    Band::new(40.0, Some(60.0), "Fair", "#f97316", "Some aspects of your sleep could improve"),
    Band::new(60.0, Some(80.0), "Good", "#84cc16", "Your sleep is generally restorative"),
    Band::new(80.0, None, "Excellent", "#16a34a", "Your sleep habits are working well"),
];

#[rustfmt::skip]
pub const PHQ9: &[Band] = &[
    Band::new(0.0, Some(5.0), "Minimal", "#16a34a", "Minimal or no depressive symptoms"),
    Band::new(5.0, Some(10.0), "Mild", "#84cc16", "Mild symptoms; watchful waiting and self-care"),
    Band::new(10.0, Some(15.0), "Moderate", "#eab308", "Moderate symptoms; consider talking to a professional"),
    Band::new(15.0, Some(20.0), "Moderately Severe", "#f97316", "Speaking with a healthcare provider is recommended"),
    Band::new(20.0, None, "Severe", "#dc2626", "Please seek professional support soon"),
];

#[rustfmt::skip]
pub const GAD7: &[Band] = &[
    Band::new(0.0, Some(5.0), "Minimal", "#16a34a", "Minimal anxiety symptoms"),
    Band::new(5.0, Some(10.0), "Mild", "#84cc16", "Mild anxiety; self-care strategies may help"),
    Band::new(10.0, Some(15.0), "Moderate", "#eab308", "Moderate anxiety; consider talking to a professional"),
    Band::new(15.0, None, "Severe", "#dc2626", "Please seek professional support soon"),
];

// Per-reading blood-pressure bands, indexed by severity
const SYSTOLIC: &[(f64, Option<f64>, BloodPressureCategory)] = &[
    (0.0, Some(90.0), BloodPressureCategory::Low),
    (90.0, Some(120.0), BloodPressureCategory::Normal),
    (120.0, Some(130.0), BloodPressureCategory::Elevated),
    (130.0, Some(140.0), BloodPressureCategory::Hypertension1),
    (140.0, Some(180.0), BloodPressureCategory::Hypertension2),
    (180.0, None, BloodPressureCategory::HypertensiveCrisis),
];

const DIASTOLIC: &[(f64, Option<f64>, BloodPressureCategory)] = &[
    (0.0, Some(60.0), BloodPressureCategory::Low),
    (60.0, Some(80.0), BloodPressureCategory::Normal),
    (80.0, Some(90.0), BloodPressureCategory::Hypertension1),
    (90.0, Some(120.0), BloodPressureCategory::Hypertension2),
    (120.0, None, BloodPressureCategory::HypertensiveCrisis),
];

/// Find the band containing `value`; `None` for negative or non-finite input
pub fn classify(table: &'static [Band], value: f64) -> Option<&'static Band> {
    if !value.is_finite() {
        return None;
    }
    table.iter().find(|band| band.contains(value))
}

pub fn body_fat_table(gender: Gender) -> &'static [Band] {
    match gender {
        Gender::Male => BODY_FAT_MALE,
        Gender::Female => BODY_FAT_FEMALE,
    }
}

pub fn questionnaire_table(questionnaire: Questionnaire) -> &'static [Band] {
    match questionnaire {
        Questionnaire::Phq9 => PHQ9,
        Questionnaire::Gad7 => GAD7,
    }
}

/// Band a body-fat percentage falls in for `gender`
pub fn classify_body_fat(gender: Gender, body_fat_pct: f64) -> Option<&'static Band> {
    classify(body_fat_table(gender), body_fat_pct)
}

/// The "Fitness" band for `gender`, reported as the ideal body-fat range
pub fn ideal_body_fat_band(gender: Gender) -> &'static Band {
    let table = body_fat_table(gender);
    table
        .iter()
        .find(|band| band.label == "Fitness")
        .unwrap_or(&table[table.len() / 2])
}

fn lookup_pressure(
    table: &[(f64, Option<f64>, BloodPressureCategory)],
    value: f64,
) -> BloodPressureCategory {
    table
        .iter()
        .find(|(min, max, _)| value >= *min && max.map_or(true, |m| value < m))
        .map(|(_, _, category)| *category)
        .unwrap_or(BloodPressureCategory::Low)
}

/// Categorize a systolic/diastolic pair.
///
/// The more severe of the two readings wins. Low applies when either reading is
/// low and neither is above normal.
pub fn classify_blood_pressure(systolic: f64, diastolic: f64) -> BloodPressureCategory {
    let sys = lookup_pressure(SYSTOLIC, systolic);
    let dia = lookup_pressure(DIASTOLIC, diastolic);
    let worst = sys.max(dia);

    if worst <= BloodPressureCategory::Normal
        && (sys == BloodPressureCategory::Low || dia == BloodPressureCategory::Low)
    {
        BloodPressureCategory::Low
    } else {
        worst
    }
}

/// Display data for a blood-pressure category
pub struct BloodPressureInfo {
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub recommendations: &'static [&'static str],
}

impl BloodPressureCategory {
    pub const ALL: [BloodPressureCategory; 6] = [
        BloodPressureCategory::Low,
        BloodPressureCategory::Normal,
        BloodPressureCategory::Elevated,
        BloodPressureCategory::Hypertension1,
        BloodPressureCategory::Hypertension2,
        BloodPressureCategory::HypertensiveCrisis,
    ];

    pub fn info(&self) -> BloodPressureInfo {
        match self {
            BloodPressureCategory::Low => BloodPressureInfo {
                label: "Low",
                color: "#3b82f6",
                description: "Blood pressure below 90/60 mmHg",
                recommendations: &[
                    "Stay well hydrated",
                    "Stand up slowly to avoid dizziness",
                    "Talk to your doctor if you feel faint or fatigued",
                ],
            },
            BloodPressureCategory::Normal => BloodPressureInfo {
                label: "Normal",
                color: "#22c55e",
                description: "Blood pressure below 120/80 mmHg",
                recommendations: &[
                    "Maintain a balanced diet and regular exercise",
                    "Check your blood pressure at least once a year",
                ],
            },
            BloodPressureCategory::Elevated => BloodPressureInfo {
                label: "Elevated",
                color: "#eab308",
                description: "Systolic 120-129 mmHg and diastolic below 80 mmHg",
                recommendations: &[
                    "Reduce sodium intake",
                    "Aim for 150 minutes of moderate exercise per week",
                    "Limit alcohol and avoid tobacco",
                ],
            },
            BloodPressureCategory::Hypertension1 => BloodPressureInfo {
                label: "Hypertension Stage 1",
                color: "#f97316",
                description: "Systolic 130-139 mmHg or diastolic 80-89 mmHg",
                recommendations: &[
                    "Discuss your readings with a healthcare provider",
                    "Adopt the DASH eating plan",
                    "Monitor your blood pressure regularly at home",
                ],
            },
            BloodPressureCategory::Hypertension2 => BloodPressureInfo {
                label: "Hypertension Stage 2",
                color: "#ef4444",
                description: "Systolic 140 mmHg or higher, or diastolic 90 mmHg or higher",
                recommendations: &[
                    "See a healthcare provider promptly",
                    "Medication may be needed alongside lifestyle changes",
                    "Track your readings and share them with your doctor",
                ],
            },
            BloodPressureCategory::HypertensiveCrisis => BloodPressureInfo {
                label: "Hypertensive Crisis",
                color: "#b91c1c",
                description: "Systolic 180 mmHg or higher, or diastolic 120 mmHg or higher",
                recommendations: &[
                    "Wait five minutes and measure again",
                    "If readings stay this high, contact emergency services",
                    "Call emergency services immediately if you have chest pain, shortness of breath, or vision changes",
                ],
            },
        }
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn to_category(&self) -> Category {
        let info = self.info();
        Category {
            label: info.label.to_string(),
            color: info.color.to_string(),
            description: info.description.to_string(),
        }
    }

    pub fn is_emergency(&self) -> bool {
        *self == BloodPressureCategory::HypertensiveCrisis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_TABLES: &[&[Band]] = &[
        BODY_FAT_MALE,
        BODY_FAT_FEMALE,
        BMI,
        RESTING_HEART_RATE,
        SLEEP_QUALITY,
        PHQ9,
        GAD7,
    ];

    #[test]
    fn test_tables_are_contiguous() {
        for table in ALL_TABLES {
            assert_eq!(table[0].min, 0.0);
            for pair in table.windows(2) {
                assert_eq!(pair[0].max, Some(pair[1].min));
            }
            assert_eq!(table[table.len() - 1].max, None);
        }
    }

    #[test]
    fn test_body_fat_has_six_bands_per_gender() {
        assert_eq!(BODY_FAT_MALE.len(), 6);
        assert_eq!(BODY_FAT_FEMALE.len(), 6);
    }

    #[test]
    fn test_body_fat_boundaries() {
        assert_eq!(classify_body_fat(Gender::Male, 13.99).unwrap().label, "Athletic");
        assert_eq!(classify_body_fat(Gender::Male, 14.0).unwrap().label, "Fitness");
        assert_eq!(classify_body_fat(Gender::Male, 25.0).unwrap().label, "Obese");
        assert_eq!(classify_body_fat(Gender::Female, 24.0).unwrap().label, "Fitness");
        assert_eq!(classify_body_fat(Gender::Female, 40.0).unwrap().label, "Obese");
    }

    #[test]
    fn test_negative_and_nan_unclassified() {
        assert!(classify(BMI, -1.0).is_none());
        assert!(classify(BMI, f64::NAN).is_none());
    }

    #[test]
    fn test_ideal_body_fat_band() {
        let male = ideal_body_fat_band(Gender::Male);
        assert_eq!((male.min, male.max), (14.0, Some(18.0)));
        let female = ideal_body_fat_band(Gender::Female);
        assert_eq!((female.min, female.max), (21.0, Some(25.0)));
    }

    #[test]
    fn test_blood_pressure_categories() {
        use BloodPressureCategory::*;
        assert_eq!(classify_blood_pressure(85.0, 55.0), Low);
        assert_eq!(classify_blood_pressure(118.0, 55.0), Low);
        assert_eq!(classify_blood_pressure(115.0, 75.0), Normal);
        assert_eq!(classify_blood_pressure(125.0, 75.0), Elevated);
        assert_eq!(classify_blood_pressure(125.0, 85.0), Hypertension1);
        assert_eq!(classify_blood_pressure(135.0, 70.0), Hypertension1);
        assert_eq!(classify_blood_pressure(150.0, 55.0), Hypertension2);
        assert_eq!(classify_blood_pressure(120.0, 95.0), Hypertension2);
        assert_eq!(classify_blood_pressure(185.0, 125.0), HypertensiveCrisis);
        assert_eq!(classify_blood_pressure(130.0, 121.0), HypertensiveCrisis);
    }

    #[test]
    fn test_only_crisis_is_emergency() {
        for category in BloodPressureCategory::ALL {
            assert_eq!(
                category.is_emergency(),
                category == BloodPressureCategory::HypertensiveCrisis
            );
            assert!(!category.info().recommendations.is_empty());
        }
    }

    proptest! {
        #[test]
        fn prop_exactly_one_band(value in 0.0f64..1.0e6) {
            for table in ALL_TABLES {
                let hits = table.iter().filter(|b| b.contains(value)).count();
                prop_assert_eq!(hits, 1);
            }
        }

        #[test]
        fn prop_body_fat_classified_for_both_genders(value in 0.0f64..100.0) {
            prop_assert!(classify_body_fat(Gender::Male, value).is_some());
            prop_assert!(classify_body_fat(Gender::Female, value).is_some());
        }
    }
}
