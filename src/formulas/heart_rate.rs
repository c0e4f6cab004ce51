//! Heart-rate zone arithmetic.
//!
//! Zone targets use the Karvonen (heart-rate reserve) method when resting heart
//! rate is known, and a plain percentage of max otherwise.

/// Zone definitions: (zone number, name, lower %, upper %)
pub const ZONES: [(u8, &str, f64, f64); 5] = [
    (1, "Recovery", 50.0, 60.0),
    (2, "Aerobic / Fat Burn", 60.0, 70.0),
    (3, "Tempo / Aerobic Endurance", 70.0, 80.0),
    (4, "Threshold", 80.0, 90.0),
    (5, "Maximum / Anaerobic", 90.0, 100.0),
];

/// Age-predicted maximum heart rate: 220 - age
pub fn estimated_max_hr(age: f64) -> f64 {
    220.0 - age
}

/// Target heart rate at `pct` percent intensity.
///
/// ```text
/// Karvonen: rest + pct × (max - rest)
/// Without resting HR: pct × max
/// ```
pub fn target_hr(max_hr: f64, resting_hr: Option<f64>, pct: f64) -> f64 {
    let fraction = pct / 100.0;
    match resting_hr {
        Some(rest) => rest + fraction * (max_hr - rest),
        None => fraction * max_hr,
    }
}

/// Uth-Sorensen VO2max estimate (ml/kg/min): 15.3 × max / rest
pub fn vo2max_uth(max_hr: f64, resting_hr: f64) -> Option<f64> {
    if resting_hr > 0.0 {
        Some(15.3 * max_hr / resting_hr)
    } else {
        None
    }
}
