//! Derived blood-pressure metrics

/// Mean arterial pressure: diastolic + (systolic - diastolic) / 3
pub fn mean_arterial_pressure(systolic: f64, diastolic: f64) -> f64 {
    diastolic + (systolic - diastolic) / 3.0
}

/// Pulse pressure: systolic - diastolic
pub fn pulse_pressure(systolic: f64, diastolic: f64) -> f64 {
    systolic - diastolic
}
