//! Formula engine
//!
//! Pure numeric functions over metric inputs. Each function documents its
//! domain; functions that can leave it return [`ComputeError::ComputationFailure`]
//! instead of a NaN or a meaningless number.
//!
//! [`ComputeError::ComputationFailure`]: crate::error::ComputeError::ComputationFailure

pub mod blood_pressure;
pub mod bmi;
pub mod body_fat;
pub mod heart_rate;
pub mod hydration;
pub mod ideal_weight;
pub mod mental_health;
pub mod metabolic;
pub mod sleep;

use crate::error::ComputeError;

/// Reject NaN and infinite intermediate results
pub(crate) fn finite(value: f64, what: &str) -> Result<f64, ComputeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputeError::ComputationFailure(format!(
            "{what} is not a finite number"
        )))
    }
}

/// Round to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
