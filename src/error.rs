//! Error types for healthcalc

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Message shown when a formula produces a non-finite or implausible value
pub const COMPUTATION_FAILURE_MESSAGE: &str =
    "Could not calculate a valid result; check your measurements";

/// Errors that can occur during a calculation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Could not calculate a valid result; check your measurements ({0})")]
    ComputationFailure(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComputeError {
    /// Shorthand for a failure of a single field
    pub fn field(error: FieldError) -> Self {
        ComputeError::Validation(ValidationErrors(vec![error]))
    }

    /// Field errors carried by a validation failure, empty for every other kind
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ComputeError::Validation(errors) => &errors.0,
            _ => &[],
        }
    }
}

impl From<ValidationErrors> for ComputeError {
    fn from(errors: ValidationErrors) -> Self {
        ComputeError::Validation(errors)
    }
}

/// What went wrong with a single input field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Value outside the documented range for the active method and units
    OutOfRange { min: f64, max: f64, unit: String },
    /// A relationship between two fields does not hold (e.g. waist <= neck)
    CrossField,
    /// A field required by the method/gender combination was not supplied
    Missing,
    /// Raw text could not be parsed as a number
    NotANumber,
    /// Parsed value is NaN or infinite
    NotFinite,
}

/// A human-readable failure for one input field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn out_of_range(field: &str, label: &str, min: f64, max: f64, unit: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::OutOfRange {
                min,
                max,
                unit: unit.to_string(),
            },
            message: format!("{label} must be between {min} and {max} {unit}"),
        }
    }

    pub fn cross_field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::CrossField,
            message: message.into(),
        }
    }

    pub fn missing(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::Missing,
            message: format!("{label} is required for this calculation"),
        }
    }

    pub fn not_a_number(field: &str, raw: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::NotANumber,
            message: format!("'{raw}' is not a number"),
        }
    }

    pub fn not_finite(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::NotFinite,
            message: "Value must be a finite number".to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field failure found for one input
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First error reported for `field`
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), ComputeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ComputeError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}
