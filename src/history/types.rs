//! Reading history types

use crate::classifier;
use crate::formulas::blood_pressure;
use crate::types::{BloodPressureCategory, BloodPressureInput};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reading time as `"HH:MM"`
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// One saved blood-pressure reading. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpReading {
    pub id: Uuid,
    /// Calendar date, `YYYY-MM-DD`
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub systolic: f64,
    pub diastolic: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BpReading {
    pub fn from_new(new: NewReading) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: new.date,
            time: new.time,
            systolic: new.systolic,
            diastolic: new.diastolic,
            pulse: new.pulse,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn category(&self) -> BloodPressureCategory {
        classifier::classify_blood_pressure(self.systolic, self.diastolic)
    }

    pub fn mean_arterial_pressure(&self) -> f64 {
        blood_pressure::mean_arterial_pressure(self.systolic, self.diastolic)
    }

    pub fn pulse_pressure(&self) -> f64 {
        blood_pressure::pulse_pressure(self.systolic, self.diastolic)
    }
}

/// A reading as entered, before it gets an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub systolic: f64,
    pub diastolic: f64,
    #[serde(default)]
    pub pulse: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewReading {
    pub fn input(&self) -> BloodPressureInput {
        BloodPressureInput {
            systolic: self.systolic,
            diastolic: self.diastolic,
            pulse: self.pulse,
        }
    }
}

/// Column a reading list can be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Date, then time of day
    #[default]
    Date,
    Systolic,
    Diastolic,
    Pulse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Averages and extremes over all saved readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpSummary {
    pub count: usize,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    /// Mean over readings that recorded a pulse
    pub avg_pulse: Option<f64>,
    pub min_systolic: f64,
    pub max_systolic: f64,
    pub min_diastolic: f64,
    pub max_diastolic: f64,
    /// Category of the averaged reading
    pub category: BloodPressureCategory,
}

impl BpSummary {
    /// Summarize `readings`; `None` when there are none
    pub fn from_readings(readings: &[BpReading]) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }

        let count = readings.len();
        let n = count as f64;
        let avg_systolic = readings.iter().map(|r| r.systolic).sum::<f64>() / n;
        let avg_diastolic = readings.iter().map(|r| r.diastolic).sum::<f64>() / n;

        let pulses: Vec<f64> = readings.iter().filter_map(|r| r.pulse).collect();
        let avg_pulse = if pulses.is_empty() {
            None
        } else {
            Some(pulses.iter().sum::<f64>() / pulses.len() as f64)
        };

        let fold = |pick: fn(&BpReading) -> f64| {
            readings.iter().map(pick).fold((f64::MAX, f64::MIN), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
        };
        let (min_systolic, max_systolic) = fold(|r| r.systolic);
        let (min_diastolic, max_diastolic) = fold(|r| r.diastolic);

        Some(Self {
            count,
            avg_systolic,
            avg_diastolic,
            avg_pulse,
            min_systolic,
            max_systolic,
            min_diastolic,
            max_diastolic,
            category: classifier::classify_blood_pressure(avg_systolic, avg_diastolic),
        })
    }
}
