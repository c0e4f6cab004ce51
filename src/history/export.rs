//! CSV export of the reading history

use super::types::BpReading;
use crate::error::ComputeError;
use chrono::NaiveDate;
use csv::{Terminator, WriterBuilder};
use std::io;

pub const CSV_HEADER: &str = "Date,Time,Systolic (mmHg),Diastolic (mmHg),Pulse (bpm),Category,MAP (mmHg),Pulse Pressure (mmHg),Notes";

/// Notes with commas turned into semicolons and line breaks into spaces
pub fn sanitize_notes(notes: &str) -> String {
    notes
        .chars()
        .map(|c| match c {
            ',' => ';',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

fn record(reading: &BpReading) -> [String; 9] {
    [
        reading.date.format("%Y-%m-%d").to_string(),
        reading.time.format("%H:%M").to_string(),
        reading.systolic.to_string(),
        reading.diastolic.to_string(),
        reading.pulse.map(|p| p.to_string()).unwrap_or_default(),
        reading.category().label().to_string(),
        format!("{:.1}", reading.mean_arterial_pressure()),
        reading.pulse_pressure().to_string(),
        reading.notes.as_deref().map(sanitize_notes).unwrap_or_default(),
    ]
}

/// Header plus one row per reading, in list order
pub fn to_csv(readings: &[BpReading]) -> Result<String, ComputeError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER.split(','))?;
    for reading in readings {
        writer.write_record(record(reading))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(io::Error::new(e.error().kind(), e.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|e| ComputeError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// `blood-pressure-data-YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("blood-pressure-data-{}.csv", date.format("%Y-%m-%d"))
}
