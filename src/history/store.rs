//! Reading persistence
//!
//! The whole history is one JSON array stored under a single key. Loading never
//! fails: unreadable or malformed data is discarded with a warning and the
//! history starts empty.

use super::types::BpReading;
use crate::error::ComputeError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Key the reading list is stored under
pub const STORAGE_KEY: &str = "bloodPressureReadings";

/// Storage for the reading list
pub trait ReadingRepository {
    /// Load every stored reading, newest first
    fn load(&self) -> Vec<BpReading>;

    /// Replace the stored list with `readings`
    fn save(&self, readings: &[BpReading]) -> Result<(), ComputeError>;
}

/// In-memory repository. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    readings: Arc<Mutex<Vec<BpReading>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `readings`
    pub fn with_readings(readings: Vec<BpReading>) -> Self {
        Self {
            readings: Arc::new(Mutex::new(readings)),
        }
    }
}

impl ReadingRepository for InMemoryRepository {
    fn load(&self) -> Vec<BpReading> {
        match self.readings.lock() {
            Ok(store) => store.clone(),
            Err(e) => {
                warn!(error = %e, "reading store lock poisoned, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, readings: &[BpReading]) -> Result<(), ComputeError> {
        let mut store = self
            .readings
            .lock()
            .map_err(|e| ComputeError::Persistence(e.to_string()))?;
        *store = readings.to_vec();
        Ok(())
    }
}

/// JSON file repository
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/bloodPressureReadings.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReadingRepository for JsonFileRepository {
    fn load(&self) -> Vec<BpReading> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no reading history yet");
            return Vec::new();
        }

        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read reading history, starting empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<BpReading>>(&json) {
            Ok(readings) => {
                debug!(
                    path = %self.path.display(),
                    count = readings.len(),
                    "loaded reading history"
                );
                readings
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding malformed reading history"
                );
                Vec::new()
            }
        }
    }

    fn save(&self, readings: &[BpReading]) -> Result<(), ComputeError> {
        let json = serde_json::to_string_pretty(readings)?;
        std::fs::write(&self.path, json).map_err(|e| {
            ComputeError::Persistence(format!("{}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), count = readings.len(), "saved reading history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::types::NewReading;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn reading(systolic: f64) -> BpReading {
        BpReading::from_new(NewReading {
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            time: NaiveTime::from_hms_opt(21, 15, 0).unwrap(),
            systolic,
            diastolic: 75.0,
            pulse: Some(64.0),
            notes: Some("after dinner".to_string()),
        })
    }

    #[test]
    fn test_in_memory_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.load().is_empty());

        let readings = vec![reading(118.0), reading(124.0)];
        repo.save(&readings).unwrap();
        assert_eq!(repo.load(), readings);
    }

    #[test]
    fn test_in_memory_clones_share_state() {
        let repo = InMemoryRepository::new();
        let other = repo.clone();
        repo.save(&[reading(118.0)]).unwrap();
        assert_eq!(other.load().len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path());
        assert!(repo.path().ends_with("bloodPressureReadings.json"));
        assert!(repo.load().is_empty());

        let readings = vec![reading(118.0), reading(124.0)];
        repo.save(&readings).unwrap();
        assert_eq!(JsonFileRepository::in_dir(dir.path()).load(), readings);
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path());
        std::fs::write(repo.path(), "{not json").unwrap();
        assert!(repo.load().is_empty());

        std::fs::write(repo.path(), r#"[{"id": "nope"}]"#).unwrap();
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_reads_stored_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::in_dir(dir.path());
        std::fs::write(
            repo.path(),
            r#"[{"id": "7d5c3c9a-3f0e-4d5e-9b1a-2f7a1c2b3d4e", "date": "2024-01-02",
                 "time": "07:45", "systolic": 128, "diastolic": 82}]"#,
        )
        .unwrap();

        let readings = repo.load();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].time, NaiveTime::from_hms_opt(7, 45, 0).unwrap());
        assert_eq!(readings[0].pulse, None);
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("missing").join("history.json"));
        let err = repo.save(&[reading(120.0)]).unwrap_err();
        assert!(matches!(err, ComputeError::Persistence(_)));
    }
}
