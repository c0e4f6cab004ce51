//! Blood-pressure tracker
//!
//! Owns the in-memory reading list and writes every change through to the
//! repository. A failed save leaves both the list and the store unchanged.

use super::export;
use super::store::ReadingRepository;
use super::types::{BpReading, BpSummary, NewReading, SortKey, SortOrder};
use crate::error::ComputeError;
use crate::validation;
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::{debug, info};
use uuid::Uuid;

/// Stateful reading history backed by a repository
pub struct BpTracker<R: ReadingRepository> {
    repository: R,
    readings: Vec<BpReading>,
}

impl<R: ReadingRepository> BpTracker<R> {
    /// Load the stored history once
    pub fn open(repository: R) -> Self {
        let readings = repository.load();
        debug!(count = readings.len(), "opened reading history");
        Self {
            repository,
            readings,
        }
    }

    /// Validate and save a new reading at the front of the list
    pub fn add(&mut self, new: NewReading) -> Result<BpReading, ComputeError> {
        validation::validate_blood_pressure(&new.input())?;

        let reading = BpReading::from_new(new);
        let previous = self.readings.clone();
        self.readings.insert(0, reading.clone());
        self.commit(previous)?;

        info!(id = %reading.id, category = reading.category().label(), "saved reading");
        Ok(reading)
    }

    /// Delete a reading by id; `false` if no reading had that id
    pub fn remove(&mut self, id: Uuid) -> Result<bool, ComputeError> {
        let Some(index) = self.readings.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        let previous = self.readings.clone();
        self.readings.remove(index);
        self.commit(previous)?;

        info!(%id, "removed reading");
        Ok(true)
    }

    /// Delete every reading
    pub fn clear(&mut self) -> Result<(), ComputeError> {
        let previous = std::mem::take(&mut self.readings);
        self.commit(previous)?;
        info!("cleared reading history");
        Ok(())
    }

    /// Readings in insertion order, newest first
    pub fn readings(&self) -> &[BpReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&BpReading> {
        self.readings.iter().find(|r| r.id == id)
    }

    /// Readings sorted by `key`. Readings without a pulse sort last under
    /// [`SortKey::Pulse`] in either order; ties keep insertion order.
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<BpReading> {
        let mut sorted = self.readings.clone();
        sorted.sort_by(|a, b| compare(a, b, key, order));
        sorted
    }

    /// Readings as displayed: newest-first by insertion unless a sort key is given
    pub fn list(&self, sort: Option<SortKey>, order: SortOrder) -> Vec<BpReading> {
        match sort {
            Some(key) => self.sorted(key, order),
            None => self.readings.clone(),
        }
    }

    pub fn summary(&self) -> Option<BpSummary> {
        BpSummary::from_readings(&self.readings)
    }

    /// CSV of all readings, newest first
    pub fn export_csv(&self) -> Result<String, ComputeError> {
        export::to_csv(&self.readings)
    }

    /// Download name for an export made on `date`
    pub fn export_filename(date: NaiveDate) -> String {
        export::export_filename(date)
    }

    fn commit(&mut self, previous: Vec<BpReading>) -> Result<(), ComputeError> {
        if let Err(e) = self.repository.save(&self.readings) {
            self.readings = previous;
            return Err(e);
        }
        Ok(())
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

fn compare(a: &BpReading, b: &BpReading, key: SortKey, order: SortOrder) -> Ordering {
    match key {
        SortKey::Date => directed((a.date, a.time).cmp(&(b.date, b.time)), order),
        SortKey::Systolic => directed(a.systolic.total_cmp(&b.systolic), order),
        SortKey::Diastolic => directed(a.diastolic.total_cmp(&b.diastolic), order),
        SortKey::Pulse => match (a.pulse, b.pulse) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y), order),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::store::InMemoryRepository;
    use crate::types::BloodPressureCategory;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn new_reading(day: u32, systolic: f64, diastolic: f64, pulse: Option<f64>) -> NewReading {
        NewReading {
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            systolic,
            diastolic,
            pulse,
            notes: None,
        }
    }

    /// Repository whose saves always fail
    struct ReadOnly;

    impl ReadingRepository for ReadOnly {
        fn load(&self) -> Vec<BpReading> {
            Vec::new()
        }

        fn save(&self, _: &[BpReading]) -> Result<(), ComputeError> {
            Err(ComputeError::Persistence("read-only".to_string()))
        }
    }

    #[test]
    fn test_add_prepends_and_writes_through() {
        let repo = InMemoryRepository::new();
        let mut tracker = BpTracker::open(repo.clone());

        let first = tracker.add(new_reading(1, 120.0, 80.0, None)).unwrap();
        let second = tracker.add(new_reading(2, 130.0, 85.0, Some(70.0))).unwrap();

        let ids: Vec<Uuid> = tracker.readings().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(repo.load(), tracker.readings().to_vec());
    }

    #[test]
    fn test_add_rejects_invalid_reading() {
        let mut tracker = BpTracker::open(InMemoryRepository::new());
        let err = tracker.add(new_reading(1, 80.0, 90.0, None)).unwrap_err();
        assert!(matches!(err, ComputeError::Validation(_)));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut tracker = BpTracker::open(InMemoryRepository::new());
        let kept = tracker.add(new_reading(1, 120.0, 80.0, None)).unwrap();
        let gone = tracker.add(new_reading(2, 125.0, 82.0, None)).unwrap();

        assert!(tracker.remove(gone.id).unwrap());
        assert!(!tracker.remove(gone.id).unwrap());
        assert_eq!(tracker.len(), 1);
        assert!(tracker.get(kept.id).is_some());
    }

    #[test]
    fn test_clear() {
        let repo = InMemoryRepository::new();
        let mut tracker = BpTracker::open(repo.clone());
        for day in 1..=3 {
            tracker.add(new_reading(day, 120.0, 80.0, None)).unwrap();
        }

        tracker.clear().unwrap();
        assert!(tracker.is_empty());
        assert!(repo.load().is_empty());
        assert_eq!(tracker.summary(), None);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut tracker = BpTracker::open(ReadOnly);
        let err = tracker.add(new_reading(1, 120.0, 80.0, None)).unwrap_err();
        assert!(matches!(err, ComputeError::Persistence(_)));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_open_reads_existing_history() {
        let mut seed = BpTracker::open(InMemoryRepository::new());
        seed.add(new_reading(1, 120.0, 80.0, None)).unwrap();
        let repo = InMemoryRepository::with_readings(seed.readings().to_vec());

        let tracker = BpTracker::open(repo);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_sorting() {
        let mut tracker = BpTracker::open(InMemoryRepository::new());
        tracker.add(new_reading(3, 140.0, 90.0, Some(80.0))).unwrap();
        tracker.add(new_reading(1, 120.0, 70.0, None)).unwrap();
        tracker.add(new_reading(2, 130.0, 95.0, Some(60.0))).unwrap();

        let days = |readings: Vec<BpReading>| -> Vec<u32> {
            use chrono::Datelike;
            readings.iter().map(|r| r.date.day()).collect()
        };

        assert_eq!(days(tracker.sorted(SortKey::Date, SortOrder::Ascending)), vec![1, 2, 3]);
        assert_eq!(days(tracker.sorted(SortKey::Date, SortOrder::Descending)), vec![3, 2, 1]);
        assert_eq!(days(tracker.sorted(SortKey::Systolic, SortOrder::Descending)), vec![3, 2, 1]);
        assert_eq!(days(tracker.sorted(SortKey::Diastolic, SortOrder::Ascending)), vec![1, 3, 2]);
        assert_eq!(days(tracker.sorted(SortKey::Pulse, SortOrder::Ascending)), vec![2, 3, 1]);
        assert_eq!(days(tracker.sorted(SortKey::Pulse, SortOrder::Descending)), vec![3, 2, 1]);
    }

    #[test]
    fn test_list_keeps_insertion_order_by_default() {
        let mut tracker = BpTracker::open(InMemoryRepository::new());
        tracker.add(new_reading(10, 120.0, 80.0, None)).unwrap();
        tracker.add(new_reading(12, 125.0, 82.0, None)).unwrap();
        // Backdated entry, added last
        tracker.add(new_reading(2, 118.0, 76.0, Some(64.0))).unwrap();

        let days = |readings: Vec<BpReading>| -> Vec<u32> {
            use chrono::Datelike;
            readings.iter().map(|r| r.date.day()).collect()
        };

        assert_eq!(days(tracker.list(None, SortOrder::Descending)), vec![2, 12, 10]);
        assert_eq!(days(tracker.list(None, SortOrder::Ascending)), vec![2, 12, 10]);
        assert_eq!(
            days(tracker.list(Some(SortKey::Date), SortOrder::Descending)),
            vec![12, 10, 2]
        );
    }

    #[test]
    fn test_summary_and_export() {
        let mut tracker = BpTracker::open(InMemoryRepository::new());
        tracker.add(new_reading(1, 185.0, 125.0, None)).unwrap();

        let summary = tracker.summary().unwrap();
        assert_eq!(summary.category, BloodPressureCategory::HypertensiveCrisis);

        let csv = tracker.export_csv().unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("Hypertensive Crisis,145.0,60,"));
    }

    proptest! {
        #[test]
        fn prop_add_then_remove_restores_length(
            existing in 0usize..10,
            systolic in 100u16..200,
        ) {
            let mut tracker = BpTracker::open(InMemoryRepository::new());
            for _ in 0..existing {
                tracker.add(new_reading(1, 120.0, 80.0, None)).unwrap();
            }
            let before = tracker.len();

            let added = tracker.add(new_reading(2, f64::from(systolic), 70.0, None)).unwrap();
            prop_assert!(tracker.remove(added.id).unwrap());
            prop_assert_eq!(tracker.len(), before);
            prop_assert!(tracker.get(added.id).is_none());
        }
    }
}
