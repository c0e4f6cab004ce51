//! Blood-pressure reading history
//!
//! The one stateful feature: a newest-first list of saved readings, persisted
//! write-through behind the [`ReadingRepository`] trait, with sorting, summary
//! statistics and CSV export.

pub mod export;
pub mod store;
pub mod tracker;
pub mod types;

pub use export::{export_filename, to_csv, CSV_HEADER};
pub use store::{InMemoryRepository, JsonFileRepository, ReadingRepository, STORAGE_KEY};
pub use tracker::BpTracker;
pub use types::{BpReading, BpSummary, NewReading, SortKey, SortOrder};
