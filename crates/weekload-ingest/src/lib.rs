//! # weekload-ingest
//!
//! Reader for tracker exports (.xlsx) and conversion of the exported records
//! into a [`Roster`](weekload_core::Roster).
//!
//! This crate provides:
//! - [`read_records`]: first worksheet of a workbook to [`RawRecord`]s
//! - [`build_roster`]: records to departments, workers and tasks
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use weekload_ingest::{build_roster, RawRecord};
//!
//! let records = vec![
//!     RawRecord {
//!         summary: Some("Eng".into()),
//!         ..RawRecord::default()
//!     },
//!     RawRecord {
//!         key: Some("PRJ-1".into()),
//!         summary: Some("Design".into()),
//!         status: Some("Open".into()),
//!         assignee: Some("Alice".into()),
//!         start_date: NaiveDate::from_ymd_opt(2025, 1, 6),
//!         end_date: NaiveDate::from_ymd_opt(2025, 1, 12),
//!         estimate_hours: Some(40),
//!         ..RawRecord::default()
//!     },
//! ];
//!
//! let roster = build_roster(&records, 2025).unwrap();
//! assert_eq!(roster.departments.len(), 1);
//! assert_eq!(roster.tasks.len(), 1);
//! ```

pub mod roster;
pub mod xlsx;

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use weekload_core::DomainError;

pub use roster::{build_roster, is_task_key, SkipReason};
pub use xlsx::{read_records, Column};

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Cannot read workbook {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Workbook {0} has no data")]
    EmptyWorkbook(PathBuf),

    #[error("Missing column \"{0}\" in header row")]
    MissingColumn(&'static str),

    #[error("Task at row {row} is not preceded by a department row")]
    MissingDepartment { row: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One data row of the export, cells already converted.
///
/// Text fields are `None` when the cell is empty or blank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based sheet row, 0 when the record was not read from a sheet
    pub row: usize,
    pub key: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Original estimate in whole hours
    pub estimate_hours: Option<u32>,
    pub priority: Option<String>,
}

impl RawRecord {
    /// True when the record opens a new department
    pub fn is_department_marker(&self) -> bool {
        self.key.is_none()
    }
}
