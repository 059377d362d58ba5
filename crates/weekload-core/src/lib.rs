//! # weekload-core
//!
//! Core domain model for the weekload workload report engine.
//!
//! This crate provides:
//! - Domain types: `Task`, `Worker`, `Department`, `Roster`
//! - Calendar weeks of a year (`calendar`)
//! - Workload distribution of task estimates over weeks, and its aggregation
//! - Layout description consumed by renderers (`layout`)
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//! use weekload_core::{Task, Worker};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap();
//! let task = Task::new("PRJ-1", "Design", start, end).unwrap().estimate(40);
//!
//! let mut worker = Worker::new("Alice", "alice");
//! worker.add_task(Arc::new(task));
//!
//! let summary = worker.workload_summary(2025).unwrap();
//! assert_eq!(summary[1], 0.5);
//! assert_eq!(summary[2], 0.5);
//! ```

pub mod calendar;
pub mod layout;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub use calendar::{is_supported_year, weeks_for_year, CalendarWeeks, Week};
pub use layout::Layout;

// ============================================================================
// Constants
// ============================================================================

/// Working hours in a working day
pub const WORK_HOURS_PER_DAY: u32 = 8;

/// Working days in a working week
pub const WORK_DAYS_PER_WEEK: u32 = 5;

/// Hours of one full worker-week
pub const HOURS_PER_WEEK: u32 = WORK_DAYS_PER_WEEK * WORK_HOURS_PER_DAY;

/// Round a workload fraction to 4 decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ============================================================================
// Task
// ============================================================================

/// A tracked unit of work with a date range and an hour estimate.
///
/// Identity is the task key: two tasks with the same key are equal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    key: String,
    name: String,
    date_start: NaiveDate,
    date_end: NaiveDate,
    priority: Option<String>,
    status: Option<String>,
    estimate: Option<u32>,
}

impl Task {
    /// Create a task; fails when `date_end` precedes `date_start`
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        date_start: NaiveDate,
        date_end: NaiveDate,
    ) -> Result<Self, DomainError> {
        let key = key.into();
        if date_end < date_start {
            return Err(DomainError::InvalidDateRange {
                key,
                start: date_start,
                end: date_end,
            });
        }
        Ok(Self {
            key,
            name: name.into(),
            date_start,
            date_end,
            priority: None,
            status: None,
            estimate: None,
        })
    }

    /// Set the priority label
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Set the status label
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the estimate in hours
    pub fn estimate(mut self, hours: u32) -> Self {
        self.estimate = Some(hours);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date_start(&self) -> NaiveDate {
        self.date_start
    }

    pub fn date_end(&self) -> NaiveDate {
        self.date_end
    }

    pub fn priority_label(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    pub fn status_label(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn estimate_hours(&self) -> Option<u32> {
        self.estimate
    }

    /// Number of weeks the estimate is spread over, counted from the Monday
    /// of the start week and rounded up on a partial week (at least one)
    pub fn weeks_spanned(&self) -> usize {
        let monday = calendar::monday_of(self.date_start);
        let days = (self.date_end - monday).num_days().max(0) as usize;
        days.div_ceil(7).max(1)
    }

    /// Fraction of a full work-week consumed in each week the task spans
    pub fn workload_per_week(&self) -> f64 {
        let hours = f64::from(self.estimate.unwrap_or(0));
        round4(hours / (f64::from(HOURS_PER_WEEK) * self.weeks_spanned() as f64))
    }

    /// Per-week workload of this task across `weeks`
    pub fn distribute(&self, weeks: &CalendarWeeks) -> Result<Vec<f64>, WorkloadError> {
        let monday = calendar::monday_of(self.date_start);
        let start = weeks
            .index_of(monday)
            .ok_or_else(|| WorkloadError::StartWeekOutsideYear {
                key: self.key.clone(),
                monday,
                year: weeks.year(),
            })?;
        let span = self.weeks_spanned();
        if start + span > weeks.len() {
            return Err(WorkloadError::SpanOutsideYear {
                key: self.key.clone(),
                year: weeks.year(),
            });
        }

        let per_week = self.workload_per_week();
        let mut workload = vec![0.0; weeks.len()];
        for slot in &mut workload[start..start + span] {
            *slot = per_week;
        }
        Ok(workload)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task[{}]", self.key)
    }
}

// ============================================================================
// Worker
// ============================================================================

/// Weekly workload of one task
#[derive(Clone, Debug, PartialEq)]
pub struct TaskWorkload {
    pub task: Arc<Task>,
    pub weeks: Vec<f64>,
}

/// A person with assigned tasks. Identity is the username.
#[derive(Clone, Debug)]
pub struct Worker {
    name: String,
    username: String,
    tasks: Vec<Arc<Task>>,
}

impl Worker {
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        let worker = Self {
            name: name.into(),
            username: username.into(),
            tasks: Vec::new(),
        };
        info!(name = %worker.name, username = %worker.username, "worker created");
        worker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Assigned tasks in insertion order
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Assign a task; returns false when a task with the same key is already assigned
    pub fn add_task(&mut self, task: Arc<Task>) -> bool {
        if self.tasks.iter().any(|t| t.key() == task.key()) {
            return false;
        }
        info!("{} was added to {}", task, self);
        self.tasks.push(task);
        true
    }

    /// Workload of every assigned task for `year`, one entry per week
    pub fn workload_by_task(&self, year: i32) -> Result<Vec<TaskWorkload>, WorkloadError> {
        self.workload_by_task_in(&CalendarWeeks::for_year(year))
    }

    /// Same as [`Worker::workload_by_task`] over an already computed week list
    pub fn workload_by_task_in(
        &self,
        weeks: &CalendarWeeks,
    ) -> Result<Vec<TaskWorkload>, WorkloadError> {
        let result = self
            .tasks
            .iter()
            .map(|task| {
                Ok(TaskWorkload {
                    task: Arc::clone(task),
                    weeks: task.distribute(weeks)?,
                })
            })
            .collect::<Result<Vec<_>, WorkloadError>>()?;
        debug!(worker = %self, tasks = result.len(), "workload by tasks computed");
        Ok(result)
    }

    /// Sum of all task workloads per week for `year`
    pub fn workload_summary(&self, year: i32) -> Result<Vec<f64>, WorkloadError> {
        self.workload_summary_in(&CalendarWeeks::for_year(year))
    }

    /// Same as [`Worker::workload_summary`] over an already computed week list
    pub fn workload_summary_in(&self, weeks: &CalendarWeeks) -> Result<Vec<f64>, WorkloadError> {
        let by_task = self.workload_by_task_in(weeks)?;
        let summary = (0..weeks.len())
            .map(|i| round4(by_task.iter().map(|tw| tw.weeks[i]).sum()))
            .collect::<Vec<_>>();
        debug!(worker = %self, ?summary, "workload summary computed");
        Ok(summary)
    }
}

impl std::fmt::Display for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Worker[{}]", self.name)
    }
}

// ============================================================================
// Department
// ============================================================================

/// An organisational unit owning its workers. Identity is the name.
#[derive(Clone, Debug)]
pub struct Department {
    name: String,
    workers: Vec<Worker>,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn add_worker(&mut self, worker: Worker) {
        self.workers.push(worker);
    }

    /// True when at least one worker has at least one task
    pub fn has_tasks(&self) -> bool {
        self.workers.iter().any(Worker::has_tasks)
    }

    /// Mean of the workers' weekly summaries for `year`; `None` without workers
    pub fn workload(&self, year: i32) -> Result<Option<Vec<f64>>, WorkloadError> {
        self.workload_in(&CalendarWeeks::for_year(year))
    }

    /// Same as [`Department::workload`] over an already computed week list
    pub fn workload_in(&self, weeks: &CalendarWeeks) -> Result<Option<Vec<f64>>, WorkloadError> {
        if self.workers.is_empty() {
            return Ok(None);
        }
        let summaries = self
            .workers
            .par_iter()
            .map(|w| w.workload_summary_in(weeks))
            .collect::<Result<Vec<_>, WorkloadError>>()?;

        let count = summaries.len() as f64;
        let mean = (0..weeks.len())
            .map(|i| round4(summaries.iter().map(|s| s[i]).sum::<f64>() / count))
            .collect();
        Ok(Some(mean))
    }
}

// ============================================================================
// Roster
// ============================================================================

/// Everything ingestion produced: departments owning workers, and the
/// registry of unique tasks.
///
/// Usernames and department names are expected to be unique; they are the
/// only identity the report uses.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub departments: Vec<Department>,
    pub tasks: Vec<Arc<Task>>,
}

impl Roster {
    pub fn worker_count(&self) -> usize {
        self.departments.iter().map(|d| d.workers().len()).sum()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering of a report layout
pub trait Renderer {
    type Output;

    /// Render a layout to the output format
    fn render(&self, layout: &Layout) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid domain value
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Task {key} ends before it starts ({start} > {end})")]
    InvalidDateRange {
        key: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Task dates that do not fit the week grid of the report year
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Task {key} starts in the week of {monday}, which is not part of {year}")]
    StartWeekOutsideYear {
        key: String,
        monday: NaiveDate,
        year: i32,
    },

    #[error("Task {key} runs past the last week of {year}")]
    SpanOutsideYear { key: String, year: i32 },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
