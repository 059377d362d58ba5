//! Records to departments, workers and tasks

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{debug, info};
use weekload_core::{Department, Roster, Task, Worker};

use crate::{IngestError, RawRecord};

static NON_TASK_KEY: OnceLock<Regex> = OnceLock::new();

fn non_task_key() -> &'static Regex {
    NON_TASK_KEY
        .get_or_init(|| Regex::new(r"^(?:\w\.\w+|JIRAUSER\d+)").expect("NON_TASK_KEY is valid"))
}

/// True when `key` is a tracker task key and not a username
/// (`j.doe`, `JIRAUSER10200`)
pub fn is_task_key(key: &str) -> bool {
    !non_task_key().is_match(key)
}

/// Why a record did not become a task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotATaskKey,
    MissingDates,
    OutsideYear,
    MissingEstimate,
    MissingAssignee,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::NotATaskKey => "key is not a task key",
            Self::MissingDates => "start or end date missing",
            Self::OutsideYear => "dates outside the report year",
            Self::MissingEstimate => "no estimate",
            Self::MissingAssignee => "no assignee",
        };
        f.write_str(reason)
    }
}

/// Fields of a record that passed every filter
struct Accepted<'r> {
    key: &'r str,
    assignee: &'r str,
    start: NaiveDate,
    end: NaiveDate,
    hours: u32,
}

fn accept(record: &RawRecord, year: i32) -> Result<Accepted<'_>, SkipReason> {
    let key = record.key.as_deref().ok_or(SkipReason::NotATaskKey)?;
    if !is_task_key(key) {
        return Err(SkipReason::NotATaskKey);
    }
    let (Some(start), Some(end)) = (record.start_date, record.end_date) else {
        return Err(SkipReason::MissingDates);
    };
    if start.year() != year || end.year() != year {
        return Err(SkipReason::OutsideYear);
    }
    let hours = record
        .estimate_hours
        .filter(|h| *h > 0)
        .ok_or(SkipReason::MissingEstimate)?;
    let assignee = record
        .assignee
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(SkipReason::MissingAssignee)?;
    Ok(Accepted {
        key,
        assignee,
        start,
        end,
        hours,
    })
}

/// Worker under construction with the department it belongs to
struct Placement {
    department: usize,
    worker: Worker,
}

/// Build departments, workers and tasks from the records of an export.
///
/// Records are processed in order:
/// - a record without a key opens the department named by its summary
/// - a record without a status makes its key the username of workers
///   created afterwards
/// - a record becomes a task when it has a task key, start and end dates in
///   `year`, a non-zero estimate and an assignee; anything else is skipped
///
/// A task is created once per key. Workers are identified by trimmed assignee
/// name and join the department they were first seen under. Departments that
/// end up without workers are dropped.
pub fn build_roster(records: &[RawRecord], year: i32) -> Result<Roster, IngestError> {
    let mut departments: Vec<Department> = Vec::new();
    let mut department_index: HashMap<String, usize> = HashMap::new();
    let mut placements: Vec<Placement> = Vec::new();
    let mut worker_index: HashMap<String, usize> = HashMap::new();
    let mut tasks: Vec<Arc<Task>> = Vec::new();
    let mut task_index: HashMap<String, usize> = HashMap::new();

    let mut current_department: Option<usize> = None;
    let mut current_username: Option<String> = None;
    let mut skipped = 0usize;

    for record in records {
        if record.is_department_marker() {
            let Some(name) = record.summary.as_deref().map(str::trim).filter(|s| !s.is_empty())
            else {
                debug!(row = record.row, "blank record skipped");
                continue;
            };
            let index = *department_index.entry(name.to_string()).or_insert_with(|| {
                info!(department = name, "department created");
                departments.push(Department::new(name));
                departments.len() - 1
            });
            current_department = Some(index);
            continue;
        }

        if record.status.is_none() {
            current_username = record.key.clone();
        }

        let accepted = match accept(record, year) {
            Ok(accepted) => accepted,
            Err(reason) => {
                debug!(row = record.row, key = ?record.key, %reason, "record skipped");
                skipped += 1;
                continue;
            }
        };
        let department =
            current_department.ok_or(IngestError::MissingDepartment { row: record.row })?;

        let task_slot = match task_index.get(accepted.key) {
            Some(slot) => *slot,
            None => {
                let name = record.summary.as_deref().map_or("", str::trim);
                let mut task = Task::new(accepted.key, name, accepted.start, accepted.end)?
                    .estimate(accepted.hours);
                if let Some(status) = &record.status {
                    task = task.status(status.as_str());
                }
                if let Some(priority) = &record.priority {
                    task = task.priority(priority.as_str());
                }
                debug!(task = %task, row = record.row, "task created");
                tasks.push(Arc::new(task));
                task_index.insert(accepted.key.to_string(), tasks.len() - 1);
                tasks.len() - 1
            }
        };

        let worker_slot = match worker_index.get(accepted.assignee) {
            Some(slot) => *slot,
            None => {
                let username = current_username.as_deref().unwrap_or(accepted.assignee);
                placements.push(Placement {
                    department,
                    worker: Worker::new(accepted.assignee, username),
                });
                worker_index.insert(accepted.assignee.to_string(), placements.len() - 1);
                placements.len() - 1
            }
        };

        let placement = &mut placements[worker_slot];
        if placement.department != department {
            debug!(
                worker = %placement.worker,
                department = departments[department].name(),
                "worker already belongs to {}",
                departments[placement.department].name()
            );
        }
        placement.worker.add_task(Arc::clone(&tasks[task_slot]));
    }

    for placement in placements {
        departments[placement.department].add_worker(placement.worker);
    }
    departments.retain(|d| !d.workers().is_empty());

    let roster = Roster { departments, tasks };
    info!(
        year,
        departments = roster.departments.len(),
        workers = roster.worker_count(),
        tasks = roster.tasks.len(),
        skipped,
        "roster built"
    );
    Ok(roster)
}
