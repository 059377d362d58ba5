//! # weekload-report
//!
//! Report layout engine: turns departments, workers and tasks into a
//! [`Layout`] ready for rendering.
//!
//! The layout is a grid with three header rows (column titles, month bands,
//! week numbers) followed by department, worker and task rows. Along with the
//! values it carries the merge regions, conditional styling of workload cells
//! and the border regions.
//!
//! ## Example
//!
//! ```rust
//! use weekload_core::Department;
//! use weekload_report::ReportModel;
//!
//! let departments = vec![Department::new("Eng")];
//! let layout = ReportModel::new(&departments).generate_data(2025).unwrap();
//! // Only the header rows: no department has tasks
//! assert_eq!(layout.rows.len(), 3);
//! ```

pub mod months;

use thiserror::Error;
use tracing::{debug, info};
use weekload_core::layout::{
    Alignment, BorderFill, BorderRegion, BorderWeight, CellRange, CellValue, Font, MergeRegion,
    NamedStyle, StyleProperty, StyleRegion, StyleSheet,
};
use weekload_core::{CalendarWeeks, Department, Layout, WorkloadError};

pub use months::{month_spans, MonthSpan, MONTH_NAMES};

/// Titles of the fixed columns left of the timeline
pub const BASE_HEADERS: [&str; 3] = ["Worker", "Task name", "Task key"];

/// Title spanning all week columns
pub const TIMELINE_HEADER: &str = "Timeline";

/// Number of header rows above the data
pub const HEADER_ROWS: u32 = 3;

/// Number format applied to workload cells
pub const PERCENT_FORMAT: &str = "0.00%";

const FIXED_COLS: u32 = BASE_HEADERS.len() as u32;

/// Report layout error
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No calendar weeks for year {0}")]
    NoWeeks(i32),

    #[error(transparent)]
    Workload(#[from] WorkloadError),
}

/// Builds the report layout from the ingested departments
#[derive(Clone, Debug)]
pub struct ReportModel<'a> {
    departments: &'a [Department],
}

impl<'a> ReportModel<'a> {
    pub fn new(departments: &'a [Department]) -> Self {
        Self { departments }
    }

    /// Derive rows, merge regions and styles for `year`
    pub fn generate_data(&self, year: i32) -> Result<Layout, ReportError> {
        let weeks = CalendarWeeks::for_year(year);
        if weeks.is_empty() {
            return Err(ReportError::NoWeeks(year));
        }
        let spans = month_spans(&weeks);
        let last_col = FIXED_COLS + weeks.len() as u32;

        let mut rows = header_rows(&spans, weeks.len());
        let mut regions = Vec::new();
        let mut department_ranges = Vec::new();

        let mut departments: Vec<&Department> = self.departments.iter().collect();
        departments.sort_by(|a, b| a.name().cmp(b.name()));

        for department in departments {
            if !department.has_tasks() {
                debug!(department = department.name(), "skipping department without tasks");
                continue;
            }
            let Some(aggregate) = department.workload_in(&weeks)? else {
                continue;
            };

            rows.push(group_row(department.name(), &aggregate));
            let first_row = rows.len() as u32;
            regions.push(StyleRegion {
                range: CellRange::cell(first_row, 1),
                properties: vec![StyleProperty::Font(Font::bold())],
            });

            let mut workers: Vec<_> = department.workers().iter().collect();
            workers.sort_by(|a, b| a.username().cmp(b.username()));
            for worker in workers {
                rows.push(group_row(worker.name(), &worker.workload_summary_in(&weeks)?));
                for tw in worker.workload_by_task_in(&weeks)? {
                    let mut row = vec![
                        CellValue::text(worker.name()),
                        CellValue::text(tw.task.name()),
                        CellValue::text(tw.task.key()),
                    ];
                    row.extend(tw.weeks.into_iter().map(CellValue::Number));
                    rows.push(row);
                }
            }

            department_ranges.push(CellRange::new(first_row, 1, rows.len() as u32, last_col));
        }

        let merges = merge_regions(&rows, &spans, last_col);

        regions.push(StyleRegion {
            range: CellRange::new(1, 1, 1, FIXED_COLS + 1),
            properties: vec![StyleProperty::Font(Font::bold_sized(14.0))],
        });
        regions.push(StyleRegion {
            range: CellRange::new(2, FIXED_COLS + 1, 2, last_col),
            properties: vec![StyleProperty::Font(Font::bold_sized(12.0))],
        });
        regions.extend(workload_styles(&rows));

        let styles = StyleSheet {
            all: vec![StyleProperty::Alignment(Alignment::CENTER)],
            regions,
            borders: border_regions(rows.len() as u32, last_col, &department_ranges),
        };

        for row in &rows {
            debug!(?row, "data generated");
        }
        for merge in &merges {
            debug!(?merge, "merge region");
        }
        info!(
            year,
            rows = rows.len(),
            merges = merges.len(),
            style_regions = styles.regions.len(),
            "report layout generated"
        );

        Ok(Layout {
            rows,
            merges,
            styles,
        })
    }
}

/// Header rows: titles, month bands, week numbers
fn header_rows(spans: &[MonthSpan], week_count: usize) -> Vec<Vec<CellValue>> {
    let mut titles: Vec<CellValue> = BASE_HEADERS.iter().map(|h| CellValue::text(*h)).collect();
    titles.push(CellValue::text(TIMELINE_HEADER));

    let mut months = vec![CellValue::Empty; BASE_HEADERS.len()];
    for span in spans.iter().filter(|s| s.len > 0) {
        months.push(CellValue::text(span.name));
        months.extend(std::iter::repeat(CellValue::Empty).take(span.len.saturating_sub(1)));
    }

    let mut numbers = vec![CellValue::Empty; BASE_HEADERS.len()];
    numbers.extend((1..=week_count as i64).map(CellValue::Integer));

    vec![titles, months, numbers]
}

/// Department or worker row: label in the first column, no task name
fn group_row(label: &str, workload: &[f64]) -> Vec<CellValue> {
    let mut row = vec![CellValue::text(label), CellValue::Empty, CellValue::Empty];
    row.extend(workload.iter().copied().map(CellValue::Number));
    row
}

fn merge_regions(rows: &[Vec<CellValue>], spans: &[MonthSpan], last_col: u32) -> Vec<MergeRegion> {
    let mut merges = vec![CellRange::new(1, FIXED_COLS + 1, 1, last_col)];

    for col in 1..=FIXED_COLS {
        merges.push(CellRange::new(1, col, HEADER_ROWS, col));
    }

    let mut col = FIXED_COLS + 1;
    for span in spans {
        let len = span.len as u32;
        if len > 0 {
            merges.push(CellRange::new(2, col, 2, col + len - 1));
        }
        col += len;
    }

    for (i, row) in rows.iter().enumerate().skip(HEADER_ROWS as usize) {
        if row.get(1).map_or(true, CellValue::is_empty) {
            let r = i as u32 + 1;
            merges.push(CellRange::new(r, 1, r, FIXED_COLS));
        }
    }

    merges.retain(|m| !m.is_single_cell());
    merges
}

/// Named style and percent format for every numeric cell of the data area
fn workload_styles(rows: &[Vec<CellValue>]) -> Vec<StyleRegion> {
    let mut regions = Vec::new();
    for (i, row) in rows.iter().enumerate().skip(HEADER_ROWS as usize) {
        for (j, value) in row.iter().enumerate().skip(FIXED_COLS as usize) {
            let (r, c) = (i as u32 + 1, j as u32 + 1);
            match value.as_number() {
                Some(v) => regions.push(StyleRegion {
                    range: CellRange::cell(r, c),
                    properties: vec![
                        StyleProperty::Named(NamedStyle::classify(v)),
                        StyleProperty::NumberFormat(PERCENT_FORMAT.to_string()),
                    ],
                }),
                None => {
                    debug!(row = r, col = c, ?value, "non-numeric cell in data area left unstyled");
                }
            }
        }
    }
    regions
}

fn border_regions(row_count: u32, last_col: u32, departments: &[CellRange]) -> Vec<BorderRegion> {
    let full = CellRange::new(1, 1, row_count, last_col);
    let outline = |range| BorderRegion {
        range,
        weight: BorderWeight::Medium,
        fill: BorderFill::Outline,
    };

    let mut borders = vec![
        BorderRegion {
            range: full,
            weight: BorderWeight::Thin,
            fill: BorderFill::Full,
        },
        outline(full),
        outline(CellRange::new(1, 1, HEADER_ROWS, last_col)),
        outline(CellRange::new(1, 1, row_count, FIXED_COLS)),
    ];
    borders.extend(departments.iter().copied().map(outline));
    borders
}
