//! Integration tests reading tracker exports written to disk

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use weekload_ingest::{build_roster, read_records, IngestError};

const HEADERS: [&str; 8] = [
    "Key",
    "Summary",
    "Status",
    "Assignee",
    "Start Date [Gantt]",
    "End Date [Gantt]",
    "Original Estimate",
    "Priority",
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn write_row(sheet: &mut Worksheet, row: u32, cells: &[&str]) {
    for (col, value) in cells.iter().enumerate() {
        if !value.is_empty() {
            sheet.write_string(row, col as u16, *value).unwrap();
        }
    }
}

/// Export with two departments, date-time and text dates, and every
/// estimate encoding
fn write_export(dir: &Path) -> PathBuf {
    let path = dir.join("export.xlsx");
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let duration_format = Format::new().set_num_format("[h]:mm");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_row(sheet, 0, &HEADERS);

    write_row(sheet, 1, &["", "Eng"]);
    write_row(sheet, 2, &["a.lice", "a.lice"]);

    write_row(sheet, 3, &["PRJ-1", " Design ", "Open", " Alice", "", "2025-01-12", "", "Major"]);
    sheet
        .write_datetime_with_format(
            3,
            4,
            &ExcelDateTime::from_ymd(2025, 1, 6).unwrap(),
            &date_format,
        )
        .unwrap();
    sheet
        .write_number_with_format(3, 6, 40.0 / 24.0, &duration_format)
        .unwrap();

    write_row(sheet, 4, &["PRJ-2", "Review", "Open", "Alice", "2025-02-03", "2025-02-16"]);
    sheet.write_number(4, 6, 1.0).unwrap();

    // row 6 left blank

    write_row(sheet, 6, &["PRJ-3", "Old", "Done", "Alice", "2024-11-04", "2024-11-10", "8"]);

    write_row(sheet, 7, &["", "Ops"]);
    write_row(sheet, 8, &["JIRAUSER10200", "b.ob"]);
    write_row(sheet, 9, &["OPS-1", "Patch", "Open", "Bob", "2025-03-03", "2025-03-09", "16"]);

    workbook.save(&path).unwrap();
    path
}

#[test]
fn reads_records_from_export() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_records(write_export(dir.path())).unwrap();

    // blank sheet row 6 is dropped
    let rows: Vec<_> = records.iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![2, 3, 4, 5, 7, 8, 9, 10]);

    assert!(records[0].is_department_marker());
    assert_eq!(records[0].summary.as_deref(), Some("Eng"));
    assert_eq!(records[1].status, None);

    let prj1 = &records[2];
    assert_eq!(prj1.key.as_deref(), Some("PRJ-1"));
    assert_eq!(prj1.start_date, Some(date(2025, 1, 6)));
    assert_eq!(prj1.end_date, Some(date(2025, 1, 12)));
    assert_eq!(prj1.estimate_hours, Some(40));
    assert_eq!(prj1.priority.as_deref(), Some("Major"));

    assert_eq!(records[3].estimate_hours, Some(24));
    assert_eq!(records[3].priority, None);
    assert_eq!(records[7].estimate_hours, Some(16));
}

#[test]
fn export_to_roster() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_records(write_export(dir.path())).unwrap();
    let roster = build_roster(&records, 2025).unwrap();

    let departments: Vec<_> = roster.departments.iter().map(|d| d.name()).collect();
    assert_eq!(departments, vec!["Eng", "Ops"]);

    let alice = &roster.departments[0].workers()[0];
    assert_eq!(alice.name(), "Alice");
    assert_eq!(alice.username(), "a.lice");
    let names: Vec<_> = alice.tasks().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Design", "Review"]);

    let bob = &roster.departments[1].workers()[0];
    assert_eq!(bob.username(), "JIRAUSER10200");

    let summary = alice.workload_summary(2025).unwrap();
    assert_eq!(summary[1], 1.0);
    // 24h over two weeks
    assert_eq!(summary[5], 0.3);
    assert_eq!(summary[6], 0.3);
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.xlsx");
    let mut workbook = Workbook::new();
    write_row(workbook.add_worksheet(), 0, &["Key", "Summary", "Status", "Assignee"]);
    workbook.save(&path).unwrap();

    let err = read_records(&path).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn("Start Date")));
}

#[test]
fn missing_file_cannot_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_records(dir.path().join("absent.xlsx")).unwrap_err();
    assert!(matches!(err, IngestError::Open { .. }));
}
