//! Tracker export reader (.xlsx, first worksheet)

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{IngestError, RawRecord};

/// Columns read from the export
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Key,
    Summary,
    Status,
    Assignee,
    StartDate,
    EndDate,
    OriginalEstimate,
    Priority,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Key,
        Column::Summary,
        Column::Status,
        Column::Assignee,
        Column::StartDate,
        Column::EndDate,
        Column::OriginalEstimate,
        Column::Priority,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Key => "Key",
            Column::Summary => "Summary",
            Column::Status => "Status",
            Column::Assignee => "Assignee",
            Column::StartDate => "Start Date",
            Column::EndDate => "End Date",
            Column::OriginalEstimate => "Original Estimate",
            Column::Priority => "Priority",
        }
    }

    pub fn is_required(self) -> bool {
        self != Column::Priority
    }

    /// True for the bare header name or the name with a bracketed suffix,
    /// e.g. `Start Date [Gantt]`
    pub fn matches(self, header: &str) -> bool {
        let header = header.trim();
        match header.strip_prefix(self.header()) {
            Some("") => true,
            Some(rest) => {
                let rest = rest.trim_start();
                rest.starts_with('[') && rest.ends_with(']')
            }
            None => false,
        }
    }
}

/// Position of every column in the header row
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ColumnMap {
    positions: [Option<usize>; Column::ALL.len()],
}

impl ColumnMap {
    fn locate(header: &[Data]) -> Result<Self, IngestError> {
        let mut map = Self::default();
        for (slot, column) in map.positions.iter_mut().zip(Column::ALL) {
            *slot = header
                .iter()
                .position(|cell| text(cell).is_some_and(|h| column.matches(&h)));
            match *slot {
                Some(index) => debug!(column = column.header(), index, "column located"),
                None if column.is_required() => {
                    return Err(IngestError::MissingColumn(column.header()));
                }
                None => debug!(column = column.header(), "optional column absent"),
            }
        }
        Ok(map)
    }

    fn cell<'a>(&self, row: &'a [Data], column: Column) -> &'a Data {
        const EMPTY: &Data = &Data::Empty;
        self.positions[column as usize]
            .and_then(|i| row.get(i))
            .unwrap_or(EMPTY)
    }

    fn record(&self, row_number: usize, row: &[Data]) -> RawRecord {
        RawRecord {
            row: row_number,
            key: text(self.cell(row, Column::Key)),
            summary: text(self.cell(row, Column::Summary)),
            status: text(self.cell(row, Column::Status)),
            assignee: text(self.cell(row, Column::Assignee)),
            start_date: date(self.cell(row, Column::StartDate)),
            end_date: date(self.cell(row, Column::EndDate)),
            estimate_hours: estimate_hours(self.cell(row, Column::OriginalEstimate)),
            priority: text(self.cell(row, Column::Priority)),
        }
    }
}

/// Read the records of the first worksheet of an .xlsx export.
///
/// The first row of the sheet is the header. Fully empty rows are dropped.
///
/// `Original Estimate` is read in two units depending on the cell type:
/// duration and numeric cells hold days (converted to whole hours), while
/// text cells hold a plain integer number of hours, as in exports where the
/// estimate column was formatted as text.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, IngestError> {
    let path = path.as_ref();
    let open_error = |e: XlsxError| IngestError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    info!(path = %path.display(), "reading workbook");
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(open_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(open_error)?;

    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))?;
    let columns = ColumnMap::locate(header)?;

    let records: Vec<RawRecord> = rows
        .enumerate()
        .filter(|(_, row)| row.iter().any(|cell| !is_blank(cell)))
        // header is sheet row first_row + 1
        .map(|(i, row)| columns.record(first_row + i + 2, row))
        .collect();

    info!(path = %path.display(), records = records.len(), "records read");
    Ok(records)
}

// ============================================================================
// Cell conversion
// ============================================================================

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Cell as text; blank cells are `None`
fn text(cell: &Data) -> Option<String> {
    let value = match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(_) | Data::Empty => return None,
    };
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        // date-time strings: keep the date part
        .or_else(|| NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok())
}

fn date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) if !dt.is_duration() => dt.as_datetime().map(|d| d.date()),
        Data::String(s) | Data::DateTimeIso(s) => parse_date(s),
        _ => None,
    }
}

/// Whole hours in a duration given in days
fn hours_from_days(days: f64) -> Option<u32> {
    if !days.is_finite() || days < 0.0 {
        return None;
    }
    let seconds = (days * 86_400.0).round() as u64;
    u32::try_from(seconds / 3_600).ok()
}

/// Original estimate in whole hours.
///
/// Duration and numeric cells hold days (the spreadsheet duration encoding);
/// text cells hold a plain number of hours.
fn estimate_hours(cell: &Data) -> Option<u32> {
    match cell {
        Data::DateTime(dt) => hours_from_days(dt.as_f64()),
        Data::Float(days) => hours_from_days(*days),
        Data::Int(days) => hours_from_days(*days as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_matching() {
        assert!(Column::StartDate.matches("Start Date"));
        assert!(Column::StartDate.matches("Start Date [Gantt]"));
        assert!(Column::StartDate.matches(" Start Date[Gantt] "));
        assert!(!Column::StartDate.matches("Start Dates"));
        assert!(!Column::StartDate.matches("Start Date Gantt"));
        assert!(!Column::Key.matches("Keyword"));
    }

    #[test]
    fn locate_columns_in_any_order() {
        let header: Vec<Data> = [
            "Summary",
            "Key",
            "Assignee",
            "Status",
            "Original Estimate",
            "End Date [Gantt]",
            "Start Date [Gantt]",
        ]
        .into_iter()
        .map(|h| Data::String(h.to_string()))
        .collect();
        let map = ColumnMap::locate(&header).unwrap();
        assert_eq!(map.positions[Column::Key as usize], Some(1));
        assert_eq!(map.positions[Column::StartDate as usize], Some(6));
        assert_eq!(map.positions[Column::Priority as usize], None);
    }

    #[test]
    fn missing_required_column() {
        let header = vec![Data::String("Key".into()), Data::String("Summary".into())];
        let err = ColumnMap::locate(&header).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("Status")));
    }

    #[test]
    fn text_cells() {
        assert_eq!(text(&Data::String("PRJ-1".into())), Some("PRJ-1".into()));
        assert_eq!(text(&Data::String("  ".into())), None);
        assert_eq!(text(&Data::Float(12.0)), Some("12".into()));
        assert_eq!(text(&Data::Int(7)), Some("7".into()));
        assert_eq!(text(&Data::Empty), None);
    }

    #[test]
    fn date_strings() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 6);
        assert_eq!(date(&Data::String("2025-01-06".into())), expected);
        assert_eq!(date(&Data::String("2025-01-06 09:30:00".into())), expected);
        assert_eq!(date(&Data::DateTimeIso("2025-01-06T09:30:00".into())), expected);
        assert_eq!(date(&Data::String("next week".into())), None);
        assert_eq!(date(&Data::Float(45663.0)), None);
    }

    #[test]
    fn estimates() {
        // 40 hours as fractional days
        assert_eq!(estimate_hours(&Data::Float(40.0 / 24.0)), Some(40));
        assert_eq!(estimate_hours(&Data::Int(2)), Some(48));
        assert_eq!(estimate_hours(&Data::Float(0.0)), Some(0));
        assert_eq!(estimate_hours(&Data::String("16".into())), Some(16));
        assert_eq!(estimate_hours(&Data::String("2d".into())), None);
        assert_eq!(estimate_hours(&Data::Float(-1.0)), None);
        assert_eq!(estimate_hours(&Data::Empty), None);
    }

    #[test]
    fn partial_hours_are_truncated() {
        // 1 day 2.5 hours
        assert_eq!(hours_from_days(1.0 + 2.5 / 24.0), Some(26));
    }
}
