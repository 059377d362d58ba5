//! Command-line value parsers

use std::fmt;
use std::path::PathBuf;

use chrono::Datelike;
use weekload_core::is_supported_year;

const FREEZE_CELL_ERROR: &str =
    "Cell cords must be two numbers divided by a comma (ex: \"1,1\" or \"12, 34\")";

/// First unfrozen cell of the report, 1-based
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreezeCell {
    pub row: u32,
    pub col: u32,
}

impl fmt::Display for FreezeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Existing `.xlsx` file
pub fn input_filename(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("File does not exist: \"{value}\""));
    }
    if !value.ends_with(".xlsx") {
        return Err("Input filename must be xlsx format".to_string());
    }
    Ok(path)
}

pub fn output_filename(value: &str) -> Result<PathBuf, String> {
    if !value.ends_with(".xlsx") {
        return Err("Output filename must be xlsx format".to_string());
    }
    Ok(PathBuf::from(value))
}

/// Year made of ASCII digits only, within the supported calendar range
pub fn year(value: &str) -> Result<i32, String> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Year must be a number".to_string());
    }
    let year: i32 = value.parse().map_err(|_| "Year must be a number".to_string())?;
    if !is_supported_year(year) {
        return Err(format!("Year {year} is out of the supported calendar range"));
    }
    Ok(year)
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// `"row,col"`, whitespace around either number allowed
pub fn freeze_cell(value: &str) -> Result<FreezeCell, String> {
    let (row, col) = value.split_once(',').ok_or(FREEZE_CELL_ERROR)?;
    let parse = |part: &str| -> Result<u32, String> {
        match part.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(FREEZE_CELL_ERROR.to_string()),
        }
    };
    Ok(FreezeCell {
        row: parse(row)?,
        col: parse(col)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_accepts_digits_only() {
        assert_eq!(year("2025"), Ok(2025));
        assert!(year("").is_err());
        assert!(year("-2025").is_err());
        assert!(year("20x5").is_err());
        assert!(year(" 2025").is_err());
        assert!(year("99999999999").is_err());
    }

    #[test]
    fn year_must_fit_the_calendar() {
        assert_eq!(year("0"), Ok(0));
        assert_eq!(
            year("300000"),
            Err("Year 300000 is out of the supported calendar range".to_string())
        );
        assert!(year("2147483647").is_err());
    }

    #[test]
    fn freeze_cell_parsing() {
        assert_eq!(freeze_cell("4,4"), Ok(FreezeCell { row: 4, col: 4 }));
        assert_eq!(freeze_cell("12, 34"), Ok(FreezeCell { row: 12, col: 34 }));
        assert_eq!(freeze_cell(" 3 ,1 "), Ok(FreezeCell { row: 3, col: 1 }));
        assert!(freeze_cell("4").is_err());
        assert!(freeze_cell("1,2,3").is_err());
        assert!(freeze_cell("a,b").is_err());
        assert!(freeze_cell("0,4").is_err());
    }

    #[test]
    fn freeze_cell_display_round_trips() {
        let cell = FreezeCell { row: 4, col: 4 };
        assert_eq!(freeze_cell(&cell.to_string()), Ok(cell));
    }

    #[test]
    fn output_must_be_xlsx() {
        assert!(output_filename("report.xlsx").is_ok());
        assert!(output_filename("report.csv").is_err());
    }

    #[test]
    fn input_must_exist_and_be_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("export.xlsx");
        let txt = dir.path().join("export.txt");
        std::fs::write(&xlsx, b"").unwrap();
        std::fs::write(&txt, b"").unwrap();

        assert!(input_filename(xlsx.to_str().unwrap()).is_ok());
        let err = input_filename(txt.to_str().unwrap()).unwrap_err();
        assert_eq!(err, "Input filename must be xlsx format");
        let missing = dir.path().join("missing.xlsx");
        assert!(input_filename(missing.to_str().unwrap())
            .unwrap_err()
            .starts_with("File does not exist"));
    }
}
