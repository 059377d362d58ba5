//! Excel workload report renderer
//!
//! Writes a [`Layout`] to a single worksheet:
//! - values, with one format per cell resolved from the layout's style sheet
//! - merge regions, formatted like their top-left cell
//! - column widths fitted to the data rows
//! - frozen panes above and left of a chosen cell
//!
//! Workload classes use the spreadsheet's traffic-light palette:
//!
//! | Class    | Font     | Fill     |
//! |----------|----------|----------|
//! | Overload | `9C0006` | `FFC7CE` |
//! | Partial  | `9C6500` | `FFEB9C` |
//! | Idle     | `006100` | `C6EFCE` |

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, info};
use weekload_core::layout::{
    BorderWeight, CellStyle, CellValue, HorizontalAlign, NamedStyle, VerticalAlign,
};
use weekload_core::{Layout, RenderError, Renderer};

/// Widest sheet Excel accepts
const MAX_COLUMNS: u32 = 16_384;

/// Font and fill colour of a workload class
pub fn palette(named: NamedStyle) -> (u32, u32) {
    match named {
        NamedStyle::Overload => (0x9C0006, 0xFFC7CE),
        NamedStyle::Partial => (0x9C6500, 0xFFEB9C),
        NamedStyle::Idle => (0x006100, 0xC6EFCE),
    }
}

/// Excel workload report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// First unfrozen cell, 1-based `(row, col)`
    pub freeze_cell: Option<(u32, u32)>,
    /// Characters added to the widest value of each column
    pub column_padding: f64,
    /// Rows ignored when fitting column widths
    pub header_rows: u32,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Workload".into(),
            freeze_cell: None,
            column_padding: 5.0,
            header_rows: 3,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Freeze rows above and columns left of the 1-based cell `(row, col)`
    pub fn freeze_cell(mut self, row: u32, col: u32) -> Self {
        self.freeze_cell = Some((row, col));
        self
    }

    /// Set padding added to fitted column widths
    pub fn column_padding(mut self, padding: f64) -> Self {
        self.column_padding = padding;
        self
    }

    /// Set number of header rows skipped when fitting column widths
    pub fn header_rows(mut self, rows: u32) -> Self {
        self.header_rows = rows;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, layout: &Layout) -> Result<Vec<u8>, RenderError> {
        let mut workbook = self.build_workbook(layout)?;
        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Render and save the workbook to `path`
    pub fn write_to_file(
        &self,
        layout: &Layout,
        path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.render_to_bytes(layout)?;
        info!(path = %path.display(), bytes = bytes.len(), "saving workbook");
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Width of every column: widest displayed value below the header rows
    /// plus padding
    pub fn column_widths(&self, layout: &Layout) -> Vec<f64> {
        (1..=layout.column_count())
            .map(|col| {
                let widest = (self.header_rows + 1..=layout.row_count())
                    .map(|row| layout.cell(row, col).display().chars().count())
                    .max()
                    .unwrap_or(0);
                widest as f64 + self.column_padding
            })
            .collect()
    }

    fn build_workbook(&self, layout: &Layout) -> Result<Workbook, RenderError> {
        let rows = layout.row_count();
        let cols = layout.column_count();
        if rows == 0 || cols == 0 {
            return Err(RenderError::InvalidData("Layout has no cells".into()));
        }
        if cols > MAX_COLUMNS {
            return Err(RenderError::InvalidData(format!(
                "Layout has {cols} columns, more than {MAX_COLUMNS}"
            )));
        }

        info!(rows, cols, "creating workbook");
        let formats: Vec<Vec<Format>> = layout
            .styles
            .resolve(rows, cols)
            .iter()
            .map(|row| row.iter().map(cell_format).collect())
            .collect();

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name).map_err(format_error)?;

        info!(merges = layout.merges.len(), "merging cells");
        for merge in &layout.merges {
            if merge.first_row == 0
                || merge.first_col == 0
                || merge.last_row > rows
                || merge.last_col > cols
            {
                return Err(RenderError::InvalidData(format!(
                    "Merge region {merge:?} outside the {rows}x{cols} grid"
                )));
            }
            debug!(?merge, "merging");
            let format = &formats[merge.first_row as usize - 1][merge.first_col as usize - 1];
            sheet
                .merge_range(
                    merge.first_row - 1,
                    (merge.first_col - 1) as u16,
                    merge.last_row - 1,
                    (merge.last_col - 1) as u16,
                    "",
                    format,
                )
                .map_err(format_error)?;
        }

        // Cells are written after merging so that every cell of a merged
        // range keeps its own borders.
        info!("writing cells");
        for (r, row_formats) in formats.iter().enumerate() {
            for (c, format) in row_formats.iter().enumerate() {
                let value = layout.cell(r as u32 + 1, c as u32 + 1);
                write_cell(sheet, r as u32, c as u16, value, format).map_err(format_error)?;
            }
        }

        info!("adjusting column widths");
        for (col, width) in self.column_widths(layout).into_iter().enumerate() {
            sheet.set_column_width(col as u16, width).map_err(format_error)?;
        }

        if let Some((row, col)) = self.freeze_cell {
            if row == 0 || col == 0 {
                return Err(RenderError::InvalidData(format!(
                    "Freeze cell ({row}, {col}) is not a 1-based position"
                )));
            }
            info!(row, col, "freezing panes");
            sheet
                .set_freeze_panes(row - 1, (col - 1) as u16)
                .map_err(format_error)?;
        }

        Ok(workbook)
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, layout: &Layout) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(layout)
    }
}

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Empty => sheet.write_blank(row, col, format),
        CellValue::Text(text) => sheet.write_string_with_format(row, col, text, format),
        CellValue::Integer(n) => sheet.write_number_with_format(row, col, *n as f64, format),
        CellValue::Number(n) => sheet.write_number_with_format(row, col, *n, format),
    }?;
    Ok(())
}

fn border(weight: BorderWeight) -> FormatBorder {
    match weight {
        BorderWeight::Thin => FormatBorder::Thin,
        BorderWeight::Medium => FormatBorder::Medium,
    }
}

/// Spreadsheet format of a resolved cell style
fn cell_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if style.font.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font.size {
        format = format.set_font_size(size);
    }

    if let Some(alignment) = style.alignment {
        format = format.set_align(match alignment.horizontal {
            HorizontalAlign::Left => FormatAlign::Left,
            HorizontalAlign::Center => FormatAlign::Center,
            HorizontalAlign::Right => FormatAlign::Right,
        });
        format = format.set_align(match alignment.vertical {
            VerticalAlign::Top => FormatAlign::Top,
            VerticalAlign::Center => FormatAlign::VerticalCenter,
            VerticalAlign::Bottom => FormatAlign::Bottom,
        });
    }

    if let Some(number_format) = &style.number_format {
        format = format.set_num_format(number_format);
    }

    if let Some(named) = style.named {
        let (font, fill) = palette(named);
        format = format.set_font_color(font).set_background_color(fill);
    }

    let borders = style.borders;
    if let Some(weight) = borders.top {
        format = format.set_border_top(border(weight));
    }
    if let Some(weight) = borders.left {
        format = format.set_border_left(border(weight));
    }
    if let Some(weight) = borders.right {
        format = format.set_border_right(border(weight));
    }
    if let Some(weight) = borders.bottom {
        format = format.set_border_bottom(border(weight));
    }

    format
}
