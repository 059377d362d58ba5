//! Report layout description
//!
//! A [`Layout`] is what the report model hands to a renderer: the grid of cell
//! values, the merge regions and the style sheet. All coordinates are 1-based
//! `(row, column)` pairs.
//!
//! Styling is a closed set of properties ([`StyleProperty`]). Renderers do not
//! interpret the style sheet themselves; [`StyleSheet::resolve`] folds it into
//! one [`CellStyle`] per cell.

use serde::{Deserialize, Serialize};

// ============================================================================
// Cells and ranges
// ============================================================================

/// Value of a single cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// Numeric value of the cell, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            Self::Empty | Self::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Integer(_) | Self::Number(_) => false,
        }
    }

    /// Text shown for the value, used for column sizing
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Inclusive rectangular range of cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl CellRange {
    pub const fn new(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        Self {
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    pub const fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    /// Every `(row, col)` of the range, row by row
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |r| (self.first_col..=self.last_col).map(move |c| (r, c)))
    }
}

/// Cells rendered as one joined cell
pub type MergeRegion = CellRange;

// ============================================================================
// Style properties
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub bold: bool,
    /// Point size, renderer default when `None`
    pub size: Option<f64>,
}

impl Font {
    pub const fn bold() -> Self {
        Self {
            bold: true,
            size: None,
        }
    }

    pub const fn bold_sized(size: f64) -> Self {
        Self {
            bold: true,
            size: Some(size),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Alignment {
    pub const CENTER: Self = Self {
        horizontal: HorizontalAlign::Center,
        vertical: VerticalAlign::Center,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BorderWeight {
    Thin,
    Medium,
}

/// Workload classification of a numeric cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedStyle {
    /// More than a full work-week
    Overload,
    /// Some work, less than a full week
    Partial,
    /// No work, or exactly a full week
    Idle,
}

impl NamedStyle {
    /// Classify a workload fraction. The overload threshold is strict: 1.0 is idle.
    pub fn classify(value: f64) -> Self {
        if value > 1.0 {
            Self::Overload
        } else if value > 0.0 && value < 1.0 {
            Self::Partial
        } else {
            Self::Idle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overload => "overload",
            Self::Partial => "partial",
            Self::Idle => "idle",
        }
    }
}

impl std::fmt::Display for NamedStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single style attribute applied to a cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StyleProperty {
    Font(Font),
    Alignment(Alignment),
    /// All four sides
    Border(BorderWeight),
    NumberFormat(String),
    Named(NamedStyle),
}

/// Properties applied to every cell of a range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleRegion {
    pub range: CellRange,
    pub properties: Vec<StyleProperty>,
}

/// How a border region is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderFill {
    /// Every side of every cell in the range
    Full,
    /// Outer edge of the range only
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderRegion {
    pub range: CellRange,
    pub weight: BorderWeight,
    pub fill: BorderFill,
}

/// Style sheet of a layout, applied in order: regions, `all`, borders
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Applied to every cell of the grid
    pub all: Vec<StyleProperty>,
    pub regions: Vec<StyleRegion>,
    pub borders: Vec<BorderRegion>,
}

// ============================================================================
// Resolved cell style
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borders {
    pub top: Option<BorderWeight>,
    pub left: Option<BorderWeight>,
    pub right: Option<BorderWeight>,
    pub bottom: Option<BorderWeight>,
}

impl Borders {
    pub const fn all(weight: BorderWeight) -> Self {
        Self {
            top: Some(weight),
            left: Some(weight),
            right: Some(weight),
            bottom: Some(weight),
        }
    }
}

/// Final style of one cell
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub font: Font,
    pub alignment: Option<Alignment>,
    pub borders: Borders,
    pub number_format: Option<String>,
    pub named: Option<NamedStyle>,
}

impl CellStyle {
    pub fn apply(&mut self, property: &StyleProperty) {
        match property {
            StyleProperty::Font(font) => self.font = *font,
            StyleProperty::Alignment(alignment) => self.alignment = Some(*alignment),
            StyleProperty::Border(weight) => self.borders = Borders::all(*weight),
            StyleProperty::NumberFormat(format) => self.number_format = Some(format.clone()),
            StyleProperty::Named(named) => self.named = Some(*named),
        }
    }
}

impl StyleSheet {
    /// Fold the sheet into per-cell styles for a `rows` x `cols` grid.
    ///
    /// The returned grid is 0-based: `styles[row - 1][col - 1]`. Ranges that
    /// fall outside the grid are clipped.
    pub fn resolve(&self, rows: u32, cols: u32) -> Vec<Vec<CellStyle>> {
        let mut grid = vec![vec![CellStyle::default(); cols as usize]; rows as usize];

        for region in &self.regions {
            for (r, c) in region.range.cells() {
                if let Some(style) = cell_mut(&mut grid, r, c) {
                    for property in &region.properties {
                        style.apply(property);
                    }
                }
            }
        }

        for r in 1..=rows {
            for c in 1..=cols {
                if let Some(style) = cell_mut(&mut grid, r, c) {
                    for property in &self.all {
                        style.apply(property);
                    }
                }
            }
        }

        for border in &self.borders {
            let range = border.range;
            match border.fill {
                BorderFill::Full => {
                    for (r, c) in range.cells() {
                        if let Some(style) = cell_mut(&mut grid, r, c) {
                            style.borders = Borders::all(border.weight);
                        }
                    }
                }
                BorderFill::Outline => {
                    for r in range.first_row..=range.last_row {
                        if let Some(style) = cell_mut(&mut grid, r, range.first_col) {
                            style.borders.left = Some(border.weight);
                        }
                        if let Some(style) = cell_mut(&mut grid, r, range.last_col) {
                            style.borders.right = Some(border.weight);
                        }
                    }
                    for c in range.first_col..=range.last_col {
                        if let Some(style) = cell_mut(&mut grid, range.first_row, c) {
                            style.borders.top = Some(border.weight);
                        }
                        if let Some(style) = cell_mut(&mut grid, range.last_row, c) {
                            style.borders.bottom = Some(border.weight);
                        }
                    }
                }
            }
        }

        grid
    }
}

fn cell_mut(grid: &mut [Vec<CellStyle>], row: u32, col: u32) -> Option<&mut CellStyle> {
    if row == 0 || col == 0 {
        return None;
    }
    grid.get_mut(row as usize - 1)?.get_mut(col as usize - 1)
}

// ============================================================================
// Layout
// ============================================================================

/// Complete description of a rendered report
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: Vec<Vec<CellValue>>,
    pub merges: Vec<MergeRegion>,
    pub styles: StyleSheet,
}

impl Layout {
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Width of the widest row
    pub fn column_count(&self) -> u32 {
        self.rows.iter().map(Vec::len).max().unwrap_or(0) as u32
    }

    /// Value at a 1-based position; missing cells read as empty
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        if row == 0 || col == 0 {
            return EMPTY;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col as usize - 1))
            .unwrap_or(EMPTY)
    }
}
