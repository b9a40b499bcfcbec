//! The normalized per-cell output model
//!
//! A [`CellRecord`] is the unit of data handed to the presentation layer:
//! one record per visited cell, assembled once and immutable afterwards,
//! owned by the [`SheetGrid`] emitted for the worksheet. Cells subsumed by a
//! merged range produce no record; the main cell's span represents them.

use chrono::NaiveDateTime;

use crate::address::CellRange;

/// A cell's raw value, typed
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum CellScalar {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// A document error literal such as `#DIV/0!`
    Error(String),
}

impl CellScalar {
    /// The data type tag for this value
    pub fn data_type(&self) -> DataType {
        match self {
            CellScalar::Empty => DataType::Empty,
            CellScalar::Text(_) => DataType::Text,
            CellScalar::Number(_) => DataType::Number,
            CellScalar::Int(_) => DataType::Integer,
            CellScalar::Bool(_) => DataType::Boolean,
            CellScalar::DateTime(_) => DataType::DateTime,
            CellScalar::Error(_) => DataType::Error,
        }
    }

    /// True for [`CellScalar::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellScalar::Empty)
    }
}

/// Classification tag mirroring [`CellScalar`], plus the per-cell failure tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DataType {
    #[default]
    Empty,
    Text,
    Number,
    Integer,
    Boolean,
    DateTime,
    /// Error value, or a cell whose record had to fall back (see builder)
    Error,
}

/// What a cell contains, for the presentation layer's layout decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContentKind {
    #[default]
    Empty,
    TextOnly,
    ImageOnly,
    Mixed,
}

/// Resolved font settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FontInfo {
    /// Font family name
    pub name: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Resolved color as `"RRGGBB"`, if any
    pub color: Option<String>,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            color: None,
        }
    }
}

/// Horizontal alignment tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum HorizontalAlign {
    /// Text left, numbers right
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    Distributed,
}

/// Vertical alignment tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum VerticalAlign {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
    Distributed,
}

/// Resolved alignment settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlignmentInfo {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap_text: bool,
}

/// One resolved border edge
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BorderEdgeInfo {
    /// Line style tag as the document names it ("thin", "medium", ...)
    pub style: String,
    /// Resolved color as `"RRGGBB"`, if any
    pub color: Option<String>,
}

/// Resolved borders for all four edges
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BorderInfo {
    pub left: Option<BorderEdgeInfo>,
    pub right: Option<BorderEdgeInfo>,
    pub top: Option<BorderEdgeInfo>,
    pub bottom: Option<BorderEdgeInfo>,
}

impl BorderInfo {
    /// True when no edge carries a border
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// Fully resolved visual style for a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StyleInfo {
    pub font: FontInfo,
    pub alignment: AlignmentInfo,
    pub border: BorderInfo,
    /// Resolved background fill as `"RRGGBB"`, if any
    pub fill_color: Option<String>,
}

/// Cell geometry and merge membership
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DimensionInfo {
    /// Own column width in pixels
    pub column_width_px: f64,
    /// Own row height in pixels
    pub row_height_px: f64,
    /// Total displayed width in pixels (whole span for a merged main cell)
    pub width_px: f64,
    /// Total displayed height in pixels (whole span for a merged main cell)
    pub height_px: f64,
    /// Part of a merged range (declared or synthesized)
    pub is_merged: bool,
    /// Top-left cell of its merged range
    pub is_main_merged_cell: bool,
    /// Rows spanned (1 when unmerged)
    pub row_span: u32,
    /// Columns spanned (1 when unmerged)
    pub col_span: u32,
    /// Range address such as "B2:C3" when merged
    pub merge_range: Option<String>,
}

/// One run of a rich-text cell value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RichRun {
    pub text: String,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Resolved run color as `"RRGGBB"`, if any
    pub color: Option<String>,
}

impl RichRun {
    /// A run carrying only text
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            bold: None,
            italic: None,
            color: None,
        }
    }
}

/// A picture displayed in a cell, embedded or anchored
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellImage {
    /// Drawing name from the document, if any
    pub name: String,
    /// Container format tag ("png", "jpeg", "gif"), if sniffed or known
    pub format: Option<String>,
    /// Displayed width/height in pixels
    pub width_px: f64,
    pub height_px: f64,
    /// Natural (intrinsic) width/height in pixels
    pub natural_width_px: f64,
    pub natural_height_px: f64,
    /// Mean of displayed/natural ratios, as a percentage
    pub scale_percent: f64,
    /// Deviates from 100% by more than one percentage point
    pub is_scaled: bool,
    /// Anchor rectangle in cell coordinates
    pub anchor: CellRange,
}

/// Closed set of floating object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FloatingKind {
    Shape,
    TextBox,
    Chart,
    Table,
    Picture,
    #[default]
    Other,
}

/// A floating (non-embedded) drawing object attached to a cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatingObject {
    pub kind: FloatingKind,
    pub name: String,
    /// Text content for shapes and text boxes, if any
    pub text: Option<String>,
    /// Anchor rectangle in cell coordinates
    pub anchor: CellRange,
    pub width_px: f64,
    pub height_px: f64,
}

/// Record metadata
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellMeta {
    pub has_formula: bool,
    /// Style table id from the document, when it exposes one
    pub style_id: Option<u32>,
    pub content: ContentKind,
    /// Bounding start address (merge-aware)
    pub start: String,
    /// Bounding end address (merge-aware)
    pub end: String,
}

/// The normalized record for one populated cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellRecord {
    /// 1-based row index
    pub row: u32,
    /// 1-based column index
    pub col: u32,
    /// A1-style address
    pub address: String,
    pub value: CellScalar,
    pub data_type: DataType,
    /// Display text (formatted value; floating text may be folded in)
    pub display: String,
    pub formula: Option<String>,
    pub style: StyleInfo,
    pub dimensions: DimensionInfo,
    pub rich_runs: Vec<RichRun>,
    pub comment: Option<String>,
    pub hyperlink: Option<String>,
    pub images: Vec<CellImage>,
    pub floats: Vec<FloatingObject>,
    pub meta: CellMeta,
}

impl CellRecord {
    /// A bare record at a position: empty value, default style, own bounds.
    pub fn at(row: u32, col: u32) -> Self {
        let address = crate::address::CellPos::new(row, col).to_a1_string();
        Self {
            row,
            col,
            address: address.clone(),
            value: CellScalar::Empty,
            data_type: DataType::Empty,
            display: String::new(),
            formula: None,
            style: StyleInfo::default(),
            dimensions: DimensionInfo {
                row_span: 1,
                col_span: 1,
                ..Default::default()
            },
            rich_runs: Vec::new(),
            comment: None,
            hyperlink: None,
            images: Vec::new(),
            floats: Vec::new(),
            meta: CellMeta {
                start: address.clone(),
                end: address,
                ..Default::default()
            },
        }
    }
}

/// One column header: name/width/index triple
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnHeader {
    /// Column letters ("A", "B", ...)
    pub name: String,
    /// 1-based column index
    pub index: u32,
    /// Width in pixels
    pub width_px: f64,
}

/// The emitted worksheet: row-major grid of records plus metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SheetGrid {
    /// Worksheet name
    pub name: String,
    /// Total populated rows
    pub total_rows: u32,
    /// Total populated columns
    pub total_cols: u32,
    /// All worksheet names in the document
    pub sheet_names: Vec<String>,
    /// Column headers, one per column
    pub columns: Vec<ColumnHeader>,
    /// Row-major records; cells subsumed by a merge are absent
    pub rows: Vec<Vec<CellRecord>>,
}

impl SheetGrid {
    /// Find the emitted record at a position, if one exists
    pub fn record_at(&self, row: u32, col: u32) -> Option<&CellRecord> {
        self.rows
            .get(row.checked_sub(1)? as usize)?
            .iter()
            .find(|r| r.col == col)
    }

    /// Total number of emitted records
    pub fn record_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_data_types() {
        assert_eq!(CellScalar::Empty.data_type(), DataType::Empty);
        assert_eq!(CellScalar::Text("x".into()).data_type(), DataType::Text);
        assert_eq!(CellScalar::Number(1.5).data_type(), DataType::Number);
        assert_eq!(CellScalar::Int(7).data_type(), DataType::Integer);
        assert_eq!(CellScalar::Bool(true).data_type(), DataType::Boolean);
        assert_eq!(
            CellScalar::Error("#REF!".into()).data_type(),
            DataType::Error
        );
    }

    #[test]
    fn bare_record_bounds_are_own_cell() {
        let rec = CellRecord::at(2, 3);
        assert_eq!(rec.address, "C2");
        assert_eq!(rec.meta.start, "C2");
        assert_eq!(rec.meta.end, "C2");
        assert_eq!(rec.dimensions.row_span, 1);
        assert_eq!(rec.dimensions.col_span, 1);
    }

    #[test]
    fn grid_record_lookup() {
        let mut grid = SheetGrid {
            name: "Sheet1".into(),
            total_rows: 1,
            total_cols: 2,
            sheet_names: vec!["Sheet1".into()],
            columns: Vec::new(),
            rows: vec![vec![CellRecord::at(1, 2)]],
        };
        assert!(grid.record_at(1, 2).is_some());
        assert!(grid.record_at(1, 1).is_none());
        assert_eq!(grid.record_count(), 1);

        grid.rows[0].push(CellRecord::at(1, 1));
        assert_eq!(grid.record_count(), 2);
    }
}
