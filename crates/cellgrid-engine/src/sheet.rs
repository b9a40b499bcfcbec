//! The backend-neutral worksheet input model
//!
//! Document adapters (one per file format) lower their library's types into a
//! [`SheetModel`]; the builder never touches a document library directly. The
//! model is deliberately dumb: sparse cell storage, raw style descriptors with
//! unresolved colors, drawing objects with their native anchors. All
//! resolution happens during the walk.

use ahash::AHashMap;

use cellgrid_core::color::ColorRef;
use cellgrid_core::geometry::{
    self, px_to_emu, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT,
};
use cellgrid_core::record::{CellScalar, FloatingKind, HorizontalAlign, VerticalAlign};
use cellgrid_core::CellRange;

/// An unresolved color plus font attributes, straight from the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleModel {
    pub font_name: Option<String>,
    /// Font size in points
    pub font_size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub font_color: Option<ColorRef>,
    /// Background fill, pattern foreground
    pub fill_color: Option<ColorRef>,
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap_text: bool,
    pub borders: BorderModel,
}

/// Unresolved border edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderModel {
    pub left: Option<BorderEdgeModel>,
    pub right: Option<BorderEdgeModel>,
    pub top: Option<BorderEdgeModel>,
    pub bottom: Option<BorderEdgeModel>,
}

/// One unresolved border edge: document style tag plus color descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct BorderEdgeModel {
    pub style: String,
    pub color: Option<ColorRef>,
}

/// One run of a rich-text value, color still unresolved
#[derive(Debug, Clone, PartialEq)]
pub struct RichRunModel {
    pub text: String,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<ColorRef>,
}

/// A picture embedded directly in a cell (in-place, not anchored)
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub name: String,
    pub data: Vec<u8>,
}

/// One cell as the adapter saw it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellModel {
    pub value: CellScalar,
    /// Number-format-applied display text
    pub display: String,
    pub formula: Option<String>,
    pub style: StyleModel,
    pub rich_runs: Vec<RichRunModel>,
    pub comment: Option<String>,
    pub hyperlink: Option<String>,
    /// Style table id, when the document exposes one
    pub style_id: Option<u32>,
    pub image: Option<InlineImage>,
}

impl CellModel {
    /// A cell holding a plain text value
    pub fn text<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            value: CellScalar::Text(text),
            ..Default::default()
        }
    }

    /// A cell holding a numeric value
    pub fn number(n: f64) -> Self {
        Self {
            display: n.to_string(),
            value: CellScalar::Number(n),
            ..Default::default()
        }
    }
}

/// One corner of a drawing anchor: cell index plus EMU offset into that cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorMarker {
    /// Row index (1-based)
    pub row: u32,
    /// Column index (1-based)
    pub col: u32,
    /// EMU offset from the cell's top edge
    pub row_off_emu: i64,
    /// EMU offset from the cell's left edge
    pub col_off_emu: i64,
}

impl AnchorMarker {
    /// A marker at a cell's top-left corner
    pub fn at(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            row_off_emu: 0,
            col_off_emu: 0,
        }
    }
}

/// A drawing anchored over the grid: picture, shape, text box, chart
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingObject {
    pub kind: FloatingKind,
    pub name: String,
    /// Text content for shapes and text boxes
    pub text: Option<String>,
    /// Top-left anchor corner
    pub from: AnchorMarker,
    /// Bottom-right anchor corner; absent for one-cell anchors
    pub to: Option<AnchorMarker>,
    /// Explicit extent `(cx, cy)` in EMU for one-cell anchors
    pub extent_emu: Option<(i64, i64)>,
    /// Raw image bytes for pictures
    pub data: Option<Vec<u8>>,
    /// Natural pixel size when the document records one
    pub natural_px: Option<(u32, u32)>,
}

impl DrawingObject {
    pub fn is_picture(&self) -> bool {
        self.kind == FloatingKind::Picture
    }

    /// Cell rectangle this object covers, from its anchor corners.
    ///
    /// A one-cell anchor covers just its from-cell; offsets are ignored for
    /// rectangle purposes (sub-cell placement does not change ownership).
    pub fn cell_rect(&self) -> CellRange {
        let from = cellgrid_core::CellPos::new(self.from.row, self.from.col);
        match self.to {
            Some(to) => {
                let mut end_row = to.row;
                let mut end_col = to.col;
                // A to-marker with zero offset sits on the boundary; the
                // previous row/column is the last one actually covered.
                if to.row_off_emu == 0 && end_row > from.row {
                    end_row -= 1;
                }
                if to.col_off_emu == 0 && end_col > from.col {
                    end_col -= 1;
                }
                CellRange::new(from, cellgrid_core::CellPos::new(end_row, end_col))
            }
            None => CellRange::single(from),
        }
    }
}

/// The lowered worksheet: everything the builder needs, nothing it doesn't
#[derive(Debug, Clone, Default)]
pub struct SheetModel {
    pub name: String,
    /// Highest populated row index (0 for an empty sheet)
    pub rows: u32,
    /// Highest populated column index (0 for an empty sheet)
    pub cols: u32,
    /// All worksheet names in the source document
    pub sheet_names: Vec<String>,
    /// Sparse cell storage keyed by `(row, col)`, both 1-based
    pub cells: AHashMap<(u32, u32), CellModel>,
    /// Declared merged ranges
    pub merges: Vec<CellRange>,
    /// All drawings on the sheet, anchored pictures included
    pub drawings: Vec<DrawingObject>,
    /// Explicit column widths in character units, keyed by column index
    pub column_widths: AHashMap<u32, f64>,
    /// Explicit row heights in points, keyed by row index
    pub row_heights: AHashMap<u32, f64>,
}

impl SheetModel {
    pub fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            sheet_names: vec![name.clone()],
            name,
            ..Default::default()
        }
    }

    /// Insert a cell, growing the sheet bounds to cover it
    pub fn insert_cell(&mut self, row: u32, col: u32, cell: CellModel) {
        self.rows = self.rows.max(row);
        self.cols = self.cols.max(col);
        self.cells.insert((row, col), cell);
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&CellModel> {
        self.cells.get(&(row, col))
    }

    /// Column width in character units, defaulted
    pub fn column_width(&self, col: u32) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Row height in points, defaulted
    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    pub fn column_width_px(&self, col: u32) -> f64 {
        geometry::column_width_to_px(self.column_width(col))
    }

    pub fn row_height_px(&self, row: u32) -> f64 {
        geometry::row_height_to_px(self.row_height(row))
    }

    pub fn column_width_emu(&self, col: u32) -> i64 {
        px_to_emu(self.column_width_px(col))
    }

    pub fn row_height_emu(&self, row: u32) -> i64 {
        px_to_emu(self.row_height_px(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_grows_bounds() {
        let mut sheet = SheetModel::new("Sheet1");
        assert_eq!((sheet.rows, sheet.cols), (0, 0));

        sheet.insert_cell(3, 2, CellModel::text("x"));
        assert_eq!((sheet.rows, sheet.cols), (3, 2));

        sheet.insert_cell(1, 5, CellModel::number(1.0));
        assert_eq!((sheet.rows, sheet.cols), (3, 5));
    }

    #[test]
    fn dimension_defaults() {
        let mut sheet = SheetModel::new("Sheet1");
        assert_eq!(sheet.column_width(1), DEFAULT_COLUMN_WIDTH);
        assert_eq!(sheet.row_height(1), DEFAULT_ROW_HEIGHT);

        sheet.column_widths.insert(2, 20.0);
        sheet.row_heights.insert(4, 30.0);
        assert_eq!(sheet.column_width_px(2), 140.0);
        assert_eq!(sheet.row_height_px(4), 40.0);
    }

    #[test]
    fn two_cell_anchor_rect() {
        let obj = DrawingObject {
            kind: FloatingKind::Picture,
            name: "pic".into(),
            text: None,
            from: AnchorMarker::at(2, 2),
            to: Some(AnchorMarker {
                row: 4,
                col: 3,
                row_off_emu: 5000,
                col_off_emu: 5000,
            }),
            extent_emu: None,
            data: None,
            natural_px: None,
        };
        assert_eq!(obj.cell_rect().to_a1_string(), "B2:C4");
    }

    #[test]
    fn boundary_to_marker_excludes_last_cell() {
        // to-corner exactly on the D5 boundary: coverage ends at C4.
        let obj = DrawingObject {
            kind: FloatingKind::Shape,
            name: "shape".into(),
            text: None,
            from: AnchorMarker::at(2, 2),
            to: Some(AnchorMarker {
                row: 5,
                col: 4,
                row_off_emu: 0,
                col_off_emu: 0,
            }),
            extent_emu: None,
            data: None,
            natural_px: None,
        };
        assert_eq!(obj.cell_rect().to_a1_string(), "B2:C4");
    }

    #[test]
    fn one_cell_anchor_rect() {
        let obj = DrawingObject {
            kind: FloatingKind::TextBox,
            name: "box".into(),
            text: Some("note".into()),
            from: AnchorMarker::at(1, 1),
            to: None,
            extent_emu: Some((914_400, 457_200)),
            data: None,
            natural_px: None,
        };
        assert!(obj.cell_rect().is_single_cell());
    }
}
