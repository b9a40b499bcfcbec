//! Workbook loading and worksheet lowering

use std::io::Cursor;
use std::path::Path;

use umya_spreadsheet::{reader, Cell, CellRawValue, Spreadsheet, Worksheet};

use cellgrid_core::record::SheetGrid;
use cellgrid_core::{CellRange, Error, Result};
use cellgrid_engine::{
    extract_sheet, CellModel, ExtractOptions, RichRunModel, SheetModel,
};

use crate::{drawing, style, value};

/// Read a workbook from disk.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Spreadsheet> {
    let path = path.as_ref();
    reader::xlsx::read(path)
        .map_err(|e| Error::Document(format!("failed to read '{}': {}", path.display(), e)))
}

/// Read a workbook from an in-memory buffer.
pub fn load_bytes(bytes: &[u8]) -> Result<Spreadsheet> {
    reader::xlsx::read_reader(Cursor::new(bytes), true)
        .map_err(|e| Error::Document(format!("failed to read workbook buffer: {}", e)))
}

/// All worksheet names in document order.
pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    (0..book.get_sheet_count())
        .filter_map(|i| book.get_sheet(&i).map(|ws| ws.get_name().to_string()))
        .collect()
}

/// Lower one worksheet by index.
pub fn sheet_model(book: &Spreadsheet, index: usize) -> Result<SheetModel> {
    let ws = book
        .get_sheet(&index)
        .ok_or_else(|| Error::SheetNotFound(format!("index {}", index)))?;
    Ok(lower_worksheet(book, ws))
}

/// Lower one worksheet by name.
pub fn sheet_model_by_name(book: &Spreadsheet, name: &str) -> Result<SheetModel> {
    let ws = book
        .get_sheet_by_name(name)
        .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;
    Ok(lower_worksheet(book, ws))
}

/// Load, lower and walk in one call. `sheet` falls back to the first sheet.
pub fn extract_path<P: AsRef<Path>>(
    path: P,
    sheet: Option<&str>,
    opts: &ExtractOptions,
) -> Result<SheetGrid> {
    let book = load_path(path)?;
    let model = match sheet {
        Some(name) => sheet_model_by_name(&book, name)?,
        None => sheet_model(&book, 0)?,
    };
    extract_sheet(&model, opts)
}

fn lower_worksheet(book: &Spreadsheet, ws: &Worksheet) -> SheetModel {
    let mut model = SheetModel::new(ws.get_name().to_string());
    model.sheet_names = sheet_names(book);

    for cell in ws.get_cell_collection() {
        let coord = cell.get_coordinate();
        let col = *coord.get_col_num();
        let row = *coord.get_row_num();
        model.insert_cell(row, col, lower_cell(ws, cell, row, col));
    }

    for comment in ws.get_comments() {
        let coord = comment.get_coordinate();
        let key = (*coord.get_row_num(), *coord.get_col_num());
        // Comment text is only reachable through its rich-text form.
        let Some(text) = comment
            .get_text()
            .get_rich_text()
            .map(|rt| rt.get_text().to_string())
        else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        model
            .cells
            .entry(key)
            .or_insert_with(CellModel::default)
            .comment = Some(text);
        model.rows = model.rows.max(key.0);
        model.cols = model.cols.max(key.1);
    }

    for range in ws.get_merge_cells() {
        match CellRange::parse(&range.get_range()) {
            Ok(parsed) => {
                // A merge can extend past the last populated cell.
                model.rows = model.rows.max(parsed.end.row);
                model.cols = model.cols.max(parsed.end.col);
                model.merges.push(parsed);
            }
            Err(err) => {
                log::warn!(
                    "unparseable merged range '{}' on '{}': {}",
                    range.get_range(),
                    ws.get_name(),
                    err
                );
            }
        }
    }

    for col in 1..=model.cols {
        if let Some(dim) = ws.get_column_dimension_by_number(&col) {
            let width = *dim.get_width();
            if width > 0.0 {
                model.column_widths.insert(col, width);
            }
        }
    }
    for row in 1..=model.rows {
        if let Some(dim) = ws.get_row_dimension(&row) {
            let height = *dim.get_height();
            if height > 0.0 {
                model.row_heights.insert(row, height);
            }
        }
    }

    model.drawings = drawing::lower_drawings(ws);

    model
}

fn lower_cell(ws: &Worksheet, cell: &Cell, row: u32, col: u32) -> CellModel {
    let cell_style = cell.get_style();
    let format_code = cell_style
        .get_number_format()
        .map(|nf| nf.get_format_code().to_string());

    let mut model = CellModel {
        value: value::lower_value(cell, format_code.as_deref()),
        display: ws.get_formatted_value((col, row)),
        style: style::lower_style(cell_style),
        rich_runs: lower_rich_runs(cell),
        ..Default::default()
    };

    if cell.is_formula() {
        model.formula = Some(cell.get_formula().to_string());
    }
    if let Some(hyperlink) = cell.get_hyperlink() {
        let url = hyperlink.get_url();
        if !url.is_empty() {
            model.hyperlink = Some(url.to_string());
        }
    }

    model
}

/// Rich runs are lowered text-only; per-run formatting stays behind until the
/// document library exposes run properties on its read path.
fn lower_rich_runs(cell: &Cell) -> Vec<RichRunModel> {
    let CellRawValue::RichText(rt) = cell.get_cell_value().get_raw_value() else {
        return Vec::new();
    };
    rt.get_rich_text_elements()
        .iter()
        .map(|el| RichRunModel {
            text: el.get_text().to_string(),
            bold: None,
            italic: None,
            color: None,
        })
        .collect()
}
