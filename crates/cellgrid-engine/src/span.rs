//! Cross-cell spanning inference
//!
//! Anchored objects routinely cover more cells than the one they are anchored
//! in. When the owning cell carries no declared merge, the walk synthesizes
//! one from the object's anchor rectangle so the presentation layer reserves
//! the covered area. Declared merges are never overridden; an object poking
//! out of its merge is logged and left alone.

use cellgrid_core::record::CellRecord;
use cellgrid_core::{CellPos, CellRange};

use crate::sheet::{DrawingObject, SheetModel};

/// Apply spanning and text folding for the objects anchored at a record.
///
/// Returns the synthesized range, if one was created. At most one merge is
/// synthesized per cell; the first object whose rectangle covers more than
/// one cell wins and later objects only contribute text.
pub fn apply_spanning(
    sheet: &SheetModel,
    record: &mut CellRecord,
    objects: &[&DrawingObject],
    declared: Option<CellRange>,
) -> Option<CellRange> {
    let own = CellPos::new(record.row, record.col);
    let mut synthesized: Option<CellRange> = None;

    for obj in objects {
        let rect = obj.cell_rect();

        match declared {
            Some(merge) => {
                if merge.exceeded_by(&rect) {
                    log::debug!(
                        "object '{}' at {} spans {} beyond declared merge {}; keeping the merge",
                        obj.name,
                        own,
                        rect,
                        merge
                    );
                }
            }
            None => {
                if synthesized.is_none() && !rect.is_single_cell() {
                    // Anchor the synthesized range at the owning cell.
                    let range = CellRange::new(own, rect.end);
                    mark_merged(sheet, record, range);
                    synthesized = Some(range);
                }
            }
        }

        if !obj.is_picture() {
            fold_text(record, obj.text.as_deref());
        }
    }

    synthesized
}

/// Stamp a merged span onto a record as its main cell.
pub fn mark_merged(sheet: &SheetModel, record: &mut CellRecord, range: CellRange) {
    let dims = &mut record.dimensions;
    dims.is_merged = true;
    dims.is_main_merged_cell = range.start == CellPos::new(record.row, record.col);
    dims.row_span = range.row_span();
    dims.col_span = range.col_span();
    dims.merge_range = Some(range.to_a1_string());
    dims.width_px = (range.start.col..=range.end.col)
        .map(|c| sheet.column_width_px(c))
        .sum();
    dims.height_px = (range.start.row..=range.end.row)
        .map(|r| sheet.row_height_px(r))
        .sum();
    record.meta.start = range.start.to_a1_string();
    record.meta.end = range.end.to_a1_string();
}

/// Fold floating text into the record's display, newline-separated.
fn fold_text(record: &mut CellRecord, text: Option<&str>) {
    let Some(text) = text else { return };
    if text.is_empty() {
        return;
    }
    if record.display.is_empty() {
        record.display = text.to_string();
    } else {
        record.display.push('\n');
        record.display.push_str(text);
    }
}
