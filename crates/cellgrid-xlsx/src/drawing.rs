//! Drawing lowering: anchored pictures into engine drawing objects
//!
//! The document library exposes pictures through one-cell and two-cell
//! anchors whose markers are 0-based; the engine model is 1-based throughout,
//! so markers shift by one on both axes here and nowhere else.

use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;
use umya_spreadsheet::{Image, Worksheet};

use cellgrid_core::record::FloatingKind;
use cellgrid_engine::{AnchorMarker, DrawingObject};

fn lower_marker(marker: &MarkerType) -> AnchorMarker {
    AnchorMarker {
        row: *marker.get_row() + 1,
        col: *marker.get_col() + 1,
        row_off_emu: *marker.get_row_off() as i64,
        col_off_emu: *marker.get_col_off() as i64,
    }
}

/// Lower one anchored picture. Pictures with no usable anchor are dropped
/// with a log line rather than guessed at.
pub fn lower_image(image: &Image) -> Option<DrawingObject> {
    let data = image.get_image_data().to_vec();
    let name = image.get_image_name().to_string();

    if let Some(anchor) = image.get_two_cell_anchor() {
        return Some(DrawingObject {
            kind: FloatingKind::Picture,
            name,
            text: None,
            from: lower_marker(anchor.get_from_marker()),
            to: Some(lower_marker(anchor.get_to_marker())),
            extent_emu: None,
            data: Some(data),
            natural_px: None,
        });
    }

    if let Some(anchor) = image.get_one_cell_anchor() {
        let extent = anchor.get_extent();
        return Some(DrawingObject {
            kind: FloatingKind::Picture,
            name,
            text: None,
            from: lower_marker(anchor.get_from_marker()),
            to: None,
            extent_emu: Some((*extent.get_cx(), *extent.get_cy())),
            data: Some(data),
            natural_px: None,
        });
    }

    log::debug!("picture '{}' carries no anchor; dropped", name);
    None
}

/// Lower every anchored picture on a worksheet.
pub fn lower_drawings(ws: &Worksheet) -> Vec<DrawingObject> {
    ws.get_image_collection()
        .iter()
        .filter_map(lower_image)
        .collect()
}
