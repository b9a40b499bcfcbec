//! The worksheet walk: one pass, one record per visible cell
//!
//! The builder visits every cell of the dimensioned grid in row-major order
//! and assembles a [`CellRecord`] for each, skipping cells subsumed by a
//! merged range. All per-walk mutable state lives in a [`WalkContext`] owned
//! by the walk; nothing is shared between walks, so extracting two sheets
//! concurrently needs no synchronization.

use ahash::AHashSet;

use cellgrid_core::color::{resolve_color_cached, ColorCache};
use cellgrid_core::geometry::{emu_to_px, span_extent_emu};
use cellgrid_core::imagesize::{self, PLACEHOLDER_PX};
use cellgrid_core::record::{
    AlignmentInfo, BorderEdgeInfo, BorderInfo, CellImage, CellRecord, ColumnHeader, ContentKind,
    DataType, FloatingObject, FontInfo, RichRun, SheetGrid, StyleInfo,
};
use cellgrid_core::{CellPos, CellRange, Error, Result};

use crate::classify::classify;
use crate::index::{DrawingIndex, MergeIndex};
use crate::sheet::{BorderEdgeModel, DrawingObject, SheetModel, StyleModel};
use crate::span;

/// Default ceiling on per-walk drawing probes
pub const DEFAULT_MAX_DRAWING_PROBES: u32 = 50_000;

/// Tuning knobs for a walk
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum drawing objects processed in one walk. Sheets with runaway
    /// drawing counts degrade to partial results instead of stalling; once
    /// the ceiling is hit, remaining cells carry no images or floats.
    pub max_drawing_probes: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_drawing_probes: DEFAULT_MAX_DRAWING_PROBES,
        }
    }
}

/// Per-walk mutable state
#[derive(Debug, Default)]
struct WalkContext {
    /// Positions subsumed by an already-emitted merged cell; entries are
    /// consumed when the walk reaches them.
    exclusions: AHashSet<(u32, u32)>,
    probes_used: u32,
    drawings_disabled: bool,
    colors: ColorCache,
}

impl WalkContext {
    /// Account for one drawing probe. Returns false once the ceiling is hit;
    /// the first refusal logs, later ones are silent.
    fn allow_probe(&mut self, ceiling: u32) -> bool {
        if self.drawings_disabled {
            return false;
        }
        if self.probes_used >= ceiling {
            self.drawings_disabled = true;
            log::warn!(
                "drawing probe ceiling of {} reached; skipping remaining drawings",
                ceiling
            );
            return false;
        }
        self.probes_used += 1;
        true
    }
}

/// Walk a lowered worksheet and emit its grid of records.
///
/// Fails only for a sheet with no dimensioned area; any per-cell failure
/// degrades to a fallback record tagged [`DataType::Error`].
pub fn extract_sheet(sheet: &SheetModel, opts: &ExtractOptions) -> Result<SheetGrid> {
    if sheet.rows == 0 || sheet.cols == 0 {
        return Err(Error::EmptyWorksheet(sheet.name.clone()));
    }

    let merges = MergeIndex::build(&sheet.merges);
    let drawings = DrawingIndex::build(&sheet.drawings);
    let mut ctx = WalkContext::default();

    let columns = (1..=sheet.cols)
        .map(|col| ColumnHeader {
            name: CellPos::column_to_letters(col),
            index: col,
            width_px: sheet.column_width_px(col),
        })
        .collect();

    let mut rows = Vec::with_capacity(sheet.rows as usize);
    for row in 1..=sheet.rows {
        let mut records = Vec::new();
        for col in 1..=sheet.cols {
            if ctx.exclusions.remove(&(row, col)) {
                continue;
            }
            // Overlapping declared merges can leave a member unregistered;
            // never emit a record for a non-main member.
            if matches!(merges.lookup(row, col), Some(hit) if !hit.is_main) {
                continue;
            }

            let (record, covered) =
                match build_cell(sheet, &merges, &drawings, &mut ctx, opts, row, col) {
                    Ok(built) => built,
                    Err(err) => {
                        log::warn!(
                            "cell {} on '{}' failed to build: {}; emitting fallback",
                            CellPos::new(row, col),
                            sheet.name,
                            err
                        );
                        (fallback_record(sheet, row, col), None)
                    }
                };

            if let Some(range) = covered {
                register_exclusions(sheet, &mut ctx, row, col, range);
            }
            records.push(record);
        }
        rows.push(records);
    }

    Ok(SheetGrid {
        name: sheet.name.clone(),
        total_rows: sheet.rows,
        total_cols: sheet.cols,
        sheet_names: sheet.sheet_names.clone(),
        columns,
        rows,
    })
}

/// Mark every non-main cell of a merged range as subsumed.
///
/// Registration is clamped to the dimensioned grid and to positions the walk
/// has not reached yet; a malformed range can never poison earlier cells.
/// The bounds are clamped before iterating, so a range vastly larger than
/// the grid costs no more than the grid itself.
fn register_exclusions(
    sheet: &SheetModel,
    ctx: &mut WalkContext,
    row: u32,
    col: u32,
    range: CellRange,
) {
    let end_row = range.end.row.min(sheet.rows);
    let end_col = range.end.col.min(sheet.cols);
    for r in range.start.row..=end_row {
        for c in range.start.col..=end_col {
            let after_current = r > row || (r == row && c > col);
            if after_current {
                ctx.exclusions.insert((r, c));
            }
        }
    }
}

fn build_cell(
    sheet: &SheetModel,
    merges: &MergeIndex,
    drawings: &DrawingIndex,
    ctx: &mut WalkContext,
    opts: &ExtractOptions,
    row: u32,
    col: u32,
) -> Result<(CellRecord, Option<CellRange>)> {
    let cell = sheet.cell(row, col);
    let has_inline_image = cell.is_some_and(|c| c.image.is_some());
    let has_anchored_picture = drawings.has_picture_at(&sheet.drawings, row, col);
    let content = classify(cell, has_inline_image || has_anchored_picture);

    let mut record = CellRecord::at(row, col);
    record.meta.content = content;
    record.dimensions.column_width_px = sheet.column_width_px(col);
    record.dimensions.row_height_px = sheet.row_height_px(row);
    record.dimensions.width_px = record.dimensions.column_width_px;
    record.dimensions.height_px = record.dimensions.row_height_px;

    if let Some(cell) = cell {
        record.value = cell.value.clone();
        record.data_type = cell.value.data_type();
        record.display = cell.display.clone();
        record.formula = cell.formula.clone();
        record.comment = cell.comment.clone();
        record.hyperlink = cell.hyperlink.clone();
        record.meta.has_formula = cell.formula.is_some();
        record.meta.style_id = cell.style_id;
        record.rich_runs = cell
            .rich_runs
            .iter()
            .map(|run| RichRun {
                text: run.text.clone(),
                bold: run.bold,
                italic: run.italic,
                color: run
                    .color
                    .as_ref()
                    .and_then(|c| resolve_color_cached(c, &mut ctx.colors)),
            })
            .collect();
    }

    // Declared merge membership; only the main cell reaches this point.
    let declared = merges.lookup(row, col).map(|hit| hit.range);
    if let Some(range) = declared {
        span::mark_merged(sheet, &mut record, range);
    }

    // In-place pictures short-circuit the anchored lookup: a cell with an
    // embedded image never pulls anchored pictures on top of it.
    let mut used: Vec<&DrawingObject> = Vec::new();
    if let Some(inline) = cell.and_then(|c| c.image.as_ref()) {
        record.images.push(inline_image(row, col, &inline.name, &inline.data));
    } else {
        for &id in drawings.ids_at(row, col) {
            let obj = &sheet.drawings[id];
            if !obj.is_picture() {
                continue;
            }
            validate_anchor(obj)?;
            if !ctx.allow_probe(opts.max_drawing_probes) {
                break;
            }
            record.images.push(anchored_image(sheet, obj));
            used.push(obj);
        }
    }

    for &id in drawings.ids_at(row, col) {
        let obj = &sheet.drawings[id];
        if obj.is_picture() {
            continue;
        }
        validate_anchor(obj)?;
        if !ctx.allow_probe(opts.max_drawing_probes) {
            break;
        }
        record.floats.push(floating_object(sheet, obj));
        used.push(obj);
    }

    // Image-only cells keep the default style; borders, fills and alignment
    // belong to the picture's frame, not the record.
    if content != ContentKind::ImageOnly {
        if let Some(cell) = cell {
            record.style = resolve_style(&cell.style, &mut ctx.colors);
        }
    }

    let synthesized = span::apply_spanning(sheet, &mut record, &used, declared);
    let covered = declared.or(synthesized);

    Ok((record, covered))
}

/// Reject anchors a corrupt or hostile drawing part can carry.
///
/// Markers are 1-based; a zero index or an end corner past the format limits
/// means the adapter lowered garbage, and the owning cell degrades to a
/// fallback record rather than synthesizing an absurd span.
fn validate_anchor(obj: &DrawingObject) -> Result<()> {
    let bad_marker = |row: u32, col: u32| {
        row == 0 || col == 0 || row > cellgrid_core::MAX_ROWS || col > cellgrid_core::MAX_COLS
    };
    if bad_marker(obj.from.row, obj.from.col)
        || obj.to.is_some_and(|to| bad_marker(to.row, to.col))
    {
        return Err(Error::InvalidRange(format!(
            "drawing '{}' anchor lies outside the grid",
            obj.name
        )));
    }
    Ok(())
}

/// A degraded record standing in for a cell that failed to build.
///
/// Classified Mixed so the presentation layer prefers doing more work over
/// silently dropping content it could not inspect.
fn fallback_record(sheet: &SheetModel, row: u32, col: u32) -> CellRecord {
    let mut record = CellRecord::at(row, col);
    if let Some(cell) = sheet.cell(row, col) {
        record.value = cell.value.clone();
        record.display = cell.display.clone();
    }
    record.data_type = DataType::Error;
    record.meta.content = ContentKind::Mixed;
    record.dimensions.column_width_px = sheet.column_width_px(col);
    record.dimensions.row_height_px = sheet.row_height_px(row);
    record.dimensions.width_px = record.dimensions.column_width_px;
    record.dimensions.height_px = record.dimensions.row_height_px;
    record
}

/// Resolve a raw style descriptor into presentation-ready values.
fn resolve_style(style: &StyleModel, colors: &mut ColorCache) -> StyleInfo {
    let defaults = FontInfo::default();
    let font = FontInfo {
        name: style.font_name.clone().unwrap_or(defaults.name),
        size: style.font_size.unwrap_or(defaults.size),
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        strikethrough: style.strikethrough,
        color: style
            .font_color
            .as_ref()
            .and_then(|c| resolve_color_cached(c, colors)),
    };

    let border = BorderInfo {
        left: resolve_edge(style.borders.left.as_ref(), colors),
        right: resolve_edge(style.borders.right.as_ref(), colors),
        top: resolve_edge(style.borders.top.as_ref(), colors),
        bottom: resolve_edge(style.borders.bottom.as_ref(), colors),
    };

    StyleInfo {
        font,
        alignment: AlignmentInfo {
            horizontal: style.horizontal,
            vertical: style.vertical,
            wrap_text: style.wrap_text,
        },
        border,
        fill_color: style
            .fill_color
            .as_ref()
            .and_then(|c| resolve_color_cached(c, colors)),
    }
}

fn resolve_edge(
    edge: Option<&BorderEdgeModel>,
    colors: &mut ColorCache,
) -> Option<BorderEdgeInfo> {
    edge.map(|e| BorderEdgeInfo {
        style: e.style.clone(),
        color: e
            .color
            .as_ref()
            .and_then(|c| resolve_color_cached(c, colors)),
    })
}

/// Image record for an in-place picture: displayed at natural size.
fn inline_image(row: u32, col: u32, name: &str, data: &[u8]) -> CellImage {
    let sniffed = imagesize::sniff(data);
    let (nw, nh) = sniffed
        .map(|(_, w, h)| (w, h))
        .unwrap_or((PLACEHOLDER_PX, PLACEHOLDER_PX));
    CellImage {
        name: name.to_string(),
        format: sniffed.map(|(f, _, _)| f.as_str().to_string()),
        width_px: nw as f64,
        height_px: nh as f64,
        natural_width_px: nw as f64,
        natural_height_px: nh as f64,
        scale_percent: 100.0,
        is_scaled: false,
        anchor: CellRange::single(CellPos::new(row, col)),
    }
}

/// Image record for an anchored picture: displayed size from the anchor.
fn anchored_image(sheet: &SheetModel, obj: &DrawingObject) -> CellImage {
    let sniffed = obj.data.as_deref().and_then(imagesize::sniff);
    let (nw, nh) = obj
        .natural_px
        .or(sniffed.map(|(_, w, h)| (w, h)))
        .unwrap_or((PLACEHOLDER_PX, PLACEHOLDER_PX));
    let natural = (nw as f64, nh as f64);
    let displayed = displayed_px(sheet, obj).unwrap_or(natural);
    let scale = cellgrid_core::geometry::scale_percent(displayed, natural);

    CellImage {
        name: obj.name.clone(),
        format: sniffed.map(|(f, _, _)| f.as_str().to_string()),
        width_px: displayed.0,
        height_px: displayed.1,
        natural_width_px: natural.0,
        natural_height_px: natural.1,
        scale_percent: scale,
        is_scaled: cellgrid_core::geometry::is_scaled(scale),
        anchor: obj.cell_rect(),
    }
}

fn floating_object(sheet: &SheetModel, obj: &DrawingObject) -> FloatingObject {
    let displayed = displayed_px(sheet, obj).unwrap_or((0.0, 0.0));
    FloatingObject {
        kind: obj.kind,
        name: obj.name.clone(),
        text: obj.text.clone(),
        anchor: obj.cell_rect(),
        width_px: displayed.0,
        height_px: displayed.1,
    }
}

/// Displayed pixel size from the anchor geometry, when it carries one.
fn displayed_px(sheet: &SheetModel, obj: &DrawingObject) -> Option<(f64, f64)> {
    if let Some(to) = obj.to {
        let w_emu = span_extent_emu(
            obj.from.col,
            obj.from.col_off_emu,
            to.col,
            to.col_off_emu,
            |c| sheet.column_width_emu(c),
        );
        let h_emu = span_extent_emu(
            obj.from.row,
            obj.from.row_off_emu,
            to.row,
            to.row_off_emu,
            |r| sheet.row_height_emu(r),
        );
        return Some((emu_to_px(w_emu.max(0)), emu_to_px(h_emu.max(0))));
    }
    obj.extent_emu
        .map(|(cx, cy)| (emu_to_px(cx), emu_to_px(cy)))
}
