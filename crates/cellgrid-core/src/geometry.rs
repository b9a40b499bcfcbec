//! Native length unit conversions
//!
//! Worksheets measure columns in character-width units, rows in points, and
//! drawing offsets in EMU (English Metric Units, 914400 per inch). The
//! presentation layer wants pixels. All conversions here are total functions
//! with document-default fallbacks.

/// EMU per pixel at 96 DPI
pub const EMU_PER_PX: i64 = 9525;

/// EMU per centimeter (914400 / 2.54)
pub const EMU_PER_CM: f64 = 360_000.0;

/// Approximate pixel width of one character-width unit at the default font
pub const PX_PER_CHAR: f64 = 7.0;

/// Default column width in character units when the sheet specifies none
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Default row height in points when the sheet specifies none
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Convert a column width (character units) to pixels
pub fn column_width_to_px(width: f64) -> f64 {
    width * PX_PER_CHAR
}

/// Convert a row height (points) to pixels at 96 DPI
pub fn row_height_to_px(height: f64) -> f64 {
    height * 4.0 / 3.0
}

/// Convert EMU to pixels
pub fn emu_to_px(emu: i64) -> f64 {
    emu as f64 / EMU_PER_PX as f64
}

/// Convert EMU to centimeters
pub fn emu_to_cm(emu: i64) -> f64 {
    emu as f64 / EMU_PER_CM
}

/// Convert pixels to EMU
pub fn px_to_emu(px: f64) -> i64 {
    (px * EMU_PER_PX as f64).round() as i64
}

/// Total EMU extent of an anchor spanning `from_index..=to_index`.
///
/// `size_emu` yields the full EMU size of one column (or row). The first
/// index contributes its size minus the from-offset, the last contributes the
/// to-offset, middle indices contribute their full size. When the span sits
/// inside a single index the extent is simply `to_off - from_off`.
pub fn span_extent_emu<F>(
    from_index: u32,
    from_off: i64,
    to_index: u32,
    to_off: i64,
    mut size_emu: F,
) -> i64
where
    F: FnMut(u32) -> i64,
{
    if from_index == to_index {
        return to_off - from_off;
    }

    let mut total = size_emu(from_index) - from_off;
    for index in (from_index + 1)..to_index {
        total += size_emu(index);
    }
    total + to_off
}

/// Rendered scale of an image as a percentage.
///
/// Mean of the displayed/natural ratios for width and height. A natural
/// dimension of zero contributes nothing rather than dividing by zero.
pub fn scale_percent(displayed: (f64, f64), natural: (f64, f64)) -> f64 {
    let mut sum = 0.0;
    let mut n = 0u32;
    if natural.0 > 0.0 {
        sum += displayed.0 / natural.0;
        n += 1;
    }
    if natural.1 > 0.0 {
        sum += displayed.1 / natural.1;
        n += 1;
    }
    if n == 0 {
        return 100.0;
    }
    sum / n as f64 * 100.0
}

/// Whether a scale deviates from 100% by more than one percentage point
pub fn is_scaled(scale: f64) -> bool {
    (scale - 100.0).abs() > 1.0
}
