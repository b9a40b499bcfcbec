//! # cellgrid-core
//!
//! Core data structures and pure algorithms for the cellgrid extraction
//! engine.
//!
//! This crate provides the leaf pieces the engine composes:
//! - [`CellPos`] and [`CellRange`] - 1-based cell addressing
//! - [`ColorRef`] and [`resolve_color`] - color descriptor resolution
//!   (direct RGB, legacy palette index, theme + tint)
//! - [`geometry`] - native length unit conversions (character widths,
//!   points, EMU) into pixels and centimeters
//! - [`imagesize`] - header-level image dimension sniffing
//! - [`CellRecord`] and friends - the normalized per-cell output model
//!
//! Everything here is pure: no I/O, no document-library types.

pub mod address;
pub mod color;
pub mod error;
pub mod geometry;
pub mod imagesize;
pub mod record;

// Re-exports for convenience
pub use address::{CellPos, CellRange};
pub use color::{resolve_color, resolve_color_cached, ColorCache, ColorRef};
pub use error::{Error, Result};
pub use record::{
    AlignmentInfo, BorderEdgeInfo, BorderInfo, CellImage, CellMeta, CellRecord, CellScalar,
    ColumnHeader, ContentKind, DataType, DimensionInfo, FloatingKind, FloatingObject, FontInfo,
    HorizontalAlign, RichRun, SheetGrid, StyleInfo, VerticalAlign,
};

/// Maximum number of rows in a worksheet (document format limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (document format limit)
pub const MAX_COLS: u32 = 16_384;
