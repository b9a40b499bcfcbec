//! # cellgrid-engine
//!
//! The worksheet extraction engine: takes a lowered [`SheetModel`] from a
//! format adapter and emits a [`SheetGrid`](cellgrid_core::SheetGrid) of
//! normalized per-cell records.
//!
//! The pipeline per sheet:
//! 1. Build O(1) merge and drawing indexes ([`index`])
//! 2. Walk the dimensioned grid row-major ([`builder`])
//! 3. Per cell: classify content ([`classify`]), resolve styles and colors,
//!    attach images and floating objects, infer cross-cell spans ([`span`])
//!
//! A walk owns all of its mutable state; walking two sheets from two threads
//! needs no coordination.

pub mod builder;
pub mod classify;
pub mod index;
pub mod sheet;
pub mod span;

pub use builder::{extract_sheet, ExtractOptions, DEFAULT_MAX_DRAWING_PROBES};
pub use index::{DrawingIndex, MergeHit, MergeIndex};
pub use sheet::{
    AnchorMarker, BorderEdgeModel, BorderModel, CellModel, DrawingObject, InlineImage,
    RichRunModel, SheetModel, StyleModel,
};
