//! # cellgrid-xlsx
//!
//! Adapter between `umya-spreadsheet` documents and the extraction engine.
//! This crate is the only place a document-library type appears; it lowers a
//! parsed workbook into a [`SheetModel`](cellgrid_engine::SheetModel) and
//! hands the rest to `cellgrid-engine`.

pub mod convert;
pub mod drawing;
pub mod style;
pub mod value;

pub use convert::{
    extract_path, load_bytes, load_path, sheet_model, sheet_model_by_name, sheet_names,
};
