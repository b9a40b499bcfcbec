//! Write-then-extract tests against real workbook files

use pretty_assertions::assert_eq;

use cellgrid_core::record::{CellScalar, ContentKind, DataType};
use cellgrid_core::Error;
use cellgrid_engine::{extract_sheet, ExtractOptions};
use cellgrid_xlsx::{extract_path, load_bytes, sheet_model, sheet_model_by_name, sheet_names};

fn temp_workbook(book: &umya_spreadsheet::Spreadsheet) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("book.xlsx");
    umya_spreadsheet::writer::xlsx::write(book, &path).expect("write workbook");
    dir
}

#[test]
fn values_and_formulas_roundtrip() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
    sheet.get_cell_mut((1, 1)).set_value("Hello");
    sheet.get_cell_mut((2, 1)).set_value_number(42.0);
    sheet.get_cell_mut((3, 1)).set_value_number(1.5);
    sheet.get_cell_mut((4, 1)).set_formula("A1&\"!\"");

    let dir = temp_workbook(&book);
    let grid = extract_path(
        dir.path().join("book.xlsx"),
        None,
        &ExtractOptions::default(),
    )
    .expect("extract first sheet");

    assert_eq!(grid.name, "Sheet1");
    let a1 = grid.record_at(1, 1).unwrap();
    assert_eq!(a1.value, CellScalar::Text("Hello".into()));
    assert_eq!(a1.display, "Hello");
    assert_eq!(a1.meta.content, ContentKind::TextOnly);

    let b1 = grid.record_at(1, 2).unwrap();
    assert_eq!(b1.value, CellScalar::Int(42));
    assert_eq!(b1.data_type, DataType::Integer);

    let c1 = grid.record_at(1, 3).unwrap();
    assert_eq!(c1.value, CellScalar::Number(1.5));

    let d1 = grid.record_at(1, 4).unwrap();
    assert!(d1.meta.has_formula);
    assert_eq!(d1.formula.as_deref(), Some("A1&\"!\""));
}

#[test]
fn merged_range_roundtrip() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
    sheet.get_cell_mut((2, 2)).set_value("merged");
    sheet.add_merge_cells("B2:C3");

    let dir = temp_workbook(&book);
    let book = cellgrid_xlsx::load_path(dir.path().join("book.xlsx")).unwrap();
    let model = sheet_model(&book, 0).unwrap();
    assert_eq!(model.merges.len(), 1);
    assert_eq!(model.merges[0].to_a1_string(), "B2:C3");

    let grid = extract_sheet(&model, &ExtractOptions::default()).unwrap();
    let main = grid.record_at(2, 2).unwrap();
    assert!(main.dimensions.is_main_merged_cell);
    assert_eq!(main.dimensions.merge_range.as_deref(), Some("B2:C3"));
    assert!(grid.record_at(3, 3).is_none());
}

#[test]
fn sheet_selection_and_names() {
    let mut book = umya_spreadsheet::new_file();
    let _ = book.new_sheet("Data");
    book.get_sheet_by_name_mut("Data")
        .unwrap()
        .get_cell_mut((1, 1))
        .set_value("on data");

    let dir = temp_workbook(&book);
    let book = cellgrid_xlsx::load_path(dir.path().join("book.xlsx")).unwrap();

    assert_eq!(sheet_names(&book), vec!["Sheet1", "Data"]);

    let model = sheet_model_by_name(&book, "Data").unwrap();
    assert_eq!(model.name, "Data");
    assert_eq!(model.sheet_names, vec!["Sheet1", "Data"]);
    assert_eq!(
        model.cell(1, 1).unwrap().value,
        CellScalar::Text("on data".into())
    );

    let missing = sheet_model_by_name(&book, "Nope").unwrap_err();
    assert!(matches!(missing, Error::SheetNotFound(name) if name == "Nope"));
}

#[test]
fn comment_roundtrip() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
    sheet.get_cell_mut((2, 2)).set_value("noted");

    let mut element = umya_spreadsheet::TextElement::default();
    element.set_text("check this figure");
    let mut rich = umya_spreadsheet::RichText::default();
    rich.add_rich_text_elements(element);
    let mut comment = umya_spreadsheet::Comment::default();
    comment.get_coordinate_mut().set_col_num(2);
    comment.get_coordinate_mut().set_row_num(2);
    comment.get_text_mut().set_rich_text(rich);
    sheet.add_comments(comment);

    let dir = temp_workbook(&book);
    let book = cellgrid_xlsx::load_path(dir.path().join("book.xlsx")).unwrap();
    let model = sheet_model(&book, 0).unwrap();
    assert_eq!(
        model.cell(2, 2).unwrap().comment.as_deref(),
        Some("check this figure")
    );
}

#[test]
fn load_from_bytes() {
    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_by_name_mut("Sheet1")
        .unwrap()
        .get_cell_mut((1, 1))
        .set_value_number(7.0);

    let mut buf: Vec<u8> = Vec::new();
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut std::io::Cursor::new(&mut buf))
        .expect("write to buffer");

    let book = load_bytes(&buf).expect("read from buffer");
    let model = sheet_model(&book, 0).unwrap();
    assert_eq!(model.cell(1, 1).unwrap().value, CellScalar::Int(7));
}

#[test]
fn empty_sheet_reports_fatal_error() {
    let book = umya_spreadsheet::new_file();
    let dir = temp_workbook(&book);
    let err = extract_path(
        dir.path().join("book.xlsx"),
        None,
        &ExtractOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::EmptyWorksheet(_)));
}

#[test]
fn column_width_lowering() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
    sheet.get_cell_mut((1, 1)).set_value("x");
    sheet
        .get_column_dimension_by_number_mut(&1)
        .set_width(20.0);

    let dir = temp_workbook(&book);
    let book = cellgrid_xlsx::load_path(dir.path().join("book.xlsx")).unwrap();
    let model = sheet_model(&book, 0).unwrap();
    assert_eq!(model.column_width(1), 20.0);
    assert_eq!(model.column_width_px(1), 140.0);
}
