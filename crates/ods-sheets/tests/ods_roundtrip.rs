//! End-to-end tests for ODS roundtrip (create -> save -> read -> verify)

use ods_sheets::prelude::*;
use ods_sheets::SheetNames;
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// 1x1 grayscale PNG
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A, 0x7E, 0x9B,
    0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x01, 0x48, 0xAF, 0xA4, 0x71, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

fn roundtrip(book: &Book) -> Book {
    let mut buf = Vec::new();
    OdsWriter::write(book, Cursor::new(&mut buf)).unwrap();
    OdsReader::read(Cursor::new(&buf)).unwrap()
}

/// Test sheet names and order
#[test]
fn test_roundtrip_sheets() {
    let mut book = Book::new();
    book.create_sheet("First").unwrap();
    book.create_sheet("Second sheet").unwrap();
    book.create_sheet("Third").unwrap();

    let read = roundtrip(&book);
    let names: Vec<&str> = read.sheets().map(|s| s.name()).collect();
    assert_eq!(names, vec!["First", "Second sheet", "Third"]);

    let second = read.sheet_by_name("Second sheet").unwrap();
    assert_eq!(read.sheet_index(second.id()), Some(1));
}

/// Test values at their row and column indices
#[test]
fn test_roundtrip_values() {
    let mut book = Book::new();
    let sheet = book.create_sheet("Values").unwrap();
    let row = sheet.create_row(0).unwrap();
    row.create_cell(0).unwrap().set_value(42.0);
    row.create_cell(2).unwrap().set_value(-100.5);
    row.create_cell(5).unwrap().set_value("Special: <>&\"'");

    let row = sheet.create_row(3).unwrap();
    row.create_cell(1).unwrap().set_value("Multi\nLine");
    row.create_cell(2).unwrap().set_value("  two  spaces\tand a tab ");
    row.create_cell(3).unwrap().set_percentage_value(0.8, 2);
    let date = Value::parse_date_time("2024-02-29T13:45:00").unwrap();
    row.create_cell(4).unwrap().set_value(date);

    let read = roundtrip(&book);
    let sheet = read.sheet(0).unwrap();
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.cell(0, 0).unwrap().value(), &Value::Double(42.0));
    assert!(sheet.cell(0, 1).is_none());
    assert_eq!(sheet.cell(0, 2).unwrap().value(), &Value::Double(-100.5));
    assert_eq!(
        sheet.cell(0, 5).unwrap().value(),
        &Value::text("Special: <>&\"'")
    );
    assert!(sheet.row(1).is_none());

    assert_eq!(sheet.cell(3, 1).unwrap().value(), &Value::text("Multi\nLine"));
    assert_eq!(
        sheet.cell(3, 2).unwrap().value(),
        &Value::text("  two  spaces\tand a tab ")
    );
    let pct = sheet.cell(3, 3).unwrap();
    assert_eq!(pct.value(), &Value::Double(0.8));
    assert_eq!(pct.display_text(), "80.00%");
    assert_eq!(sheet.cell(3, 4).unwrap().value(), &Value::DateTime(date));
}

/// Test formulas on one sheet and across sheets
#[test]
fn test_roundtrip_formulas() {
    let mut book = Book::new();
    let data_id = book.create_sheet("Data").unwrap().id();
    let data = book.sheet_by_id_mut(data_id).unwrap();
    let row = data.create_row(0).unwrap();
    let a1 = row.create_cell(0).unwrap().set_value(15).cell_ref();
    let a2 = row.create_cell(1).unwrap().set_value(2).cell_ref();

    let mut local = Formula::new();
    local
        .add(Grouping::Open)
        .add(a1)
        .add(Op::Add)
        .add(a2)
        .add(Grouping::Close)
        .add(Op::Multiply)
        .add(15);
    local.set_value(255);
    row.create_cell(2).unwrap().set_formula(local);

    let summary = book.create_sheet("Summary").unwrap();
    let mut cross = Formula::new();
    cross.add(a1.on(data_id)).add(Op::Divide).add(2.5);
    summary
        .create_row(0)
        .unwrap()
        .create_cell(0)
        .unwrap()
        .set_formula(cross);

    let read = roundtrip(&book);
    let data = read.sheet_by_name("Data").unwrap();
    let cell = data.cell(0, 2).unwrap();
    assert!(cell.has_formula());
    assert_eq!(cell.value(), &Value::Double(255.0));
    assert_eq!(
        cell.formula().unwrap().to_odf(data.id(), &read).unwrap(),
        "of:=([.A1]+[.B1])*15"
    );

    let summary = read.sheet_by_name("Summary").unwrap();
    let formula = summary.cell(0, 0).unwrap().formula().unwrap();
    assert!(!formula.has_error());
    assert_eq!(
        formula.to_odf(summary.id(), &read).unwrap(),
        "of:=[$Data.A1]/2.5"
    );
    assert_eq!(read.sheet_id("Data"), Some(data.id()));
}

/// Test style property bags, widths, heights and spans
#[test]
fn test_roundtrip_layout_and_styles() {
    let mut book = Book::new();
    let title = book.create_cell_style();
    {
        let style = book.style_mut(title).unwrap();
        style
            .set_font_name("Verdana")
            .set_font_size(20.0)
            .set_bold(true)
            .set_italic(true)
            .set_text_color(Color::RED)
            .set_background(Color::YELLOW)
            .set_h_align(HAlign::Center)
            .set_v_align(VAlign::Middle)
            .set_wrap(true);
        let mut border = Border::new();
        border
            .set_color(Color::BLUE)
            .set_width(BorderWidth::Medium)
            .set_sides(BorderSides::TOP | BorderSides::LEFT);
        style.set_border(&border);
    }
    let expected = book.style(title).unwrap().properties().clone();

    let sheet = book.create_sheet("Layout").unwrap();
    sheet.set_column_width(0, Length::cm(5.0)).unwrap();
    sheet.set_column_width(3, Length::inches(0.5)).unwrap();

    let row = sheet.create_row(0).unwrap();
    row.set_optimal_height_style();
    row.create_cell(0)
        .unwrap()
        .set_value("Title")
        .set_style(title)
        .set_row_col_span(2, 4)
        .unwrap();
    let row = sheet.create_row(2).unwrap();
    row.set_height(Length::cm(1.5));
    row.create_cell(3).unwrap().set_value(1);

    let read = roundtrip(&book);
    let sheet = read.sheet(0).unwrap();
    assert_eq!(sheet.column_width(0), Some(Length::cm(5.0)));
    assert_eq!(sheet.column_width(1), None);
    assert_eq!(sheet.column_width(3), Some(Length::inches(0.5)));

    assert_eq!(sheet.row(0).unwrap().height(), RowHeight::Optimal);
    assert_eq!(
        sheet.row(2).unwrap().height(),
        RowHeight::Explicit(Length::cm(1.5))
    );

    let anchor = sheet.cell(0, 0).unwrap();
    assert_eq!((anchor.row_span(), anchor.col_span()), (2, 4));
    assert!(sheet.cell(0, 1).is_none());
    assert_eq!(sheet.covering_cell(1, 3).map(|c| c.cell_ref()), Some(anchor.cell_ref()));

    let style = read.style(anchor.style().unwrap()).unwrap();
    assert_eq!(style.properties(), &expected);
    assert_eq!(style.font_size(), Some(20.0));
}

/// Identical property bags collapse into one automatic style
#[test]
fn test_identical_styles_are_shared() {
    let mut book = Book::new();
    let first = book.create_cell_style();
    book.style_mut(first).unwrap().set_bold(true).set_text_color(Color::GREEN);
    let second = book.derive_style(first).unwrap();
    assert_ne!(first, second);

    let sheet = book.create_sheet("Sheet1").unwrap();
    let row = sheet.create_row(0).unwrap();
    row.create_cell(0).unwrap().set_value(1).set_style(first);
    row.create_cell(1).unwrap().set_value(2).set_style(second);

    let read = roundtrip(&book);
    let sheet = read.sheet(0).unwrap();
    let a = sheet.cell(0, 0).unwrap().style();
    let b = sheet.cell(0, 1).unwrap().style();
    assert!(a.is_some());
    assert_eq!(a, b);
    assert_eq!(read.styles().len(), 1);
}

/// Test images anchored to cells
#[test]
fn test_roundtrip_images() {
    let mut book = Book::new();
    let image = book.add_image(TINY_PNG.to_vec()).unwrap();
    let sheet = book.create_sheet("Pictures").unwrap();
    let cell = sheet.create_row(1).unwrap().create_cell(1).unwrap();
    cell.create_draw_frame(&image)
        .set_size(Size::new(Length::cm(2.0), Length::cm(4.0)))
        .set_offset(Point::new(Length::cm(0.5), Length::cm(0.0)));
    cell.create_draw_frame(&image);

    let read = roundtrip(&book);
    assert_eq!(read.media().len(), 1);
    let frames = read.sheet(0).unwrap().cell(1, 1).unwrap().draw_frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].size(), Size::new(Length::cm(2.0), Length::cm(4.0)));
    assert_eq!(frames[0].offset().x, Length::cm(0.5));
    assert_eq!(frames[1].size(), image.size);
    assert_eq!(frames[0].media(), frames[1].media());

    let media = read.media().get(frames[0].media()).unwrap();
    assert_eq!(media.mime_type(), "image/png");
    assert_eq!(media.bytes(), TINY_PNG);
}

/// Styled cells without a value keep their column and style
#[test]
fn test_roundtrip_styled_blank_cells() {
    let mut book = Book::new();
    let red = book.create_cell_style();
    book.style_mut(red).unwrap().set_background(Color::RED);
    let row = book.create_sheet("Sheet1").unwrap().create_row(0).unwrap();
    for col in 0..10 {
        row.create_cell(col).unwrap().set_style(red);
    }

    let read = roundtrip(&book);
    let row = read.sheet(0).unwrap().row(0).unwrap();
    assert_eq!(row.cell_count(), 10);
    assert_eq!(row.cells().last().map(|c| c.col()), Some(9));
    for cell in row.cells() {
        assert!(cell.value().is_unset());
        let style = read.style(cell.style().unwrap()).unwrap();
        assert_eq!(style.properties(), book.style(red).unwrap().properties());
    }
}

/// Column widths past the last cell survive on a sheet with no cells
#[test]
fn test_roundtrip_widths_without_cells() {
    let mut book = Book::new();
    let sheet = book.create_sheet("Sheet1").unwrap();
    sheet.set_column_width(0, Length::cm(5.0)).unwrap();
    sheet.set_column_width(3, Length::cm(5.0)).unwrap();
    sheet.set_column_width(4, Length::cm(5.0)).unwrap();

    let read = roundtrip(&book);
    let sheet = read.sheet(0).unwrap();
    let widths: Vec<u32> = sheet.column_widths().map(|(col, _)| col).collect();
    assert_eq!(widths, vec![0, 3, 4]);
    for col in [0, 3, 4] {
        assert!(sheet.column_width(col).unwrap().same_as(&Length::cm(5.0)));
    }
    assert_eq!(sheet.cells().count(), 0);
}

/// Save to disk and open again through the facade
#[test]
fn test_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.ods");

    let mut book = Book::new();
    book.create_sheet("Sheet1")
        .unwrap()
        .create_row(0)
        .unwrap()
        .create_cell(0)
        .unwrap()
        .set_value("Index 1, cell 1");
    book.save(&path).unwrap();
    assert!(path.exists());

    // Saving again replaces the file
    book.save(&path).unwrap();

    let read = Book::open(&path).unwrap();
    assert_eq!(
        read.sheet(0).unwrap().cell(0, 0).unwrap().value(),
        &Value::text("Index 1, cell 1")
    );
}
