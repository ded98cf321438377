//! Demonstration books, one per feature of the library

use anyhow::{bail, Context, Result};
use ods_sheets::prelude::*;
use std::path::{Path, PathBuf};

/// 1x1 grayscale PNG used when no image is given
const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A, 0x7E, 0x9B,
    0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x01, 0x48, 0xAF, 0xA4, 0x71, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Write every lesson book into `dir` and return the paths written
pub fn write_all(dir: &Path, image: Option<&Path>) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create '{}'", dir.display()))?;

    let books: Vec<(&str, Book)> = vec![
        ("lesson01_column_widths.ods", column_widths()?),
        ("lesson02_value_types.ods", value_types()?),
        ("lesson03_fonts_and_styles.ods", fonts_and_styles()?),
        ("lesson04_alignment.ods", alignment()?),
        ("lesson05_borders.ods", borders()?),
        ("lesson06_cell_span.ods", cell_span()?),
        ("lesson07_images.ods", images(image)?),
        ("lesson09_one_sheet_formula.ods", one_sheet_formula()?),
        ("lesson10_cross_sheet_formula.ods", cross_sheet_formula()?),
    ];

    let mut written = Vec::with_capacity(books.len());
    for (name, book) in books {
        let path = dir.join(name);
        book.save(&path)
            .with_context(|| format!("Failed to save '{}'", path.display()))?;
        eprintln!("Wrote '{}'", path.display());
        written.push(path);
    }

    // Lesson 8 reads back the formula book of lesson 9
    let report = read_formula(&dir.join("lesson09_one_sheet_formula.ods"), 2, 3)?;
    eprintln!("Lesson 8: {}", report);
    Ok(written)
}

/// Lesson 1: cells at sparse columns and explicit column widths
pub fn column_widths() -> Result<Book> {
    let mut book = Book::new();
    let sheet = book.create_sheet("Sheet1")?;
    let row = sheet.create_row(0)?;
    row.create_cell(1)?.set_value("Index 1, cell 2");
    row.create_cell(6)?.set_value("Index 6, cell 7");

    // Widths must be set in ascending column order
    sheet.set_column_width(0, "5.0cm".parse()?)?;
    sheet.set_column_width(2, "0.5in".parse()?)?;
    sheet.set_column_width(7, "3.92in".parse()?)?;
    Ok(book)
}

/// Lesson 2: text, number and percentage cells
pub fn value_types() -> Result<Book> {
    let mut book = Book::new();
    let row = book.create_sheet("Sheet1")?.create_row(0)?;
    row.create_cell(0)?.set_value("string");
    row.create_cell(1)?.set_value(3.5);
    // 80.00%
    row.create_cell(2)?.set_percentage_value(0.8, 2);
    // 1720%
    row.create_cell(3)?.set_percentage_value(17.2, 0);
    Ok(book)
}

/// Lesson 3: fonts, a derived style and an optimal row height
pub fn fonts_and_styles() -> Result<Book> {
    let mut book = Book::new();
    let base = book.create_cell_style();
    style(&mut book, base)?
        .set_font_name("Verdana")
        .set_font_size(20.0)
        .set_text_color(Color::rgb(200, 0, 0));
    let yellow = book.derive_style(base)?;
    style(&mut book, yellow)?.set_background(Color::YELLOW);

    let row = book.create_sheet("name")?.create_row(0)?;
    row.create_cell(0)?.set_value("string").set_style(base);
    row.create_cell(1)?.set_value(3.5).set_style(yellow);
    row.set_optimal_height_style();
    Ok(book)
}

/// Lesson 4: horizontal alignment
pub fn alignment() -> Result<Book> {
    let mut book = Book::new();
    let center = book.create_cell_style();
    style(&mut book, center)?.set_h_align(HAlign::Center);
    let right = book.create_cell_style();
    style(&mut book, right)?.set_h_align(HAlign::Right);

    let row = book.create_sheet("name")?.create_row(0)?;
    row.create_cell(0)?.set_value("string").set_style(center);
    row.create_cell(1)?.set_value(3.5).set_style(right);
    Ok(book)
}

/// Lesson 5: a blue border all around and a derived green top border
pub fn borders() -> Result<Book> {
    let mut book = Book::new();

    let mut base = Border::new();
    base.set_color(Color::BLUE)
        .set_line_style(BorderLineStyle::Solid)
        .set_width(BorderWidth::Medium);
    let all_around = book.create_cell_style();
    style(&mut book, all_around)?.set_border(&base);

    let mut top = base.derive();
    top.set_sides(BorderSides::TOP)
        .set_color(Color::GREEN)
        .set_width(Length::inches(0.05));
    let top_only = book.create_cell_style();
    style(&mut book, top_only)?.set_border(&top);

    let row = book.create_sheet("name")?.create_row(1)?;
    row.create_cell(1)?.set_value("string").set_style(all_around);
    row.create_cell(5)?.set_value(3.5).set_style(top_only);
    Ok(book)
}

/// Lesson 6: one cell spanning 2 rows and 4 columns
pub fn cell_span() -> Result<Book> {
    let mut book = Book::new();
    let row = book.create_sheet("name")?.create_row(0)?;
    row.create_cell(0)?
        .set_value("string")
        .set_row_col_span(2, 4)?;
    Ok(book)
}

/// Lesson 7: an image anchored to a cell, resized and moved
pub fn images(image: Option<&Path>) -> Result<Book> {
    let mut book = Book::new();
    let handle = match image {
        Some(path) => book
            .load_image(path)
            .with_context(|| format!("Failed to load image '{}'", path.display()))?,
        None => book.add_image(SAMPLE_PNG.to_vec())?,
    };

    let cell = book.create_sheet("Sheet1")?.create_row(3)?.create_cell(2)?;
    cell.create_draw_frame(&handle)
        .set_size(Size::pixels(40, 80))
        .set_offset(Point::pixels(60, 0));
    Ok(book)
}

/// Lesson 8: the formula and cached value of a cell in a saved book
pub fn read_formula(path: &Path, row: u32, col: u32) -> Result<String> {
    let book =
        Book::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    let Some(sheet) = book.sheet(0) else {
        bail!("No sheet at 0");
    };
    let Some(cell) = sheet.cell(row, col) else {
        bail!("No cell at row {}, column {}", row, col);
    };
    let Some(formula) = cell.formula() else {
        bail!("Cell has no formula");
    };
    if let Some(error) = formula.error() {
        return Ok(format!("Formula not supported, error: {}", error));
    }

    let text = formula.to_odf(sheet.id(), &book)?;
    Ok(match formula.value() {
        Value::Unset => format!("{} has no cached value", text),
        Value::Double(n) => format!("{} = {} (double)", text, n),
        Value::Text(s) => format!("{} = {} (text)", text, s),
        Value::DateTime(dt) => format!("{} = {} (date/time)", text, dt),
    })
}

/// Lesson 9: `(B + C) * 2` on rows 3 to 10 of one sheet
pub fn one_sheet_formula() -> Result<Book> {
    let mut book = Book::new();
    let sheet = book.create_sheet("Sheet1")?;

    for i in 2..10u32 {
        let row = sheet.create_row(i)?;
        let first = row.create_cell(1)?.set_value(15).cell_ref();
        let second = row.create_cell(2)?.set_value(i).cell_ref();

        let mut formula = Formula::new();
        formula
            .add(Grouping::Open)
            .add(first)
            .add(Op::Add)
            .add(second)
            .add(Grouping::Close)
            .add(Op::Multiply)
            .add(2);
        formula.set_value((15 + i) * 2);
        row.create_cell(3)?.set_formula(formula);
    }
    Ok(book)
}

/// Lesson 10: `Sheet1.B1 = Sheet1.A1 + Sheet2.A1`
pub fn cross_sheet_formula() -> Result<Book> {
    let mut book = Book::new();
    let sheet1 = book.create_sheet("Sheet1")?.id();
    let sheet2 = book.create_sheet("Sheet2")?.id();

    let theirs = sheet_mut(&mut book, sheet2)?
        .create_row(0)?
        .create_cell(0)?
        .set_value(5)
        .cell_ref();

    let row = sheet_mut(&mut book, sheet1)?.create_row(0)?;
    let ours = row.create_cell(0)?.set_value(15).cell_ref();

    // References without a sheet point at the formula's own sheet
    let mut formula = Formula::new();
    formula.add(ours).add(Op::Add).add(theirs.on(sheet2));
    formula.set_value(20);
    row.create_cell(1)?.set_formula(formula);
    Ok(book)
}

fn style(book: &mut Book, id: StyleId) -> Result<&mut Style> {
    book.style_mut(id).context("style disappeared")
}

fn sheet_mut(book: &mut Book, id: ods_sheets::SheetId) -> Result<&mut Sheet> {
    book.sheet_by_id_mut(id).context("sheet disappeared")
}
