//! ODS writer

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::OdsResult;
use crate::package::PackageWriter;
use crate::styles::{AutomaticStyles, DEFAULT_CELL_STYLE, TABLE_STYLE};
use ods_sheets_core::style::{StyleFamily, StyleProperties};
use ods_sheets_core::tag::Tag;
use ods_sheets_core::{
    Book, Cell, CellContent, DrawFrame, Length, NumberFormat, Row, RowHeight, Sheet, StyleId,
    Value,
};

mod text;

use text::paragraphs;

/// ODS file writer
pub struct OdsWriter;

impl OdsWriter {
    /// Write a book to a file path
    ///
    /// The package is written to a temporary file next to `path` and moved
    /// over it only once complete, so a failed save leaves no partial file.
    pub fn write_file<P: AsRef<Path>>(book: &Book, path: P) -> OdsResult<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        Self::write(book, temp.as_file_mut())?;
        temp.as_file().sync_all()?;
        temp.persist(path)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    /// Write a book to a writer
    pub fn write<W: Write + Seek>(book: &Book, writer: W) -> OdsResult<()> {
        // Nothing is written when a span hides another cell
        for sheet in book.sheets() {
            sheet.check_spans()?;
        }

        let mut styles = AutomaticStyles::new();
        let mut spreadsheet = Tag::new("office:spreadsheet");
        for sheet in book.sheets() {
            let table = SheetWriter::new(book, sheet, &mut styles).table()?;
            spreadsheet.push_child(table);
        }
        log::debug!("{} automatic cell styles", styles.cell_style_count());

        let mut content = Tag::new("office:document-content");
        content.set_attr("office:version", "1.2");
        content.push_child(styles.font_face_decls());
        content.push_child(styles.to_tag());
        content.create_child("office:body").push_child(spreadsheet);

        let mut package = PackageWriter::new(writer)?;
        package.add_xml("content.xml", &content)?;
        package.add_xml("styles.xml", &document_styles(book))?;
        package.add_xml("meta.xml", &document_meta())?;
        for (_, media) in book.media().iter() {
            package.add_file(&media.package_path(), media.bytes(), media.mime_type())?;
        }
        package.finish()?;
        Ok(())
    }
}

/// `styles.xml`: defaults, the common cell style and the page layout
fn document_styles(book: &Book) -> Tag {
    let settings = book.settings();
    let mut root = Tag::new("office:document-styles");
    root.set_attr("office:version", "1.2");

    let common = root.create_child("office:styles");

    let column = common.create_child("style:default-style");
    column.set_attr("style:family", StyleFamily::TableColumn.to_odf());
    column
        .create_child("style:table-column-properties")
        .set_attr("style:column-width", settings.default_column_width.to_string());

    let row = common.create_child("style:default-style");
    row.set_attr("style:family", StyleFamily::TableRow.to_odf());
    row.create_child("style:table-row-properties")
        .set_attr("style:row-height", settings.default_row_height.to_string())
        .set_attr("style:use-optimal-row-height", "true");

    let cell = common.create_child("style:default-style");
    cell.set_attr("style:family", StyleFamily::TableCell.to_odf());
    cell.create_child("style:text-properties")
        .set_attr("fo:font-size", Length::pt(settings.default_font_size).to_string());

    common
        .create_child("style:style")
        .set_attr("style:name", DEFAULT_CELL_STYLE)
        .set_attr("style:family", StyleFamily::TableCell.to_odf());

    let layout = root
        .create_child("office:automatic-styles")
        .create_child("style:page-layout");
    layout.set_attr("style:name", "pm1");
    layout
        .create_child("style:page-layout-properties")
        .set_attr("style:writing-mode", "lr-tb");

    root.create_child("office:master-styles")
        .create_child("style:master-page")
        .set_attr("style:name", "Default")
        .set_attr("style:page-layout-name", "pm1");
    root
}

fn document_meta() -> Tag {
    let mut root = Tag::new("office:document-meta");
    root.set_attr("office:version", "1.2");
    let meta = root.create_child("office:meta");
    meta.create_child("meta:generator")
        .set_text(concat!("ods-sheets/", env!("CARGO_PKG_VERSION")));
    meta.create_child("meta:creation-date")
        .set_text(chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string());
    root
}

/// What sits at one column of a written row
enum Slot<'a> {
    Cell(&'a Cell),
    Covered,
}

/// Builds the `table:table` element of one sheet
struct SheetWriter<'a> {
    book: &'a Book,
    sheet: &'a Sheet,
    styles: &'a mut AutomaticStyles,
    /// Cells spanning more than one slot
    anchors: Vec<&'a Cell>,
    frame_count: usize,
}

impl<'a> SheetWriter<'a> {
    fn new(book: &'a Book, sheet: &'a Sheet, styles: &'a mut AutomaticStyles) -> Self {
        let anchors = sheet.cells().filter(|c| c.is_spanning()).collect();
        Self {
            book,
            sheet,
            styles,
            anchors,
            frame_count: 0,
        }
    }

    fn table(mut self) -> OdsResult<Tag> {
        let mut table = Tag::new("table:table");
        table
            .set_attr("table:name", self.sheet.name())
            .set_attr("table:style-name", TABLE_STYLE);

        self.write_columns(&mut table);

        let mut next = 0u32;
        for index in self.row_indices() {
            if index > next {
                table.push_child(self.empty_rows(index - next));
            }
            let row = self.write_row(index, self.sheet.row(index))?;
            table.push_child(row);
            next = index + 1;
        }
        if next == 0 {
            table.push_child(self.empty_rows(1));
        }

        log::debug!(
            "sheet '{}': {} rows written",
            self.sheet.name(),
            self.sheet.row_count()
        );
        Ok(table)
    }

    /// Created rows plus rows reached only by a span
    fn row_indices(&self) -> BTreeSet<u32> {
        let mut rows: BTreeSet<u32> = self.sheet.rows().map(|r| r.index()).collect();
        for anchor in &self.anchors {
            let end = anchor.row().saturating_add(anchor.row_span());
            rows.extend(anchor.row() + 1..end);
        }
        rows
    }

    /// Column runs of equal width, gaps filled with the default width
    fn write_columns(&mut self, table: &mut Tag) {
        let default = self.book.settings().default_column_width;
        let used = self.sheet.used_columns().max(1);

        let mut runs: Vec<(Length, u32)> = Vec::new();
        let mut next = 0u32;
        for (col, width) in self.sheet.column_widths() {
            push_run(&mut runs, default, col - next);
            push_run(&mut runs, width, 1);
            next = col + 1;
        }
        push_run(&mut runs, default, used.saturating_sub(next));

        for (width, count) in runs {
            let column = table.create_child("table:table-column");
            column.set_attr("table:style-name", self.styles.column_style(width));
            if count > 1 {
                column.set_attr("table:number-columns-repeated", count.to_string());
            }
            column.set_attr("table:default-cell-style-name", DEFAULT_CELL_STYLE);
        }
    }

    fn default_row_style(&mut self) -> String {
        let height = self.book.settings().default_row_height;
        self.styles.row_style(height, true)
    }

    fn empty_rows(&mut self, count: u32) -> Tag {
        let mut row = Tag::new("table:table-row");
        row.set_attr("table:style-name", self.default_row_style());
        if count > 1 {
            row.set_attr("table:number-rows-repeated", count.to_string());
        }
        row.create_child("table:table-cell");
        row
    }

    fn write_row(&mut self, index: u32, row: Option<&'a Row>) -> OdsResult<Tag> {
        let mut tag = Tag::new("table:table-row");

        let style_name = match row {
            None => self.default_row_style(),
            Some(row) => {
                let book = self.book;
                let (height, optimal) = match row.height() {
                    RowHeight::Default => (book.settings().default_row_height, true),
                    RowHeight::Explicit(h) => (h, false),
                    RowHeight::Optimal => (row.resolved_height(book.styles(), book.settings()), true),
                };
                self.styles.row_style(height, optimal)
            }
        };
        tag.set_attr("table:style-name", style_name);

        let row_props = row.and_then(|r| r.style()).and_then(|id| self.cell_properties(id));
        if let Some(props) = &row_props {
            if let Some(name) = self.styles.cell_style(props, NumberFormat::General) {
                tag.set_attr("table:default-cell-style-name", name);
            }
        }

        let slots = self.slots(index, row);
        let mut next = 0u32;
        let mut slots = slots.into_iter().peekable();
        while let Some((col, slot)) = slots.next() {
            if col > next {
                tag.push_child(repeated("table:table-cell", col - next));
            }
            match slot {
                Slot::Cell(cell) => {
                    let cell_tag = self.write_cell(cell, row_props.as_ref())?;
                    tag.push_child(cell_tag);
                    next = col + 1;
                }
                Slot::Covered => {
                    let mut count = 1;
                    while let Some((c, Slot::Covered)) = slots.peek() {
                        if *c != col + count {
                            break;
                        }
                        count += 1;
                        slots.next();
                    }
                    tag.push_child(repeated("table:covered-table-cell", count));
                    next = col + count;
                }
            }
        }
        if next == 0 {
            tag.create_child("table:table-cell");
        }
        Ok(tag)
    }

    /// Cells and covered slots of a row, by column
    fn slots(&self, index: u32, row: Option<&'a Row>) -> BTreeMap<u32, Slot<'a>> {
        let mut slots = BTreeMap::new();
        for anchor in &self.anchors {
            let rows = anchor.row()..anchor.row().saturating_add(anchor.row_span());
            if !rows.contains(&index) {
                continue;
            }
            let end = anchor.col().saturating_add(anchor.col_span());
            for col in anchor.col()..end {
                if anchor.covers(index, col) {
                    slots.insert(col, Slot::Covered);
                }
            }
        }
        if let Some(row) = row {
            for cell in row.cells() {
                slots.insert(cell.col(), Slot::Cell(cell));
            }
        }
        slots
    }

    /// Property bag of a table-cell style, `None` for other families
    fn cell_properties(&self, id: StyleId) -> Option<StyleProperties> {
        match self.book.style(id) {
            Some(style) if style.family() == StyleFamily::TableCell => {
                Some(style.properties().clone())
            }
            Some(style) => {
                log::warn!(
                    "style '{}' is a {} style, not applied to a cell",
                    style.name(),
                    style.family().to_odf()
                );
                None
            }
            None => {
                log::warn!("unknown style id {}", id.index());
                None
            }
        }
    }

    fn write_cell(&mut self, cell: &Cell, row_props: Option<&StyleProperties>) -> OdsResult<Tag> {
        let mut tag = Tag::new("table:table-cell");

        let format = cell.number_format();
        let props = match cell.style().and_then(|id| self.cell_properties(id)) {
            Some(props) => Some(props),
            // A cell-level data style would hide the row's default style
            None if format != NumberFormat::General => {
                Some(row_props.cloned().unwrap_or_default())
            }
            None => None,
        };
        if let Some(props) = props {
            if let Some(name) = self.styles.cell_style(&props, format) {
                tag.set_attr("table:style-name", name);
            }
        }

        if cell.is_spanning() {
            tag.set_attr("table:number-columns-spanned", cell.col_span().to_string());
            tag.set_attr("table:number-rows-spanned", cell.row_span().to_string());
        }

        match cell.content() {
            CellContent::Empty => {}
            CellContent::Value(value) => value_attrs(&mut tag, value, format),
            CellContent::Formula(formula) => {
                value_attrs(&mut tag, formula.value(), format);
                let text = formula.to_odf(self.sheet.id(), self.book)?;
                tag.set_attr("table:formula", text);
            }
        }

        for frame in cell.draw_frames() {
            if let Some(frame_tag) = self.write_frame(frame) {
                tag.push_child(frame_tag);
            }
        }
        if !cell.value().is_unset() {
            for p in paragraphs(&cell.display_text()) {
                tag.push_child(p);
            }
        }
        Ok(tag)
    }

    fn write_frame(&mut self, frame: &DrawFrame) -> Option<Tag> {
        let Some(media) = self.book.media().get(frame.media()) else {
            log::warn!("draw frame refers to a missing image");
            return None;
        };
        self.frame_count += 1;

        let mut tag = Tag::new("draw:frame");
        tag.set_attr(
            "draw:name",
            format!("{} Image {}", self.sheet.name(), self.frame_count),
        )
        .set_attr("draw:z-index", (self.frame_count - 1).to_string())
        .set_attr("svg:width", frame.size().width.to_string())
        .set_attr("svg:height", frame.size().height.to_string())
        .set_attr("svg:x", frame.offset().x.to_string())
        .set_attr("svg:y", frame.offset().y.to_string());
        tag.create_child("draw:image")
            .set_attr("xlink:href", media.package_path())
            .set_attr("xlink:type", "simple")
            .set_attr("xlink:show", "embed")
            .set_attr("xlink:actuate", "onLoad");
        Some(tag)
    }
}

fn push_run(runs: &mut Vec<(Length, u32)>, width: Length, count: u32) {
    if count == 0 {
        return;
    }
    match runs.last_mut() {
        Some((w, c)) if *w == width => *c += count,
        _ => runs.push((width, count)),
    }
}

fn repeated(name: &str, count: u32) -> Tag {
    let mut tag = Tag::new(name);
    if count > 1 {
        tag.set_attr("table:number-columns-repeated", count.to_string());
    }
    tag
}

fn value_attrs(tag: &mut Tag, value: &Value, format: NumberFormat) {
    match value {
        Value::Unset => {}
        Value::Double(n) => {
            let kind = match format {
                NumberFormat::Percentage { .. } => "percentage",
                NumberFormat::General => "float",
            };
            tag.set_attr("office:value-type", kind)
                .set_attr("office:value", n.to_string());
        }
        Value::Text(_) => {
            tag.set_attr("office:value-type", "string");
        }
        Value::DateTime(dt) => {
            tag.set_attr("office:value-type", "date")
                .set_attr("office:date-value", Value::format_date_time(dt));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageReader;
    use ods_sheets_core::{Color, Formula, Op};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn write(book: &Book) -> PackageReader<Cursor<Vec<u8>>> {
        let mut out = Cursor::new(Vec::new());
        OdsWriter::write(book, &mut out).unwrap();
        out.set_position(0);
        PackageReader::new(out).unwrap()
    }

    fn first_table(content: &Tag) -> &Tag {
        content
            .find_child("office:body")
            .and_then(|b| b.find_child("office:spreadsheet"))
            .and_then(|s| s.find_child("table:table"))
            .unwrap()
    }

    fn names(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(|t| t.name().to_string()).collect()
    }

    #[test]
    fn test_package_parts() {
        let mut book = Book::new();
        book.create_sheet("Sheet1").unwrap();
        let mut package = write(&book);

        assert!(package.read_bytes("mimetype").unwrap().is_some());
        let styles = package.require_xml("styles.xml").unwrap();
        assert!(styles.find_child("office:styles").is_some());
        let meta = package.require_xml("meta.xml").unwrap();
        let generator = meta
            .find_child("office:meta")
            .and_then(|m| m.find_child("meta:generator"))
            .and_then(|g| g.text())
            .unwrap();
        assert!(generator.starts_with("ods-sheets/"));
    }

    #[test]
    fn test_gaps_become_repeated_rows_and_cells() {
        let mut book = Book::new();
        let sheet = book.create_sheet("Sheet1").unwrap();
        let row = sheet.create_row(2).unwrap();
        row.create_cell(1).unwrap().set_value("Index 1, cell 2");
        row.create_cell(6).unwrap().set_value(3.14);

        let content = write(&book).require_xml("content.xml").unwrap();
        let table = first_table(&content);
        let rows: Vec<&Tag> = table
            .children()
            .iter()
            .filter(|t| t.is("table:table-row"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].attr("table:number-rows-repeated"), Some("2"));

        let cells = rows[1].children();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].attr("table:number-columns-repeated"), None);
        assert_eq!(cells[2].attr("table:number-columns-repeated"), Some("4"));
        assert_eq!(cells[3].attr("office:value-type"), Some("float"));
        assert_eq!(cells[3].attr("office:value"), Some("3.14"));
        assert_eq!(
            cells[1].find_child("text:p").and_then(|p| p.text()),
            Some("Index 1, cell 2")
        );
    }

    #[test]
    fn test_columns_runs() {
        let mut book = Book::new();
        let sheet = book.create_sheet("Sheet1").unwrap();
        sheet.set_column_width(0, Length::cm(5.0)).unwrap();
        sheet.set_column_width(3, Length::cm(5.0)).unwrap();
        sheet.set_column_width(4, Length::cm(5.0)).unwrap();

        let content = write(&book).require_xml("content.xml").unwrap();
        let columns: Vec<(Option<&str>, Option<&str>)> = first_table(&content)
            .children()
            .iter()
            .filter(|t| t.is("table:table-column"))
            .map(|c| {
                (
                    c.attr("table:style-name"),
                    c.attr("table:number-columns-repeated"),
                )
            })
            .collect();
        assert_eq!(
            columns,
            vec![
                (Some("co1"), None),
                (Some("co2"), Some("2")),
                (Some("co1"), Some("2")),
            ]
        );
    }

    #[test]
    fn test_span_and_covered_cells() {
        let mut book = Book::new();
        let sheet = book.create_sheet("Sheet1").unwrap();
        sheet
            .create_row(0)
            .unwrap()
            .create_cell(0)
            .unwrap()
            .set_value("string")
            .set_row_col_span(2, 4)
            .unwrap();

        let content = write(&book).require_xml("content.xml").unwrap();
        let rows: Vec<&Tag> = first_table(&content)
            .children()
            .iter()
            .filter(|t| t.is("table:table-row"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            names(rows[0].children()),
            vec!["table:table-cell", "table:covered-table-cell"]
        );
        let anchor = &rows[0].children()[0];
        assert_eq!(anchor.attr("table:number-columns-spanned"), Some("4"));
        assert_eq!(anchor.attr("table:number-rows-spanned"), Some("2"));
        assert_eq!(
            rows[0].children()[1].attr("table:number-columns-repeated"),
            Some("3")
        );
        assert_eq!(names(rows[1].children()), vec!["table:covered-table-cell"]);
        assert_eq!(
            rows[1].children()[0].attr("table:number-columns-repeated"),
            Some("4")
        );
    }

    #[test]
    fn test_span_overlap_writes_nothing() {
        let mut book = Book::new();
        let sheet = book.create_sheet("Sheet1").unwrap();
        sheet
            .create_row(0)
            .unwrap()
            .create_cell(0)
            .unwrap()
            .set_row_col_span(2, 2)
            .unwrap();
        sheet.create_row(1).unwrap().create_cell(1).unwrap().set_value(1);

        let mut out = Cursor::new(Vec::new());
        let err = OdsWriter::write(&book, &mut out).unwrap_err();
        assert!(err.to_string().contains("Sheet1"));
        assert!(out.get_ref().is_empty());
    }

    #[test]
    fn test_shared_style_and_formula() {
        let mut book = Book::new();
        let a = book.create_cell_style();
        book.style_mut(a).unwrap().set_bold(true);
        let b = book.create_cell_style();
        book.style_mut(b).unwrap().set_bold(true);

        let sheet = book.create_sheet("Sheet1").unwrap();
        let row = sheet.create_row(0).unwrap();
        let a1 = row.create_cell(0).unwrap().set_value(15).set_style(a).cell_ref();
        let b1 = row.create_cell(1).unwrap().set_value(2).set_style(b).cell_ref();
        let mut f = Formula::new();
        f.add(a1).add(Op::Multiply).add(b1).set_value(30.0);
        row.create_cell(2).unwrap().set_formula(f);

        let content = write(&book).require_xml("content.xml").unwrap();
        let auto = content.find_child("office:automatic-styles").unwrap();
        let cell_styles = auto
            .children()
            .iter()
            .filter(|s| s.attr("style:family") == Some("table-cell"))
            .count();
        assert_eq!(cell_styles, 1);

        let row = first_table(&content)
            .find_child("table:table-row")
            .unwrap();
        let cells = row.children();
        assert_eq!(cells[0].attr("table:style-name"), Some("ce1"));
        assert_eq!(cells[1].attr("table:style-name"), Some("ce1"));
        assert_eq!(cells[2].attr("table:formula"), Some("of:=[.A1]*[.B1]"));
        assert_eq!(cells[2].attr("office:value"), Some("30"));
    }

    #[test]
    fn test_percentage_and_row_default_style() {
        let mut book = Book::new();
        let yellow = book.create_cell_style();
        book.style_mut(yellow).unwrap().set_background(Color::YELLOW);

        let sheet = book.create_sheet("Sheet1").unwrap();
        let row = sheet.create_row(0).unwrap();
        row.set_style(yellow);
        row.create_cell(0).unwrap().set_percentage_value(0.8, 2);

        let content = write(&book).require_xml("content.xml").unwrap();
        let row = first_table(&content)
            .find_child("table:table-row")
            .unwrap();
        assert_eq!(row.attr("table:default-cell-style-name"), Some("ce1"));
        let cell = &row.children()[0];
        assert_eq!(cell.attr("table:style-name"), Some("ce2"));
        assert_eq!(cell.attr("office:value-type"), Some("percentage"));
        assert_eq!(
            cell.find_child("text:p").and_then(|p| p.text()),
            Some("80.00%")
        );
    }

    #[test]
    fn test_image_frame() {
        let mut book = Book::new();
        let image = book.add_image(TINY_PNG.to_vec()).unwrap();
        let sheet = book.create_sheet("Sheet1").unwrap();
        sheet
            .create_row(0)
            .unwrap()
            .create_cell(0)
            .unwrap()
            .create_draw_frame(&image)
            .set_offset(ods_sheets_core::Point::pixels(60, 0));

        let mut package = write(&book);
        assert!(package.read_bytes("Pictures/image1.png").unwrap().is_some());
        let content = package.require_xml("content.xml").unwrap();
        let frame = content.descendants_named("draw:frame").next().unwrap();
        assert_eq!(frame.attr("svg:x"), Some("60px"));
        assert_eq!(frame.attr("svg:width"), Some("1px"));
        assert_eq!(
            frame
                .find_child("draw:image")
                .and_then(|i| i.attr("xlink:href")),
            Some("Pictures/image1.png")
        );
    }

    /// 1x1 grayscale PNG
    pub(crate) const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A,
        0x7E, 0x9B, 0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
        0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x48, 0xAF, 0xA4, 0x71, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];
}
