//! ODS reader

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use ahash::AHashMap;

use crate::error::{OdsError, OdsResult};
use crate::package::PackageReader;
use crate::styles::StyleTable;
use ods_sheets_core::style::{StyleFamily, StyleId};
use ods_sheets_core::tag::{Content, Tag};
use ods_sheets_core::{
    Book, BookSettings, Formula, ImageHandle, Length, LengthUnit, NumberFormat, Point, RowHeight,
    Sheet, SheetDirectory, SheetId, Size, Value,
};

/// Rows beyond this index are ignored
const MAX_ROWS: u32 = 1 << 20;
/// Columns beyond this index are ignored
const MAX_COLUMNS: u32 = 1 << 14;

/// ODS file reader
///
/// Reads sheets, rows, cells, values, formulas, cell styles, row heights,
/// column widths, spans and images. Everything else in the document is
/// skipped.
pub struct OdsReader;

impl OdsReader {
    /// Read a book from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> OdsResult<Book> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a book from a reader
    pub fn read<R: Read + Seek>(reader: R) -> OdsResult<Book> {
        let mut package = PackageReader::new(reader)?;
        let content = package.require_xml("content.xml")?;

        let mut settings = BookSettings::default();
        let mut styles = StyleTable::new();
        if let Some(doc) = package.read_xml("styles.xml")? {
            if let Some(common) = doc.find_child("office:styles") {
                read_defaults(common, &mut settings);
                styles.load(common);
            }
            if let Some(auto) = doc.find_child("office:automatic-styles") {
                styles.load(auto);
            }
        }
        if let Some(auto) = content.find_child("office:automatic-styles") {
            styles.load(auto);
        }

        let spreadsheet = content
            .find_child("office:body")
            .and_then(|body| body.find_child("office:spreadsheet"))
            .ok_or_else(|| OdsError::InvalidFormat("content.xml has no spreadsheet body".into()))?;
        let tables: Vec<&Tag> = spreadsheet
            .children()
            .iter()
            .filter(|t| t.is("table:table"))
            .collect();

        // Every sheet exists before any formula is parsed
        let mut book = Book::with_settings(settings);
        for (i, table) in tables.iter().enumerate() {
            let name = match table.attr("table:name") {
                Some(name) => name.to_string(),
                None => format!("Sheet{}", i + 1),
            };
            book.create_sheet(name)?;
        }
        let directory = book.sheet_directory();

        let mut reader = ContentReader {
            package: &mut package,
            styles: &styles,
            directory: &directory,
            style_ids: AHashMap::new(),
            images: AHashMap::new(),
        };
        for (index, table) in tables.iter().enumerate() {
            reader.read_table(&mut book, index, table)?;
        }
        Ok(book)
    }
}

/// Book defaults from the `style:default-style` elements of `styles.xml`
fn read_defaults(common: &Tag, settings: &mut BookSettings) {
    for default in common.children().iter().filter(|t| t.is("style:default-style")) {
        match default.attr("style:family").and_then(StyleFamily::from_odf) {
            Some(StyleFamily::TableColumn) => {
                if let Some(width) = default
                    .find_child("style:table-column-properties")
                    .and_then(|p| p.attr("style:column-width"))
                    .and_then(|w| w.parse().ok())
                {
                    settings.default_column_width = width;
                }
            }
            Some(StyleFamily::TableRow) => {
                if let Some(height) = default
                    .find_child("style:table-row-properties")
                    .and_then(|p| p.attr("style:row-height"))
                    .and_then(|h| h.parse().ok())
                {
                    settings.default_row_height = height;
                }
            }
            Some(StyleFamily::TableCell) => {
                if let Some(size) = default
                    .find_child("style:text-properties")
                    .and_then(|p| p.attr("fo:font-size"))
                    .and_then(|s| s.parse::<Length>().ok())
                {
                    settings.default_font_size = size.to_unit(LengthUnit::Pt).value;
                }
            }
            _ => {}
        }
    }
}

/// A cell parsed from XML, waiting to be stored in its sheet
#[derive(Debug, Clone)]
struct ParsedCell {
    value: Value,
    formula: Option<Formula>,
    format: NumberFormat,
    style: Option<StyleId>,
    spans: (u32, u32),
    frames: Vec<(ImageHandle, Size, Point)>,
}

struct ContentReader<'a, R: Read + Seek> {
    package: &'a mut PackageReader<R>,
    styles: &'a StyleTable,
    directory: &'a SheetDirectory,
    /// Registry style for each automatic style name (`None` for styles
    /// without properties)
    style_ids: AHashMap<String, Option<StyleId>>,
    /// Images already loaded, by package path
    images: AHashMap<String, Option<ImageHandle>>,
}

impl<'a, R: Read + Seek> ContentReader<'a, R> {
    fn read_table(&mut self, book: &mut Book, index: usize, table: &Tag) -> OdsResult<()> {
        let sheet_id = sheet_mut(book, index)?.id();
        let default_height = book.settings().default_row_height;

        let mut rows = Vec::new();
        collect(
            table,
            "table:table-row",
            &["table:table-row-group", "table:table-rows", "table:table-header-rows"],
            &mut rows,
        );

        let mut row_index = 0u32;
        for row_tag in rows {
            if row_index >= MAX_ROWS {
                log::warn!("ignoring rows beyond {}", MAX_ROWS);
                break;
            }
            let repeat = repeat_count(row_tag, "table:number-rows-repeated");
            let mut slots = cell_slots(row_tag);
            // Styled blank cells in a repeated row are column formatting
            if repeat > 1 && !slots.iter().any(|&(_, _, cell)| has_payload(cell)) {
                slots.clear();
            }
            let height = row_tag
                .attr("table:style-name")
                .map(|name| self.styles.row_height(name, default_height))
                .unwrap_or_default();

            // Repeated and unstyled empty rows are filler
            let row_style = if slots.is_empty() && repeat > 1 {
                None
            } else {
                row_tag
                    .attr("table:default-cell-style-name")
                    .and_then(|name| self.style_id(book, name))
            };
            let keep = !slots.is_empty()
                || (repeat == 1 && (height != RowHeight::Default || row_style.is_some()));
            if !keep {
                row_index = row_index.saturating_add(repeat);
                continue;
            }

            let mut cells = Vec::new();
            for (col, cell_repeat, cell_tag) in slots {
                let parsed = self.parse_cell(book, sheet_id, cell_tag)?;
                let end = col.saturating_add(cell_repeat).min(MAX_COLUMNS);
                for c in col..end {
                    cells.push((c, parsed.clone()));
                }
            }

            let end = row_index.saturating_add(repeat).min(MAX_ROWS);
            for r in row_index..end {
                let row = sheet_mut(book, index)?.create_row(r)?;
                match height {
                    RowHeight::Default => {}
                    RowHeight::Explicit(h) => {
                        row.set_height(h);
                    }
                    RowHeight::Optimal => {
                        row.set_optimal_height_style();
                    }
                }
                if let Some(style) = row_style {
                    row.set_style(style);
                }
                for (col, parsed) in &cells {
                    store_cell(row.create_cell(*col)?, parsed)?;
                }
            }
            row_index = end;
        }

        self.read_columns(book, index, table)?;
        if let Some(sheet) = book.sheet(index) {
            log::debug!("read sheet '{}' ({} rows)", sheet.name(), sheet.row_count());
        }
        Ok(())
    }

    /// Explicit column widths, each run applied to its full repeat count
    fn read_columns(&mut self, book: &mut Book, index: usize, table: &Tag) -> OdsResult<()> {
        let default = book.settings().default_column_width;
        let mut columns = Vec::new();
        collect(
            table,
            "table:table-column",
            &[
                "table:table-column-group",
                "table:table-columns",
                "table:table-header-columns",
            ],
            &mut columns,
        );

        let sheet = sheet_mut(book, index)?;
        let mut col = 0u32;
        for column in columns {
            if col >= MAX_COLUMNS {
                break;
            }
            let repeat = repeat_count(column, "table:number-columns-repeated");
            let end = col.saturating_add(repeat).min(MAX_COLUMNS);

            let width = column
                .attr("table:style-name")
                .and_then(|name| self.styles.column_width(name))
                .filter(|w| !w.same_as(&default));
            if let Some(width) = width {
                for c in col..end {
                    sheet.set_column_width(c, width)?;
                }
            }
            col = col.saturating_add(repeat);
        }
        Ok(())
    }

    /// Registry style for an automatic style name, created on first use
    fn style_id(&mut self, book: &mut Book, name: &str) -> Option<StyleId> {
        if let Some(id) = self.style_ids.get(name) {
            return *id;
        }
        let id = match self.styles.cell_style(name) {
            Some((props, _)) if !props.is_default() => {
                let id = book.styles_mut().create_named(StyleFamily::TableCell, name);
                if let Some(style) = book.style_mut(id) {
                    *style.properties_mut() = props;
                }
                Some(id)
            }
            Some(_) => None,
            None => {
                log::warn!("cell style '{}' is not defined", name);
                None
            }
        };
        self.style_ids.insert(name.to_string(), id);
        id
    }

    fn parse_cell(&mut self, book: &mut Book, sheet_id: SheetId, tag: &Tag) -> OdsResult<ParsedCell> {
        let style_name = tag.attr("table:style-name");
        let mut format = style_name
            .and_then(|name| self.styles.cell_style(name))
            .map(|(_, format)| format)
            .unwrap_or_default();
        let style = style_name.and_then(|name| self.style_id(book, name));

        let value = cell_value(tag);
        if tag.attr("office:value-type") == Some("percentage") && format == NumberFormat::General {
            let decimals = cell_text(tag).map(|t| percent_decimals(&t)).unwrap_or(0);
            format = NumberFormat::Percentage { decimals };
        }

        let formula = tag.attr("table:formula").map(|text| {
            let mut formula = Formula::parse(text, sheet_id, self.directory);
            if !value.is_unset() {
                formula.set_value(value.clone());
            }
            formula
        });

        let rows = repeat_count(tag, "table:number-rows-spanned");
        let cols = repeat_count(tag, "table:number-columns-spanned");

        let mut frames = Vec::new();
        for frame in tag.children().iter().filter(|c| c.is("draw:frame")) {
            if let Some(placed) = self.read_frame(book, frame)? {
                frames.push(placed);
            }
        }

        Ok(ParsedCell {
            value,
            formula,
            format,
            style,
            spans: (rows, cols),
            frames,
        })
    }

    fn read_frame(&mut self, book: &mut Book, frame: &Tag) -> OdsResult<Option<(ImageHandle, Size, Point)>> {
        let Some(href) = frame
            .find_child("draw:image")
            .and_then(|image| image.attr("xlink:href"))
        else {
            return Ok(None);
        };
        let path = href.trim_start_matches("./");

        let handle = match self.images.get(path) {
            Some(handle) => *handle,
            None => {
                let handle = match self.package.read_bytes(path)? {
                    Some(bytes) => match book.add_image(bytes) {
                        Ok(handle) => Some(handle),
                        Err(e) => {
                            log::warn!("skipping image {}: {}", path, e);
                            None
                        }
                    },
                    None => {
                        log::warn!("image {} is missing from the package", path);
                        None
                    }
                };
                self.images.insert(path.to_string(), handle);
                handle
            }
        };
        let Some(handle) = handle else {
            return Ok(None);
        };

        let length = |name: &str| frame.attr(name).and_then(|v| v.parse::<Length>().ok());
        let size = Size::new(
            length("svg:width").unwrap_or(handle.size.width),
            length("svg:height").unwrap_or(handle.size.height),
        );
        let offset = Point::new(
            length("svg:x").unwrap_or(Point::default().x),
            length("svg:y").unwrap_or(Point::default().y),
        );
        Ok(Some((handle, size, offset)))
    }
}

fn sheet_mut(book: &mut Book, index: usize) -> OdsResult<&mut Sheet> {
    book.sheet_mut(index)
        .ok_or_else(|| OdsError::InvalidFormat(format!("sheet {} disappeared", index)))
}

fn store_cell(cell: &mut ods_sheets_core::Cell, parsed: &ParsedCell) -> OdsResult<()> {
    match &parsed.formula {
        Some(formula) => {
            cell.set_formula(formula.clone());
        }
        None if !parsed.value.is_unset() => {
            cell.set_value(parsed.value.clone());
        }
        None => {}
    }
    cell.set_number_format(parsed.format);
    if let Some(style) = parsed.style {
        cell.set_style(style);
    }
    let (rows, cols) = parsed.spans;
    if rows > 1 || cols > 1 {
        cell.set_row_col_span(rows, cols)?;
    }
    for (handle, size, offset) in &parsed.frames {
        cell.create_draw_frame(handle)
            .set_size(*size)
            .set_offset(*offset);
    }
    Ok(())
}

/// Leaf elements named `leaf`, looking inside the grouping elements
fn collect<'t>(parent: &'t Tag, leaf: &str, groups: &[&str], out: &mut Vec<&'t Tag>) {
    for child in parent.children() {
        if child.is(leaf) {
            out.push(child);
        } else if groups.iter().any(|g| child.is(g)) {
            collect(child, leaf, groups, out);
        }
    }
}

/// Positive integer attribute, 1 when absent or invalid
fn repeat_count(tag: &Tag, attr: &str) -> u32 {
    tag.attr(attr)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Cells of a row that become model cells: `(column, repeat, tag)`
///
/// Covered cells are skipped. A cell without content is kept only when it
/// is styled and not a repeated run closing the row.
fn cell_slots(row: &Tag) -> Vec<(u32, u32, &Tag)> {
    let cells: Vec<&Tag> = row
        .children()
        .iter()
        .filter(|c| c.is("table:table-cell") || c.is("table:covered-table-cell"))
        .collect();

    let mut slots = Vec::new();
    let mut col = 0u32;
    for (i, cell) in cells.iter().enumerate() {
        if col >= MAX_COLUMNS {
            break;
        }
        let repeat = repeat_count(cell, "table:number-columns-repeated");
        let filler = repeat > 1 && i + 1 == cells.len();
        let keep = cell.is("table:table-cell")
            && (has_payload(cell) || (cell.attr("table:style-name").is_some() && !filler));
        if keep {
            slots.push((col, repeat, *cell));
        }
        col = col.saturating_add(repeat);
    }
    slots
}

fn has_payload(cell: &Tag) -> bool {
    cell.attr("office:value-type").is_some()
        || cell.attr("table:formula").is_some()
        || repeat_count(cell, "table:number-rows-spanned") > 1
        || repeat_count(cell, "table:number-columns-spanned") > 1
        || cell
            .children()
            .iter()
            .any(|c| c.is("text:p") || c.is("text:h") || c.is("draw:frame"))
}

fn cell_value(tag: &Tag) -> Value {
    let number = |attr: &str| {
        tag.attr(attr)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(Value::Double)
    };

    match tag.attr("office:value-type") {
        Some("float" | "percentage" | "currency") => number("office:value").unwrap_or_else(|| {
            log::warn!("numeric cell without a readable office:value");
            text_value(tag)
        }),
        Some("boolean") => match tag.attr("office:boolean-value") {
            Some("true") => Value::Double(1.0),
            Some(_) => Value::Double(0.0),
            None => Value::Unset,
        },
        Some("date") => tag
            .attr("office:date-value")
            .and_then(Value::parse_date_time)
            .map(Value::DateTime)
            .unwrap_or_else(|| text_value(tag)),
        Some("time") => tag
            .attr("office:time-value")
            .and_then(Value::parse_duration_days)
            .map(Value::Double)
            .unwrap_or_else(|| text_value(tag)),
        Some("string") => match tag.attr("office:string-value") {
            Some(s) => Value::text(s),
            None => Value::Text(cell_text(tag).unwrap_or_default()),
        },
        Some(other) => {
            log::warn!("unknown value type '{}', reading cell text", other);
            text_value(tag)
        }
        None => text_value(tag),
    }
}

fn text_value(tag: &Tag) -> Value {
    match cell_text(tag) {
        Some(text) => Value::Text(text),
        None => Value::Unset,
    }
}

/// Text of the cell's paragraphs joined with line breaks
fn cell_text(tag: &Tag) -> Option<String> {
    let paragraphs: Vec<String> = tag
        .children()
        .iter()
        .filter(|c| c.is("text:p") || c.is("text:h"))
        .map(paragraph_text)
        .collect();
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n"))
    }
}

fn paragraph_text(p: &Tag) -> String {
    let mut out = String::new();
    append_text(p, &mut out);
    out
}

fn append_text(tag: &Tag, out: &mut String) {
    match tag.content() {
        Content::Empty => {}
        Content::Text(text) => push_collapsed(out, text),
        Content::Children(children) => {
            for child in children {
                if child.is_text_run() {
                    push_collapsed(out, child.text().unwrap_or_default());
                } else if child.is("text:s") {
                    let count = repeat_count(child, "text:c") as usize;
                    out.extend(std::iter::repeat(' ').take(count));
                } else if child.is("text:tab") {
                    out.push('\t');
                } else if child.is("text:line-break") {
                    out.push('\n');
                } else if child.is("office:annotation") {
                    // comments are not cell text
                } else {
                    append_text(child, out);
                }
            }
        }
    }
}

/// Append XML text, collapsing whitespace runs to one space
fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            if !in_space && !out.is_empty() {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

/// Digits after the decimal separator of a shown percentage (`80.00%` is 2)
fn percent_decimals(shown: &str) -> u8 {
    let number = shown.trim().trim_end_matches('%');
    match number.rfind(['.', ',']) {
        Some(pos) => number[pos + 1..]
            .chars()
            .take_while(char::is_ascii_digit)
            .count()
            .min(u8::MAX as usize) as u8,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageWriter;
    use ods_sheets_core::ns;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    /// Package holding a hand-written `content.xml` body
    fn package(body: &str) -> Cursor<Vec<u8>> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="{}" xmlns:table="{}" xmlns:text="{}" xmlns:style="{}" xmlns:fo="{}" office:version="1.2">
<office:automatic-styles>
  <style:style style:name="ce1" style:family="table-cell">
    <style:text-properties fo:font-weight="bold"/>
  </style:style>
  <style:style style:name="ro1" style:family="table-row">
    <style:table-row-properties style:row-height="1cm" style:use-optimal-row-height="false"/>
  </style:style>
</office:automatic-styles>
<office:body><office:spreadsheet>{}</office:spreadsheet></office:body>
</office:document-content>"#,
            ns::OFFICE.uri,
            ns::TABLE.uri,
            ns::TEXT.uri,
            ns::STYLE.uri,
            ns::FO.uri,
            body
        );
        let mut writer = PackageWriter::new(Cursor::new(Vec::new())).unwrap();
        let tag = crate::xml::parse(xml.as_bytes()).unwrap();
        writer.add_xml("content.xml", &tag).unwrap();
        let mut out = writer.finish().unwrap();
        out.set_position(0);
        out
    }

    #[test]
    fn test_repeated_rows_and_cells() {
        let book = OdsReader::read(package(
            r#"<table:table table:name="Data">
  <table:table-row table:number-rows-repeated="3"><table:table-cell/></table:table-row>
  <table:table-row>
    <table:table-cell table:number-columns-repeated="2"/>
    <table:table-cell office:value-type="float" office:value="2.5" table:number-columns-repeated="2"><text:p>2.5</text:p></table:table-cell>
    <table:table-cell table:style-name="ce1" table:number-columns-repeated="1000"/>
  </table:table-row>
  <table:table-row table:number-rows-repeated="1048570"><table:table-cell table:number-columns-repeated="1024"/></table:table-row>
</table:table>"#,
        ))
        .unwrap();

        let sheet = book.sheet_by_name("Data").unwrap();
        assert_eq!(sheet.row_count(), 1);
        let row = sheet.row(3).unwrap();
        assert_eq!(row.cell_count(), 2);
        assert_eq!(sheet.cell(3, 2).unwrap().value(), &Value::Double(2.5));
        assert_eq!(sheet.cell(3, 3).unwrap().value(), &Value::Double(2.5));
        assert!(book.styles().is_empty());
    }

    #[test]
    fn test_formatted_column_rows_are_filler() {
        let book = OdsReader::read(package(
            r#"<table:table table:name="Data">
  <table:table-row>
    <table:table-cell table:style-name="ce1" office:value-type="float" office:value="1"><text:p>1</text:p></table:table-cell>
    <table:table-cell table:number-columns-repeated="1023"/>
  </table:table-row>
  <table:table-row table:number-rows-repeated="1048575">
    <table:table-cell table:style-name="ce1"/>
    <table:table-cell table:number-columns-repeated="1023"/>
  </table:table-row>
</table:table>"#,
        ))
        .unwrap();

        let sheet = book.sheet(0).unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.cells().count(), 1);
        assert_eq!(sheet.cell(0, 0).unwrap().value(), &Value::Double(1.0));
    }

    #[test]
    fn test_styled_blank_cells_are_kept() {
        let book = OdsReader::read(package(
            r#"<table:table table:name="Data">
  <table:table-row>
    <table:table-cell table:style-name="ce1" table:number-columns-repeated="2"/>
    <table:table-cell/>
    <table:table-cell table:style-name="ce1"/>
  </table:table-row>
</table:table>"#,
        ))
        .unwrap();

        let row = book.sheet(0).unwrap().row(0).unwrap();
        let cols: Vec<u32> = row.cells().map(|c| c.col()).collect();
        assert_eq!(cols, vec![0, 1, 3]);
        assert!(row.cells().all(|c| c.value().is_unset() && c.style().is_some()));
    }

    #[test]
    fn test_values_and_text() {
        let book = OdsReader::read(package(
            r#"<table:table table:name="S">
  <table:table-row table:style-name="ro1">
    <table:table-cell office:value-type="boolean" office:boolean-value="true"><text:p>TRUE</text:p></table:table-cell>
    <table:table-cell office:value-type="time" office:time-value="PT12H00M00S"><text:p>12:00</text:p></table:table-cell>
    <table:table-cell office:value-type="date" office:date-value="2024-02-29"><text:p>02/29/24</text:p></table:table-cell>
    <table:table-cell office:value-type="string" table:style-name="ce1"><text:p>a<text:s text:c="2"/>b<text:tab/>c</text:p><text:p><text:span>second</text:span> line</text:p></table:table-cell>
    <table:table-cell office:value-type="percentage" office:value="0.125"><text:p>12.5%</text:p></table:table-cell>
  </table:table-row>
</table:table>"#,
        ))
        .unwrap();

        let sheet = book.sheet(0).unwrap();
        assert_eq!(
            sheet.row(0).unwrap().height(),
            RowHeight::Explicit(Length::cm(1.0))
        );
        assert_eq!(sheet.cell(0, 0).unwrap().value(), &Value::Double(1.0));
        assert_eq!(sheet.cell(0, 1).unwrap().value(), &Value::Double(0.5));
        assert!(sheet.cell(0, 2).unwrap().value().is_date_time());

        let text = sheet.cell(0, 3).unwrap();
        assert_eq!(text.value(), &Value::text("a  b\tc\nsecond line"));
        let style = book.style(text.style().unwrap()).unwrap();
        assert!(style.bold());
        assert_eq!(style.name(), "ce1");

        let pct = sheet.cell(0, 4).unwrap();
        assert_eq!(pct.number_format(), NumberFormat::Percentage { decimals: 1 });
        assert_eq!(pct.display_text(), "12.5%");
    }

    #[test]
    fn test_formulas_and_spans() {
        let book = OdsReader::read(package(
            r#"<table:table table:name="First">
  <table:table-row>
    <table:table-cell office:value-type="float" office:value="15" table:number-columns-spanned="2" table:number-rows-spanned="1"><text:p>15</text:p></table:table-cell>
    <table:table-cell office:value-type="string"><text:p>hidden</text:p></table:table-cell>
    <table:table-cell table:formula="of:=[.A1]*[$Second.A1]" office:value-type="float" office:value="30"><text:p>30</text:p></table:table-cell>
    <table:table-cell table:formula="of:=SUM([.A1:.A2])" office:value-type="float" office:value="15"><text:p>15</text:p></table:table-cell>
  </table:table-row>
</table:table>
<table:table table:name="Second">
  <table:table-row><table:table-cell office:value-type="float" office:value="2"><text:p>2</text:p></table:table-cell></table:table-row>
</table:table>"#,
        ))
        .unwrap();

        let first = book.sheet(0).unwrap();
        let anchor = first.cell(0, 0).unwrap();
        assert_eq!((anchor.row_span(), anchor.col_span()), (1, 2));

        let product = first.cell(0, 2).unwrap();
        let formula = product.formula().unwrap();
        assert!(!formula.has_error());
        assert_eq!(product.value(), &Value::Double(30.0));
        assert_eq!(
            formula.to_odf(first.id(), &book).unwrap(),
            "of:=[.A1]*[$Second.A1]"
        );

        let sum = first.cell(0, 3).unwrap().formula().unwrap();
        assert!(sum.has_error());
        assert_eq!(sum.value(), &Value::Double(15.0));
        assert_eq!(sum.to_odf(first.id(), &book).unwrap(), "of:=SUM([.A1:.A2])");
    }

    #[test]
    fn test_missing_content() {
        let mut writer = PackageWriter::new(Cursor::new(Vec::new())).unwrap();
        writer.add_file("other.txt", b"x", "text/plain").unwrap();
        let mut out = writer.finish().unwrap();
        out.set_position(0);
        assert!(matches!(
            OdsReader::read(out),
            Err(OdsError::MissingPart(ref p)) if p == "content.xml"
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let err = OdsReader::read(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, OdsError::Zip(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_percent_decimals() {
        assert_eq!(percent_decimals("80.00%"), 2);
        assert_eq!(percent_decimals("1720%"), 0);
        assert_eq!(percent_decimals("12,5 %"), 1);
    }
}
