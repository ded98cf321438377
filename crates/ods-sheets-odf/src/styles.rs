//! Automatic styles: interning on write, lookup tables on read

use ahash::AHashMap;

use ods_sheets_core::style::{
    Border, BorderSides, Color, HAlign, StyleFamily, StyleProperties, VAlign,
};
use ods_sheets_core::tag::Tag;
use ods_sheets_core::{Length, LengthUnit, NumberFormat, RowHeight};

/// Name of the table style every sheet uses
pub(crate) const TABLE_STYLE: &str = "ta1";

/// Name of the common cell style in `styles.xml`
pub(crate) const DEFAULT_CELL_STYLE: &str = "Default";

// === Writing ===

/// What makes two cell styles the same automatic style
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CellStyleKey {
    props: StyleProperties,
    format: NumberFormat,
}

/// Interns everything that ends up in `office:automatic-styles`
///
/// Identical property bags share one name (`ce1`, `ro1`, `co1`), so
/// two registry styles with the same properties produce one `style:style`.
#[derive(Debug, Default)]
pub(crate) struct AutomaticStyles {
    cells: Vec<CellStyleKey>,
    cell_names: AHashMap<CellStyleKey, usize>,
    rows: Vec<(Length, bool)>,
    row_names: AHashMap<(Length, bool), usize>,
    columns: Vec<Length>,
    column_names: AHashMap<Length, usize>,
    /// Decimal places of each percentage data style
    percentages: Vec<u8>,
    fonts: Vec<String>,
}

impl AutomaticStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the cell style for `props` shown with `format`
    ///
    /// `None` when neither carries anything beyond the defaults.
    pub fn cell_style(&mut self, props: &StyleProperties, format: NumberFormat) -> Option<String> {
        if props.is_default() && format == NumberFormat::General {
            return None;
        }
        if let Some(font) = &props.font_name {
            if !self.fonts.contains(font) {
                self.fonts.push(font.clone());
            }
        }
        if let NumberFormat::Percentage { decimals } = format {
            if !self.percentages.contains(&decimals) {
                self.percentages.push(decimals);
            }
        }

        let key = CellStyleKey {
            props: props.clone(),
            format,
        };
        let index = match self.cell_names.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.cells.len();
                self.cells.push(key.clone());
                self.cell_names.insert(key, i);
                i
            }
        };
        Some(format!("ce{}", index + 1))
    }

    /// Name of the row style for a height
    pub fn row_style(&mut self, height: Length, optimal: bool) -> String {
        let key = (height, optimal);
        let index = match self.row_names.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.rows.len();
                self.rows.push(key);
                self.row_names.insert(key, i);
                i
            }
        };
        format!("ro{}", index + 1)
    }

    /// Name of the column style for a width
    pub fn column_style(&mut self, width: Length) -> String {
        let index = match self.column_names.get(&width) {
            Some(&i) => i,
            None => {
                let i = self.columns.len();
                self.columns.push(width);
                self.column_names.insert(width, i);
                i
            }
        };
        format!("co{}", index + 1)
    }

    pub fn cell_style_count(&self) -> usize {
        self.cells.len()
    }

    /// `office:font-face-decls` for every font named by a cell style
    pub fn font_face_decls(&self) -> Tag {
        let mut decls = Tag::new("office:font-face-decls");
        for font in &self.fonts {
            let family = if font.contains(char::is_whitespace) {
                format!("'{}'", font)
            } else {
                font.clone()
            };
            decls
                .create_child("style:font-face")
                .set_attr("style:name", font.as_str())
                .set_attr("svg:font-family", family);
        }
        decls
    }

    /// `office:automatic-styles` holding everything interned so far
    pub fn to_tag(&self) -> Tag {
        log::debug!(
            "automatic styles: {} cell, {} row, {} column, {} data",
            self.cells.len(),
            self.rows.len(),
            self.columns.len(),
            self.percentages.len()
        );

        let mut auto = Tag::new("office:automatic-styles");

        let table = auto.create_child("style:style");
        table
            .set_attr("style:name", TABLE_STYLE)
            .set_attr("style:family", StyleFamily::Table.to_odf())
            .set_attr("style:master-page-name", "Default");
        table
            .create_child("style:table-properties")
            .set_attr("table:display", "true")
            .set_attr("style:writing-mode", "lr-tb");

        for (i, width) in self.columns.iter().enumerate() {
            let column = auto.create_child("style:style");
            column
                .set_attr("style:name", format!("co{}", i + 1))
                .set_attr("style:family", StyleFamily::TableColumn.to_odf());
            column
                .create_child("style:table-column-properties")
                .set_attr("fo:break-before", "auto")
                .set_attr("style:column-width", width.to_string());
        }

        for (i, (height, optimal)) in self.rows.iter().enumerate() {
            let row = auto.create_child("style:style");
            row.set_attr("style:name", format!("ro{}", i + 1))
                .set_attr("style:family", StyleFamily::TableRow.to_odf());
            row.create_child("style:table-row-properties")
                .set_attr("style:row-height", height.to_string())
                .set_attr("fo:break-before", "auto")
                .set_attr("style:use-optimal-row-height", optimal.to_string());
        }

        for &decimals in &self.percentages {
            auto.push_child(percentage_style(decimals));
        }

        for (i, key) in self.cells.iter().enumerate() {
            auto.push_child(cell_style_tag(&format!("ce{}", i + 1), key));
        }
        auto
    }
}

/// `N100` for no decimals, `N102` for two
fn data_style_name(decimals: u8) -> String {
    format!("N{}", 100 + decimals as u32)
}

fn percentage_style(decimals: u8) -> Tag {
    let mut style = Tag::new("number:percentage-style");
    style.set_attr("style:name", data_style_name(decimals));
    style
        .create_child("number:number")
        .set_attr("number:decimal-places", decimals.to_string())
        .set_attr("number:min-decimal-places", decimals.to_string())
        .set_attr("number:min-integer-digits", "1");
    style.create_child("number:text").set_text("%");
    style
}

fn cell_style_tag(name: &str, key: &CellStyleKey) -> Tag {
    let props = &key.props;
    let mut style = Tag::new("style:style");
    style
        .set_attr("style:name", name)
        .set_attr("style:family", StyleFamily::TableCell.to_odf())
        .set_attr("style:parent-style-name", DEFAULT_CELL_STYLE);
    if let NumberFormat::Percentage { decimals } = key.format {
        style.set_attr("style:data-style-name", data_style_name(decimals));
    }

    let mut cell = Tag::new("style:table-cell-properties");
    if let Some(bg) = props.background {
        cell.set_attr("fo:background-color", bg.to_odf());
    }
    if let Some(border) = &props.border {
        if border.sides() == BorderSides::ALL {
            cell.set_attr("fo:border", border.to_odf());
        } else {
            for (side, suffix) in BorderSides::EACH {
                if border.sides().contains(side) {
                    cell.set_attr(format!("fo:border-{}", suffix).as_str(), border.to_odf());
                }
            }
        }
    }
    if let Some(v) = props.v_align {
        cell.set_attr("style:vertical-align", v.to_odf());
    }
    if props.wrap {
        cell.set_attr("fo:wrap-option", "wrap");
    }
    if props.h_align.is_some() {
        cell.set_attr("style:text-align-source", "fix");
    }
    if cell.attrs().next().is_some() {
        style.push_child(cell);
    }

    if let Some(h) = props.h_align {
        style
            .create_child("style:paragraph-properties")
            .set_attr("fo:text-align", h.to_odf());
    }

    let mut text = Tag::new("style:text-properties");
    if let Some(font) = &props.font_name {
        text.set_attr("style:font-name", font.as_str());
    }
    if let Some(size) = props.font_size {
        text.set_attr("fo:font-size", Length::pt(size).to_string());
    }
    if props.bold {
        text.set_attr("fo:font-weight", "bold");
    }
    if props.italic {
        text.set_attr("fo:font-style", "italic");
    }
    if let Some(color) = props.text_color {
        text.set_attr("fo:color", color.to_odf());
    }
    if text.attrs().next().is_some() {
        style.push_child(text);
    }
    style
}

// === Reading ===

#[derive(Debug, Clone, Default)]
struct ParsedCellStyle {
    props: StyleProperties,
    parent: Option<String>,
    data_style: Option<String>,
}

/// Styles found in `content.xml` and `styles.xml`, by name
#[derive(Debug, Default)]
pub(crate) struct StyleTable {
    cells: AHashMap<String, ParsedCellStyle>,
    data: AHashMap<String, NumberFormat>,
    rows: AHashMap<String, (Option<Length>, bool)>,
    columns: AHashMap<String, Length>,
}

/// Parent chains longer than this are treated as cycles
const MAX_PARENT_DEPTH: usize = 16;

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every style directly under `container`
    /// (`office:styles` or `office:automatic-styles`)
    pub fn load(&mut self, container: &Tag) {
        for child in container.children() {
            let Some(name) = child.attr("style:name") else {
                continue;
            };
            if child.is("number:percentage-style") {
                let decimals = child
                    .find_child("number:number")
                    .and_then(|n| n.attr("number:decimal-places"))
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(0);
                self.data
                    .insert(name.to_string(), NumberFormat::Percentage { decimals });
            } else if child.is("style:style") {
                let family = child.attr("style:family").and_then(StyleFamily::from_odf);
                match family {
                    Some(StyleFamily::TableCell) => {
                        self.cells.insert(name.to_string(), parse_cell_style(child));
                    }
                    Some(StyleFamily::TableRow) => {
                        if let Some(p) = child.find_child("style:table-row-properties") {
                            let height = p.attr("style:row-height").and_then(|h| h.parse().ok());
                            let optimal = p.attr("style:use-optimal-row-height") == Some("true");
                            self.rows.insert(name.to_string(), (height, optimal));
                        }
                    }
                    Some(StyleFamily::TableColumn) => {
                        let width = child
                            .find_child("style:table-column-properties")
                            .and_then(|p| p.attr("style:column-width"))
                            .and_then(|w| w.parse().ok());
                        if let Some(width) = width {
                            self.columns.insert(name.to_string(), width);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Properties and number format of a cell style, parents applied
    pub fn cell_style(&self, name: &str) -> Option<(StyleProperties, NumberFormat)> {
        let style = self.cells.get(name)?;
        let mut props = style.props.clone();
        let mut data_style = style.data_style.clone();

        let mut parent = style.parent.as_deref();
        let mut depth = 0;
        while let Some(parent_name) = parent {
            depth += 1;
            if depth > MAX_PARENT_DEPTH {
                log::warn!("style '{}' has a cyclic parent chain", name);
                break;
            }
            let Some(p) = self.cells.get(parent_name) else {
                break;
            };
            inherit(&mut props, &p.props);
            if data_style.is_none() {
                data_style = p.data_style.clone();
            }
            parent = p.parent.as_deref();
        }

        let format = data_style
            .and_then(|d| self.data.get(&d).copied())
            .unwrap_or_default();
        Some((props, format))
    }

    /// Height policy of a row style, judged against the book default
    pub fn row_height(&self, name: &str, default: Length) -> RowHeight {
        match self.rows.get(name) {
            Some((Some(h), true)) if h.same_as(&default) => RowHeight::Default,
            Some((_, true)) => RowHeight::Optimal,
            Some((Some(h), false)) => RowHeight::Explicit(*h),
            _ => RowHeight::Default,
        }
    }

    pub fn column_width(&self, name: &str) -> Option<Length> {
        self.columns.get(name).copied()
    }
}

fn inherit(child: &mut StyleProperties, parent: &StyleProperties) {
    if child.font_name.is_none() {
        child.font_name = parent.font_name.clone();
    }
    child.font_size = child.font_size.or(parent.font_size);
    child.bold |= parent.bold;
    child.italic |= parent.italic;
    child.text_color = child.text_color.or(parent.text_color);
    child.background = child.background.or(parent.background);
    child.h_align = child.h_align.or(parent.h_align);
    child.v_align = child.v_align.or(parent.v_align);
    child.wrap |= parent.wrap;
    if child.border.is_none() {
        child.border = parent.border.clone();
    }
}

fn parse_cell_style(tag: &Tag) -> ParsedCellStyle {
    let mut props = StyleProperties::default();

    if let Some(cell) = tag.find_child("style:table-cell-properties") {
        props.background = cell
            .attr("fo:background-color")
            .filter(|c| *c != "transparent")
            .and_then(Color::from_hex);
        props.v_align = cell.attr("style:vertical-align").and_then(VAlign::from_odf);
        props.wrap = cell.attr("fo:wrap-option") == Some("wrap");
        props.border = parse_border(cell);
    }

    if let Some(para) = tag.find_child("style:paragraph-properties") {
        props.h_align = para.attr("fo:text-align").and_then(HAlign::from_odf);
    }

    if let Some(text) = tag.find_child("style:text-properties") {
        props.font_name = text.attr("style:font-name").map(str::to_string);
        props.font_size = text
            .attr("fo:font-size")
            .and_then(|s| s.parse::<Length>().ok())
            .map(|l| l.to_unit(LengthUnit::Pt).value);
        props.bold = match text.attr("fo:font-weight") {
            Some("bold") => true,
            Some(w) => w.parse::<u32>().map(|w| w >= 600).unwrap_or(false),
            None => false,
        };
        props.italic = matches!(text.attr("fo:font-style"), Some("italic" | "oblique"));
        props.text_color = text.attr("fo:color").and_then(Color::from_hex);
    }

    ParsedCellStyle {
        props,
        parent: tag
            .attr("style:parent-style-name")
            .map(str::to_string),
        data_style: tag.attr("style:data-style-name").map(str::to_string),
    }
}

/// Read `fo:border`, or the per-side attributes merged into one border
///
/// Sides only merge when they share width, line and color; otherwise the
/// first side wins.
fn parse_border(cell: &Tag) -> Option<Border> {
    if let Some(all) = cell.attr("fo:border") {
        return Border::from_odf(all, BorderSides::ALL);
    }

    let mut merged: Option<Border> = None;
    for (side, suffix) in BorderSides::EACH {
        let Some(value) = cell.attr(&format!("fo:border-{}", suffix)) else {
            continue;
        };
        let Some(border) = Border::from_odf(value, side) else {
            continue;
        };
        match &mut merged {
            None => merged = Some(border),
            Some(m) if m.to_odf() == border.to_odf() => {
                let sides = m.sides() | side;
                m.set_sides(sides);
            }
            Some(_) => log::debug!("dropping differing {} border '{}'", suffix, value),
        }
    }
    merged
}
