//! Book type - the main document structure

use crate::draw::{ImageHandle, MediaStore};
use crate::error::{Error, Result};
use crate::formula::{SheetDirectory, SheetNames};
use crate::sheet::{Sheet, SheetId};
use crate::style::{Style, StyleFamily, StyleId, StyleRegistry};
use crate::units::Length;
use std::path::Path;

/// A spreadsheet document
///
/// The book owns its sheets (in display order), every style and every
/// image. Sheets, cells and rows refer to styles and images through
/// `Copy` handles, so a style can be created from the book and then
/// applied while a sheet is borrowed.
#[derive(Debug, Clone, Default)]
pub struct Book {
    sheets: Vec<Sheet>,
    styles: StyleRegistry,
    media: MediaStore,
    settings: BookSettings,
    next_sheet_id: u32,
}

impl Book {
    /// Create an empty book with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BookSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &BookSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BookSettings {
        &mut self.settings
    }

    // === Sheets ===

    /// Append a sheet named `name`
    pub fn create_sheet<S: Into<String>>(&mut self, name: S) -> Result<&mut Sheet> {
        let name = name.into();
        if self.sheet_by_name(&name).is_some() {
            return Err(Error::DuplicateName(name));
        }
        let id = SheetId::new(self.next_sheet_id);
        self.next_sheet_id += 1;
        self.sheets.push(Sheet::new(id, name));
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet at display position `index`
    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    pub fn sheet_by_id(&self, id: SheetId) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id() == id)
    }

    pub fn sheet_by_id_mut(&mut self, id: SheetId) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id() == id)
    }

    /// Display position of a sheet
    pub fn sheet_index(&self, id: SheetId) -> Option<usize> {
        self.sheets.iter().position(|s| s.id() == id)
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    pub fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.iter_mut()
    }

    /// Snapshot of sheet ids and names, for parsing formulas while the
    /// book is being filled
    pub fn sheet_directory(&self) -> SheetDirectory {
        let mut dir = SheetDirectory::new();
        for sheet in &self.sheets {
            dir.insert(sheet.id(), sheet.name());
        }
        dir
    }

    // === Styles ===

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    /// Create an empty table-cell style
    pub fn create_cell_style(&mut self) -> StyleId {
        self.styles.create(StyleFamily::TableCell)
    }

    pub fn create_style(&mut self, family: StyleFamily) -> StyleId {
        self.styles.create(family)
    }

    /// Independent copy of an existing style
    pub fn derive_style(&mut self, id: StyleId) -> Result<StyleId> {
        self.styles.derive(id)
    }

    pub fn style(&self, id: StyleId) -> Option<&Style> {
        self.styles.get(id)
    }

    pub fn style_mut(&mut self, id: StyleId) -> Option<&mut Style> {
        self.styles.get_mut(id)
    }

    // === Images ===

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Store encoded image bytes in the book
    pub fn add_image(&mut self, bytes: Vec<u8>) -> Result<ImageHandle> {
        self.media.add(bytes)
    }

    /// Read an image file into the book
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<ImageHandle> {
        self.media.load(path)
    }
}

impl SheetNames for Book {
    fn sheet_name(&self, id: SheetId) -> Option<&str> {
        self.sheet_by_id(id).map(|s| s.name())
    }

    fn sheet_id(&self, name: &str) -> Option<SheetId> {
        self.sheet_by_name(name).map(|s| s.id())
    }
}

/// Document-wide defaults
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BookSettings {
    /// Width of columns without an explicit width
    pub default_column_width: Length,
    /// Height of rows without an explicit or optimal height
    pub default_row_height: Length,
    /// Font size (pt) assumed for cells whose style names none
    pub default_font_size: f64,
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            default_column_width: Length::cm(2.258),
            default_row_height: Length::cm(0.452),
            default_font_size: 10.0,
        }
    }
}
