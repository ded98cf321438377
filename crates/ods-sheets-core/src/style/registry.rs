//! Style arena

use super::{Style, StyleFamily};
use crate::error::{Error, Result};

/// Handle to a style in a [`StyleRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(u32);

impl StyleId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Owns every style of a book
///
/// Styles are never removed, so a [`StyleId`] stays valid for the life of
/// the registry. Many cells share one style by holding the same id; the
/// writer interns styles with identical properties into one automatic
/// style at save time.
#[derive(Debug, Default, Clone)]
pub struct StyleRegistry {
    styles: Vec<Style>,
    /// Next placeholder number per family
    counters: [u32; 4],
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter_slot(family: StyleFamily) -> usize {
        match family {
            StyleFamily::TableCell => 0,
            StyleFamily::TableRow => 1,
            StyleFamily::TableColumn => 2,
            StyleFamily::Table => 3,
        }
    }

    fn next_placeholder(&mut self, family: StyleFamily) -> String {
        let slot = &mut self.counters[Self::counter_slot(family)];
        *slot += 1;
        format!("{}-tmp{}", family.name_prefix(), slot)
    }

    fn push(&mut self, style: Style) -> StyleId {
        let id = StyleId(self.styles.len() as u32);
        self.styles.push(style);
        id
    }

    /// Create an empty style of `family` with a placeholder name
    pub fn create(&mut self, family: StyleFamily) -> StyleId {
        let name = self.next_placeholder(family);
        self.push(Style::new(family, name))
    }

    /// Register a style under a name read from a document
    pub fn create_named<S: Into<String>>(&mut self, family: StyleFamily, name: S) -> StyleId {
        self.push(Style::new(family, name.into()))
    }

    /// Snapshot copy of an existing style
    ///
    /// The copy gets its own placeholder name; later changes to either
    /// style do not affect the other.
    pub fn derive(&mut self, id: StyleId) -> Result<StyleId> {
        let source = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("style #{}", id.0)))?;
        let family = source.family();
        let props = source.properties().clone();
        let name = self.next_placeholder(family);
        let mut style = Style::new(family, name);
        *style.properties_mut() = props;
        Ok(self.push(style))
    }

    pub fn get(&self, id: StyleId) -> Option<&Style> {
        self.styles.get(id.index())
    }

    pub fn get_mut(&mut self, id: StyleId) -> Option<&mut Style> {
        self.styles.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over all styles with their ids
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, s)| (StyleId(i as u32), s))
    }
}
