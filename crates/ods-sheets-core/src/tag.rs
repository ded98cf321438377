//! Tagged element tree
//!
//! One recursive node type used for every XML part of a package: content,
//! styles, metadata and manifest are all built as [`Tag`] trees before they
//! are serialized, and parsed back into [`Tag`] trees before they are scanned.

use std::fmt;

/// A namespace-qualified name such as `table:table-cell`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (empty for unprefixed names)
    pub prefix: String,
    /// Local part
    pub local: String,
}

impl QName {
    /// Create a name from a prefix and a local part
    pub fn new<P: Into<String>, L: Into<String>>(prefix: P, local: L) -> Self {
        Self {
            prefix: prefix.into(),
            local: local.into(),
        }
    }

    /// Parse `"prefix:local"` (or a bare `"local"`)
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((prefix, local)) => Self::new(prefix, local),
            None => Self::new("", s),
        }
    }

    /// Check against a `"prefix:local"` string without allocating
    pub fn is(&self, qualified: &str) -> bool {
        match qualified.split_once(':') {
            Some((prefix, local)) => self.prefix == prefix && self.local == local,
            None => self.prefix.is_empty() && self.local == qualified,
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{}:{}", self.prefix, self.local)
        }
    }
}

impl From<&str> for QName {
    fn from(s: &str) -> Self {
        QName::parse(s)
    }
}

/// Payload of a tag: nothing, child tags, or text
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    #[default]
    Empty,
    Children(Vec<Tag>),
    Text(String),
}

/// An element with ordered attributes and either children or text
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: QName,
    attrs: Vec<(QName, String)>,
    content: Content,
}

/// Name given to text runs that sit between sibling elements (mixed content)
pub const TEXT_RUN: &str = "#text";

impl Tag {
    /// Create an empty tag
    pub fn new<N: Into<QName>>(name: N) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            content: Content::Empty,
        }
    }

    /// Create a text run node, used for text interleaved with elements
    pub fn text_run<S: Into<String>>(text: S) -> Self {
        let mut tag = Tag::new(QName::new("", TEXT_RUN));
        tag.set_text(text);
        tag
    }

    /// The element name
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Check the element name against `"prefix:local"`
    pub fn is(&self, qualified: &str) -> bool {
        self.name.is(qualified)
    }

    /// Whether this node is a text run created by [`Tag::text_run`]
    pub fn is_text_run(&self) -> bool {
        self.name.prefix.is_empty() && self.name.local == TEXT_RUN
    }

    // === Attributes ===

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr<N: Into<QName>, V: Into<String>>(&mut self, name: N, value: V) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Builder form of [`Tag::set_attr`]
    pub fn with_attr<N: Into<QName>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Get an attribute by `"prefix:local"` name
    pub fn attr(&self, qualified: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.is(qualified))
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute, returning its value
    pub fn remove_attr(&mut self, qualified: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(n, _)| n.is(qualified))?;
        Some(self.attrs.remove(pos).1)
    }

    /// Attributes in insertion order
    pub fn attrs(&self) -> impl Iterator<Item = (&QName, &str)> {
        self.attrs.iter().map(|(n, v)| (n, v.as_str()))
    }

    // === Content ===

    /// Append a new empty child and return it
    pub fn create_child<N: Into<QName>>(&mut self, name: N) -> &mut Tag {
        self.push_child(Tag::new(name))
    }

    /// Append an existing tag as the last child and return it
    ///
    /// Replaces text content, if any.
    pub fn push_child(&mut self, child: Tag) -> &mut Tag {
        if !matches!(self.content, Content::Children(_)) {
            self.content = Content::Children(Vec::new());
        }
        match &mut self.content {
            Content::Children(children) => {
                children.push(child);
                let last = children.len() - 1;
                &mut children[last]
            }
            _ => unreachable!("content was just set to children"),
        }
    }

    /// Builder form of [`Tag::push_child`]
    pub fn with_child(mut self, child: Tag) -> Self {
        self.push_child(child);
        self
    }

    /// Child tags (empty for text or empty tags)
    pub fn children(&self) -> &[Tag] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Mutable child tags
    pub fn children_mut(&mut self) -> &mut [Tag] {
        match &mut self.content {
            Content::Children(children) => children,
            _ => &mut [],
        }
    }

    /// First child with the given `"prefix:local"` name
    pub fn find_child(&self, qualified: &str) -> Option<&Tag> {
        self.children().iter().find(|c| c.is(qualified))
    }

    /// Mutable first child with the given name
    pub fn find_child_mut(&mut self, qualified: &str) -> Option<&mut Tag> {
        self.children_mut().iter_mut().find(|c| c.is(qualified))
    }

    /// Text payload, if this tag holds text
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Set the text payload, replacing any children
    pub fn set_text<S: Into<String>>(&mut self, text: S) -> &mut Self {
        self.content = Content::Text(text.into());
        self
    }

    /// Builder form of [`Tag::set_text`]
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.set_text(text);
        self
    }

    /// Raw content
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Whether the tag has neither children nor text
    pub fn is_empty(&self) -> bool {
        match &self.content {
            Content::Empty => true,
            Content::Children(c) => c.is_empty(),
            Content::Text(t) => t.is_empty(),
        }
    }

    /// Lazy depth-first, pre-order walk over descendants matching `pred`
    ///
    /// The receiver itself is not visited. The iterator is `Clone`, so a
    /// partially consumed walk can be restarted from a saved copy.
    pub fn descendants<P>(&self, pred: P) -> Descendants<'_, P>
    where
        P: Fn(&Tag) -> bool,
    {
        Descendants {
            stack: vec![self.children().iter()],
            pred,
        }
    }

    /// Descendants with the given `"prefix:local"` name
    pub fn descendants_named<'a>(
        &'a self,
        qualified: &'a str,
    ) -> Descendants<'a, impl Fn(&Tag) -> bool + Clone + 'a> {
        self.descendants(move |t: &Tag| t.is(qualified))
    }
}

/// Iterator returned by [`Tag::descendants`]
#[derive(Clone)]
pub struct Descendants<'a, P> {
    stack: Vec<std::slice::Iter<'a, Tag>>,
    pred: P,
}

impl<'a, P> Iterator for Descendants<'a, P>
where
    P: Fn(&Tag) -> bool,
{
    type Item = &'a Tag;

    fn next(&mut self) -> Option<&'a Tag> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(tag) => {
                    if !tag.children().is_empty() {
                        self.stack.push(tag.children().iter());
                    }
                    if (self.pred)(tag) {
                        return Some(tag);
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Tag {
        let mut root = Tag::new("office:spreadsheet");
        let table = root.create_child("table:table");
        table.set_attr("table:name", "Sheet1");
        let row = table.create_child("table:table-row");
        row.create_child("table:table-cell")
            .create_child("text:p")
            .set_text("a");
        row.create_child("table:table-cell")
            .create_child("text:p")
            .set_text("b");
        root.create_child("table:table")
            .set_attr("table:name", "Sheet2");
        root
    }

    #[test]
    fn test_qname_parse() {
        let q = QName::parse("table:table-cell");
        assert_eq!(q.prefix, "table");
        assert_eq!(q.local, "table-cell");
        assert_eq!(q.to_string(), "table:table-cell");
        assert!(q.is("table:table-cell"));
        assert!(!q.is("table:table-row"));
        assert_eq!(QName::parse("plain").to_string(), "plain");
    }

    #[test]
    fn test_attribute_order_and_replace() {
        let mut tag = Tag::new("style:style");
        tag.set_attr("style:name", "ce1")
            .set_attr("style:family", "table-cell")
            .set_attr("style:name", "ce2");

        let names: Vec<String> = tag.attrs().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["style:name", "style:family"]);
        assert_eq!(tag.attr("style:name"), Some("ce2"));
        assert_eq!(tag.remove_attr("style:name"), Some("ce2".to_string()));
        assert_eq!(tag.attr("style:name"), None);
    }

    #[test]
    fn test_text_and_children_are_exclusive() {
        let mut tag = Tag::new("text:p");
        tag.set_text("hello");
        assert_eq!(tag.text(), Some("hello"));

        tag.create_child("text:span");
        assert_eq!(tag.text(), None);
        assert_eq!(tag.children().len(), 1);

        tag.set_text("again");
        assert!(tag.children().is_empty());
    }

    #[test]
    fn test_find_child() {
        let root = sample();
        let table = root.find_child("table:table").unwrap();
        assert_eq!(table.attr("table:name"), Some("Sheet1"));
        assert!(root.find_child("table:table-row").is_none());
    }

    #[test]
    fn test_descendants_preorder() {
        let root = sample();
        let names: Vec<String> = root
            .descendants(|_| true)
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "table:table",
                "table:table-row",
                "table:table-cell",
                "text:p",
                "table:table-cell",
                "text:p",
                "table:table",
            ]
        );
    }

    #[test]
    fn test_descendants_restartable() {
        let root = sample();
        let mut walk = root.descendants_named("text:p");
        let saved = walk.clone();
        assert_eq!(walk.next().and_then(|t| t.text()), Some("a"));
        assert_eq!(walk.next().and_then(|t| t.text()), Some("b"));
        assert!(walk.next().is_none());
        assert_eq!(saved.count(), 2);
    }
}
