//! Conversion between XML bytes and [`Tag`] trees
//!
//! Element and attribute names are stored with the canonical prefixes of
//! [`ods_sheets_core::ns`], whatever prefixes the document declared.
//! Writing declares every namespace the tree uses on the root element.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{OdsError, OdsResult};
use ods_sheets_core::ns;
use ods_sheets_core::tag::{Content, QName, Tag};

/// Serialize a tree as a standalone UTF-8 XML document
pub fn to_bytes(root: &Tag) -> OdsResult<Vec<u8>> {
    let mut writer = Writer::new(Vec::with_capacity(4096));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let declarations = namespace_declarations(root);
    write_tag(&mut writer, root, &declarations)?;
    Ok(writer.into_inner())
}

/// `xmlns:*` attributes for every known prefix used in the tree
fn namespace_declarations(root: &Tag) -> Vec<(String, &'static str)> {
    let names = std::iter::once(root)
        .chain(root.descendants(|_| true))
        .flat_map(|t| std::iter::once(t.name()).chain(t.attrs().map(|(n, _)| n)));
    let mut used: Vec<&str> = Vec::new();
    for q in names {
        if !q.prefix.is_empty() && !used.contains(&q.prefix.as_str()) {
            used.push(&q.prefix);
        }
    }

    ns::ALL
        .iter()
        .filter(|n| used.contains(&n.prefix))
        .map(|n| (format!("xmlns:{}", n.prefix), n.uri))
        .collect()
}

fn write_tag(
    writer: &mut Writer<Vec<u8>>,
    tag: &Tag,
    declarations: &[(String, &'static str)],
) -> OdsResult<()> {
    if tag.is_text_run() {
        let text = tag.text().unwrap_or_default();
        writer.write_event(Event::Text(BytesText::new(text)))?;
        return Ok(());
    }

    let name = tag.name().to_string();
    let mut start = BytesStart::new(name.as_str());
    for (key, uri) in declarations {
        start.push_attribute((key.as_str(), *uri));
    }
    for (key, value) in tag.attrs() {
        let key = key.to_string();
        start.push_attribute((key.as_str(), value));
    }

    match tag.content() {
        Content::Empty => writer.write_event(Event::Empty(start))?,
        Content::Children(children) if children.is_empty() => {
            writer.write_event(Event::Empty(start))?
        }
        Content::Text(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        Content::Children(children) => {
            writer.write_event(Event::Start(start))?;
            for child in children {
                write_tag(writer, child, &[])?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
    }
    Ok(())
}

/// An element being parsed, with the children seen so far
struct Open {
    tag: Tag,
    children: Vec<Tag>,
    /// Prefix mappings declared on this element (document -> canonical)
    scope: Vec<(String, String)>,
}

impl Open {
    fn push_text(&mut self, text: &str) {
        if let Some(last) = self.children.last_mut() {
            if last.is_text_run() {
                let joined = format!("{}{}", last.text().unwrap_or_default(), text);
                last.set_text(joined);
                return;
            }
        }
        self.children.push(Tag::text_run(text));
    }

    fn finish(mut self) -> Tag {
        if self.children.len() == 1 && self.children[0].is_text_run() {
            let text = self.children[0].text().unwrap_or_default().to_string();
            self.tag.set_text(text);
        } else {
            for child in self.children {
                self.tag.push_child(child);
            }
        }
        self.tag
    }
}

/// Parse an XML document into its root tag
///
/// Comments, processing instructions and formatting whitespace (runs of
/// whitespace containing a line break) are dropped.
pub fn parse(bytes: &[u8]) -> OdsResult<Tag> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut root: Option<Tag> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let open = open_element(&e, &stack)?;
                stack.push(open);
            }
            Event::Empty(e) => {
                let open = open_element(&e, &stack)?;
                let tag = open.finish();
                attach(&mut stack, &mut root, tag)?;
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| OdsError::InvalidFormat("unbalanced end tag".into()))?;
                let tag = open.finish();
                attach(&mut stack, &mut root, tag)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let text = String::from_utf8_lossy(&raw);
                push_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(OdsError::InvalidFormat("unexpected end of document".into()));
    }
    root.ok_or_else(|| OdsError::InvalidFormat("document has no root element".into()))
}

fn push_text(stack: &mut [Open], text: &str) {
    let formatting = text.chars().all(char::is_whitespace) && text.contains(['\n', '\r']);
    if text.is_empty() || formatting {
        return;
    }
    if let Some(open) = stack.last_mut() {
        open.push_text(text);
    }
}

fn attach(stack: &mut [Open], root: &mut Option<Tag>, tag: Tag) -> OdsResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(tag),
        None => {
            if root.is_some() {
                return Err(OdsError::InvalidFormat("more than one root element".into()));
            }
            *root = Some(tag);
        }
    }
    Ok(())
}

fn open_element(e: &BytesStart<'_>, stack: &[Open]) -> OdsResult<Open> {
    let mut scope = Vec::new();
    let mut attrs: Vec<(String, String)> = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        if key == "xmlns" {
            scope.push((String::new(), canonical_prefix("", &value)));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((prefix.to_string(), canonical_prefix(prefix, &value)));
        } else {
            attrs.push((key.to_string(), value));
        }
    }

    let lookup = |prefix: &str| -> Option<String> {
        scope
            .iter()
            .rev()
            .chain(stack.iter().rev().flat_map(|o| o.scope.iter().rev()))
            .find(|(doc, _)| doc == prefix)
            .map(|(_, canonical)| canonical.clone())
    };

    let qname = e.name();
    let raw_name = utf8(qname.as_ref())?;
    let element = resolve(raw_name, true, &lookup);
    let mut tag = Tag::new(element);
    for (key, value) in attrs {
        tag.set_attr(resolve(&key, false, &lookup), value);
    }

    Ok(Open {
        tag,
        children: Vec::new(),
        scope,
    })
}

fn canonical_prefix(declared: &str, uri: &str) -> String {
    ns::prefix_for_uri(uri).unwrap_or(declared).to_string()
}

/// Map a document name to its canonical form
///
/// Unprefixed elements take the default namespace; unprefixed attributes
/// stay unprefixed.
fn resolve(raw: &str, is_element: bool, lookup: &impl Fn(&str) -> Option<String>) -> QName {
    match raw.split_once(':') {
        Some((prefix, local)) => {
            let prefix = lookup(prefix).unwrap_or_else(|| prefix.to_string());
            QName::new(prefix, local)
        }
        None if is_element => {
            let prefix = lookup("").unwrap_or_default();
            QName::new(prefix, raw)
        }
        None => QName::new("", raw),
    }
}

fn utf8(bytes: &[u8]) -> OdsResult<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| OdsError::InvalidFormat(format!("invalid UTF-8 in XML name: {}", e)))
}
