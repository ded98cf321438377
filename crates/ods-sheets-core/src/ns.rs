//! ODF XML namespaces
//!
//! Element and attribute names in a [`Tag`](crate::tag::Tag) tree always use
//! the canonical prefixes below, whatever prefixes the source document
//! declared. Readers map declared URIs back to these prefixes with
//! [`prefix_for_uri`].

/// A known namespace: canonical prefix and URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

pub const OFFICE: Namespace = Namespace {
    prefix: "office",
    uri: "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
};
pub const STYLE: Namespace = Namespace {
    prefix: "style",
    uri: "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
};
pub const TEXT: Namespace = Namespace {
    prefix: "text",
    uri: "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
};
pub const TABLE: Namespace = Namespace {
    prefix: "table",
    uri: "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
};
pub const DRAW: Namespace = Namespace {
    prefix: "draw",
    uri: "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
};
pub const FO: Namespace = Namespace {
    prefix: "fo",
    uri: "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
};
pub const XLINK: Namespace = Namespace {
    prefix: "xlink",
    uri: "http://www.w3.org/1999/xlink",
};
pub const DC: Namespace = Namespace {
    prefix: "dc",
    uri: "http://purl.org/dc/elements/1.1/",
};
pub const META: Namespace = Namespace {
    prefix: "meta",
    uri: "urn:oasis:names:tc:opendocument:xmlns:meta:1.0",
};
pub const NUMBER: Namespace = Namespace {
    prefix: "number",
    uri: "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0",
};
pub const SVG: Namespace = Namespace {
    prefix: "svg",
    uri: "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
};
pub const OF: Namespace = Namespace {
    prefix: "of",
    uri: "urn:oasis:names:tc:opendocument:xmlns:of:1.2",
};
pub const MANIFEST: Namespace = Namespace {
    prefix: "manifest",
    uri: "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0",
};
pub const LOEXT: Namespace = Namespace {
    prefix: "loext",
    uri: "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0",
};
pub const CALCEXT: Namespace = Namespace {
    prefix: "calcext",
    uri: "urn:org:documentfoundation:names:experimental:calc:xmlns:calcext:1.0",
};

/// Every namespace declared on the root of a written document part
pub const ALL: [Namespace; 15] = [
    OFFICE, STYLE, TEXT, TABLE, DRAW, FO, XLINK, DC, META, NUMBER, SVG, OF, MANIFEST, LOEXT,
    CALCEXT,
];

/// Canonical prefix for a namespace URI
pub fn prefix_for_uri(uri: &str) -> Option<&'static str> {
    ALL.iter().find(|ns| ns.uri == uri).map(|ns| ns.prefix)
}

/// Namespace URI for a canonical prefix
pub fn uri_for_prefix(prefix: &str) -> Option<&'static str> {
    ALL.iter().find(|ns| ns.prefix == prefix).map(|ns| ns.uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        assert_eq!(prefix_for_uri(TABLE.uri), Some("table"));
        assert_eq!(uri_for_prefix("fo"), Some(FO.uri));
        assert_eq!(prefix_for_uri("urn:unknown"), None);
    }
}
