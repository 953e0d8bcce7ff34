//! HTML reader and writer for [`Document`].
//!
//! Reading is done by `scraper` (html5ever), so markup gets the HTML5
//! tree-construction rules and the full named character reference table.
//! The parsed tree is copied into the [`Document`] arena and kept alongside
//! it for selector matching. Writing walks the arena.
//!
//! Input that contains `<!DOCTYPE`, `<html`, `<head` or `<body` is read as a
//! full document; anything else is read as a body fragment and serialized
//! without the implied `html`/`head`/`body` wrappers.

use std::borrow::Cow;
use std::collections::HashMap;

use scraper::Html;
use scraper::node::{Doctype, Node as SourceNode};

use crate::dom::{Document, ElementData, NodeData, NodeId, TextTree};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text is written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Elements that swallow a newline right after the start tag.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["listing", "pre", "textarea"];

const DOCUMENT_MARKERS: &[&str] = &["<!doctype", "<html", "<head", "<body"];

/// Parse markup into a new [`Document`].
pub fn parse(markup: &str) -> Document {
    let full = is_full_document(markup);
    let source = if full {
        Html::parse_document(markup)
    } else {
        Html::parse_fragment(markup)
    };

    let mut doc = Document::new();
    let mut source_nodes = Vec::new();
    {
        let root = doc.root();
        // Fragments are parsed under a synthetic `html` element whose
        // children become top-level nodes.
        let wrapper = if full {
            None
        } else {
            source
                .tree
                .root()
                .children()
                .find(|node| node.value().is_element())
                .map(|node| node.id())
        };
        let mut parents: HashMap<_, NodeId> = HashMap::new();

        for node in source.tree.root().descendants() {
            let parent = match node.parent() {
                Some(parent) if Some(node.id()) != wrapper => parents.get(&parent.id()).copied(),
                _ => {
                    parents.insert(node.id(), root);
                    source_nodes.push(None);
                    continue;
                }
            };
            let data = match node.value() {
                SourceNode::Element(element) => Some(NodeData::Element(ElementData::from_source(
                    element.name(),
                    element.attrs(),
                ))),
                SourceNode::Text(text) => Some(NodeData::Text(text.to_string())),
                SourceNode::Comment(comment) => Some(NodeData::Comment(comment.to_string())),
                SourceNode::Doctype(doctype) => {
                    doc.set_doctype(Some(doctype_declaration(doctype)));
                    None
                }
                _ => None,
            };
            let ours = match (parent, data) {
                (Some(parent), Some(data)) => Some(doc.push_child(parent, data)),
                _ => None,
            };
            if let Some(ours) = ours {
                parents.insert(node.id(), ours);
            }
            source_nodes.push(ours);
        }
    }

    doc.set_source(source, source_nodes);
    doc
}

/// Serialize `node` and its subtree to HTML.
///
/// Serializing the root emits the doctype (if one was read) followed by
/// every top-level node.
pub fn serialize(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

fn is_full_document(markup: &str) -> bool {
    let lower = markup.to_ascii_lowercase();
    DOCUMENT_MARKERS.iter().any(|marker| {
        lower.match_indices(marker).any(|(at, _)| {
            // `<header` must not count as `<head`.
            lower[at + marker.len()..]
                .chars()
                .next()
                .is_none_or(|c| c.is_ascii_whitespace() || c == '>' || c == '/')
        })
    })
}

fn doctype_declaration(doctype: &Doctype) -> String {
    match (doctype.public_id(), doctype.system_id()) {
        ("", "") => doctype.name().to_string(),
        (public, "") => format!("{} PUBLIC \"{public}\"", doctype.name()),
        ("", system) => format!("{} SYSTEM \"{system}\"", doctype.name()),
        (public, system) => format!("{} PUBLIC \"{public}\" \"{system}\"", doctype.name()),
    }
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '\u{a0}']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '\u{a0}']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        Some(NodeData::Document) => {
            if let Some(doctype) = doc.doctype() {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype);
                out.push('>');
            }
            for &child in doc.children(node) {
                write_node(doc, child, out);
            }
        }
        Some(NodeData::Text(text)) => {
            let raw_parent = doc
                .parent(node)
                .and_then(|p| doc.tag(p))
                .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
            if raw_parent {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        Some(NodeData::Comment(comment)) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Some(NodeData::Element(element)) => {
            out.push('<');
            out.push_str(element.tag());
            for (key, value) in element.attrs() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag()) {
                return;
            }
            let children = doc.children(node);
            if LEADING_NEWLINE_ELEMENTS.contains(&element.tag())
                && children
                    .first()
                    .and_then(|&first| doc.text(first))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                out.push('\n');
            }
            for &child in children {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(element.tag());
            out.push('>');
        }
        None => {}
    }
}
