//! Content tree model: parsing markup fragments into an ordered node tree
//! and serializing them back.
//!
//! A fragment is an ordered forest of [`Node`]s. Element children render in
//! document order; text leaves hold entity-resolved character data. The tree
//! round-trips through parse/serialize with tag nesting preserved, which is
//! what lets the truncation pipeline mutate a working copy and hand the
//! result back as markup.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::MarkupError;

/// Tag names that never take children and never emit a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "wbr",
];

/// Check whether `name` is a void tag (case-insensitive).
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag))
}

/// A single node in a content tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An element with a tag name, attributes, and ordered children.
    Element(Element),
    /// A text leaf holding entity-resolved character data.
    Text(String),
}

/// An element node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source markup.
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

/// Node discriminant used by tree walkers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// A parsed markup fragment: an ordered forest of nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Top-level nodes in document order.
    pub children: Vec<Node>,
}

/// Resolve an entity reference body (the text between `&` and `;`).
///
/// Handles the predefined XML entities, numeric character references, and
/// `nbsp`. Unknown references resolve to `None` and are kept literal by both
/// the parser and the fission scan, so character accounting stays consistent.
pub(crate) fn resolve_entity(body: &str) -> Option<String> {
    if body.eq_ignore_ascii_case("nbsp") {
        return Some("\u{00A0}".to_owned());
    }
    let mut buf = String::with_capacity(body.len() + 2);
    buf.push('&');
    buf.push_str(body);
    buf.push(';');
    quick_xml::escape::unescape(&buf)
        .ok()
        .map(|cow| cow.into_owned())
}

fn reader_offset<R>(reader: &Reader<R>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

impl Fragment {
    /// Parse a markup fragment into a content tree.
    ///
    /// Void tags (`<br>`, `<img>`, ...) are accepted without closing tags.
    /// Unmatched or mismatched closing tags and elements left open at end of
    /// input are [`MarkupError`]s rather than silently repaired trees.
    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().check_end_names = false;

        let mut root: Vec<Node> = Vec::with_capacity(4);
        let mut stack: Vec<Element> = Vec::with_capacity(8);

        fn attach(root: &mut Vec<Node>, stack: &mut [Element], node: Node) {
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => root.push(node),
            }
        }

        fn push_text(root: &mut Vec<Node>, stack: &mut [Element], text: &str) {
            if text.is_empty() {
                return;
            }
            // merge adjacent text data (entity refs split text events)
            let children = match stack.last_mut() {
                Some(parent) => &mut parent.children,
                None => root,
            };
            if let Some(Node::Text(prev)) = children.last_mut() {
                prev.push_str(text);
            } else {
                children.push(Node::Text(text.to_owned()));
            }
        }

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = read_element(&reader, &e)?;
                    if is_void_tag(&element.name) {
                        attach(&mut root, &mut stack, Node::Element(element));
                    } else {
                        stack.push(element);
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = read_element(&reader, &e)?;
                    attach(&mut root, &mut stack, Node::Element(element));
                }
                Ok(Event::End(e)) => {
                    let name = decode_name(&reader, e.name().as_ref())?;
                    match stack.pop() {
                        Some(open) if open.name.eq_ignore_ascii_case(&name) => {
                            attach(&mut root, &mut stack, Node::Element(open));
                        }
                        Some(open) => {
                            return Err(MarkupError::MismatchedClosing {
                                expected: open.name,
                                found: name,
                                offset: reader_offset(&reader),
                            });
                        }
                        None => {
                            return Err(MarkupError::UnmatchedClosing {
                                name,
                                offset: reader_offset(&reader),
                            });
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = reader
                        .decoder()
                        .decode(e.as_ref())
                        .map_err(|err| MarkupError::Parse(format!("text decode: {:?}", err)))?;
                    push_text(&mut root, &mut stack, text.as_ref());
                }
                Ok(Event::CData(e)) => {
                    let text = reader
                        .decoder()
                        .decode(e.as_ref())
                        .map_err(|err| MarkupError::Parse(format!("cdata decode: {:?}", err)))?;
                    push_text(&mut root, &mut stack, text.as_ref());
                }
                Ok(Event::GeneralRef(e)) => {
                    let body = e
                        .decode()
                        .map_err(|err| MarkupError::Parse(format!("entity decode: {:?}", err)))?;
                    match resolve_entity(body.as_ref()) {
                        Some(resolved) => push_text(&mut root, &mut stack, &resolved),
                        None => {
                            // unknown reference stays literal
                            let literal = format!("&{};", body);
                            push_text(&mut root, &mut stack, &literal);
                        }
                    }
                }
                Ok(Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(err) => {
                    return Err(MarkupError::Parse(format!("{}", err)));
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(MarkupError::UnclosedElement { name: open.name });
        }
        Ok(Self { children: root })
    }

    /// True when the fragment holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total rendered text length in Unicode scalar values.
    ///
    /// This is the count the fission scan reproduces on the raw markup, so
    /// the two sides of a cut always account for the same characters.
    pub fn text_len(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Element(el) => count(&el.children),
                    Node::Text(text) => text.chars().count(),
                })
                .sum()
        }
        count(&self.children)
    }

    /// Concatenated text content of every leaf, in document order.
    pub fn visible_text(&self) -> String {
        fn collect(nodes: &[Node], out: &mut String) {
            for node in nodes {
                match node {
                    Node::Element(el) => collect(&el.children, out),
                    Node::Text(text) => out.push_str(text),
                }
            }
        }
        let mut out = String::with_capacity(16);
        collect(&self.children, &mut out);
        out
    }

    /// Look up a node by its child-index path from the fragment root.
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get(first)?;
        for &index in rest {
            match node {
                Node::Element(el) => node = el.children.get(index)?,
                Node::Text(_) => return None,
            }
        }
        Some(node)
    }

    /// Mutable variant of [`Fragment::node`].
    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(first)?;
        for &index in rest {
            match node {
                Node::Element(el) => node = el.children.get_mut(index)?,
                Node::Text(_) => return None,
            }
        }
        Some(node)
    }

    /// Discriminant of the node at `path`, if any.
    pub fn node_kind(&self, path: &[usize]) -> Option<NodeKind> {
        self.node(path).map(|node| match node {
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
        })
    }

    /// Number of children of the node at `path` (the root forest for `[]`).
    pub fn child_count(&self, path: &[usize]) -> usize {
        if path.is_empty() {
            return self.children.len();
        }
        match self.node(path) {
            Some(Node::Element(el)) => el.children.len(),
            _ => 0,
        }
    }

    /// Detach and return the node at `path`.
    pub fn remove(&mut self, path: &[usize]) -> Option<Node> {
        let (&last, parent) = path.split_last()?;
        let children = if parent.is_empty() {
            &mut self.children
        } else {
            match self.node_mut(parent)? {
                Node::Element(el) => &mut el.children,
                Node::Text(_) => return None,
            }
        };
        if last < children.len() {
            Some(children.remove(last))
        } else {
            None
        }
    }

    /// Text content of the leaf at `path`, if `path` names a text leaf.
    pub fn leaf_text(&self, path: &[usize]) -> Option<&str> {
        match self.node(path)? {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// Replace the text content of the leaf at `path`.
    ///
    /// Returns `false` when `path` does not name a text leaf.
    pub fn set_leaf_text(&mut self, path: &[usize], text: String) -> bool {
        match self.node_mut(path) {
            Some(Node::Text(slot)) => {
                *slot = text;
                true
            }
            _ => false,
        }
    }

    /// Serialize the fragment back to markup.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(32);
        for node in &self.children {
            write_node(&mut out, node);
        }
        out
    }
}

fn decode_name<R>(reader: &Reader<R>, raw: &[u8]) -> Result<String, MarkupError> {
    reader
        .decoder()
        .decode(raw)
        .map(|cow| cow.into_owned())
        .map_err(|err| MarkupError::Parse(format!("name decode: {:?}", err)))
}

fn read_element<R>(
    reader: &Reader<R>,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<Element, MarkupError> {
    let name = decode_name(reader, e.name().as_ref())?;
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = decode_name(reader, attr.key.as_ref())?;
        let raw = reader
            .decoder()
            .decode(attr.value.as_ref())
            .map_err(|err| MarkupError::Parse(format!("attribute decode: {:?}", err)))?;
        let value = quick_xml::escape::unescape(raw.as_ref())
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| raw.into_owned());
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&quick_xml::escape::partial_escape(text.as_str())),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&quick_xml::escape::escape(value.as_str()));
                out.push('"');
            }
            out.push('>');
            if is_void_tag(&el.name) {
                return;
            }
            for child in &el.children {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}
