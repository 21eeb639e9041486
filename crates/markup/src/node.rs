use crate::entities::escape_str;
use std::fmt;

/// Ordered attribute list with map semantics: setting an existing name replaces its value in
/// place, so rendering order is always first-insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes ` name="value"` pairs; values are escaped.
    fn write_html(&self, out: &mut String) {
        for (name, value) in &self.entries {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_str(value));
            out.push('"');
        }
    }
}

pub(crate) fn write_element(
    out: &mut String,
    tag: &str,
    attributes: &Attributes,
    children: &[Node],
) {
    out.push('<');
    out.push_str(tag);
    attributes.write_html(out);
    out.push('>');
    for child in children {
        child.write_html(out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

pub(crate) fn write_void(out: &mut String, tag: &str, attributes: &Attributes) {
    out.push('<');
    out.push_str(tag);
    attributes.write_html(out);
    out.push_str("/>");
}

/// Immutable markup tree. Rendering is a pure function of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element {
        tag: String,
        attributes: Attributes,
        children: Vec<Node>,
    },
    /// Rendered as `<tag .../>`, never with children or a closing tag.
    Void {
        tag: String,
        attributes: Attributes,
    },
    /// `escaped` marks content that is already markup-safe and is written verbatim.
    Text {
        content: String,
        escaped: bool,
    },
    /// Children rendered back to back, without a wrapper.
    Fragment(Vec<Node>),
}

impl Node {
    /// Text that is escaped on render.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
            escaped: false,
        }
    }

    /// Pre-escaped markup, written verbatim.
    pub fn raw(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
            escaped: true,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } | Node::Void { tag, .. } => Some(tag),
            Node::Text { .. } | Node::Fragment(_) => None,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Node::Element { attributes, .. } | Node::Void { attributes, .. } => Some(attributes),
            Node::Text { .. } | Node::Fragment(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } | Node::Fragment(children) => children,
            Node::Void { .. } | Node::Text { .. } => &[],
        }
    }

    /// Splits a fragment into its children; any other node becomes a single child.
    pub fn into_children(self) -> Vec<Node> {
        match self {
            Node::Fragment(children) => children,
            other => vec![other],
        }
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Element {
                tag,
                attributes,
                children,
            } => write_element(out, tag, attributes, children),
            Node::Void { tag, attributes } => write_void(out, tag, attributes),
            Node::Text { content, escaped } => {
                if *escaped {
                    out.push_str(content);
                } else {
                    out.push_str(&escape_str(content));
                }
            }
            Node::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::text(text)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::text(text)
    }
}

impl From<&String> for Node {
    fn from(text: &String) -> Self {
        Node::text(text.as_str())
    }
}

/// `None` renders as empty text.
impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(|| Node::text(""), Into::into)
    }
}

impl From<Vec<Node>> for Node {
    fn from(children: Vec<Node>) -> Self {
        Node::Fragment(children)
    }
}
