//! Element-shaped builders and the capability traits they share.
//!
//! Capabilities compose instead of inheriting: every element builder implements
//! [`HtmlElement`]; tables add [`HtmlTable`] and cells add [`HtmlTableCell`]. All setters take
//! the builder by value and return it, so calls chain. Every setter invalidates the render
//! cache.
use crate::builder::{HtmlBuffer, HtmlBuilder, RenderCache};
use crate::node::{Attributes, Node, write_element, write_void};
use std::fmt;

/// Attribute carrying an application-local navigation reference.
pub const APP_LINK_ATTRIBUTE: &str = "data-ref";

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.bytes().any(|b| {
            b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'<' | b'>' | b'/' | b'=')
        })
}

/// Operations every element builder supports.
pub trait HtmlElement: HtmlBuilder + Sized {
    fn attributes(&self) -> &Attributes;

    fn attributes_mut(&mut self) -> &mut Attributes;

    /// Sets `name` to `value`. Values are escaped on render. Names that cannot be written as
    /// markup are dropped.
    fn add_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        if !is_valid_attribute_name(name) {
            log::warn!(target: "markup.builder", "dropping attribute with invalid name {name:?}");
            return self;
        }
        self.attributes_mut().set(name, value);
        self.invalidate();
        self
    }

    fn css_class(self, class: impl Into<String>) -> Self {
        self.add_attribute("class", class)
    }

    fn style(self, style: impl Into<String>) -> Self {
        self.add_attribute("style", style)
    }

    /// Points the element at an application-local reference, resolved by the UI runtime.
    fn app_link(self, reference: impl Into<String>) -> Self {
        self.add_attribute(APP_LINK_ATTRIBUTE, reference)
    }

    fn id(self, id: impl Into<String>) -> Self {
        self.add_attribute("id", id)
    }
}

/// Table-only convenience setters.
pub trait HtmlTable: HtmlElement {
    #[deprecated(note = "use `style` with CSS `border-spacing` instead")]
    fn cellspacing(self, pixels: u32) -> Self {
        self.add_attribute("cellspacing", pixels.to_string())
    }

    #[deprecated(note = "use `style` with CSS `padding` on the cells instead")]
    fn cellpadding(self, pixels: u32) -> Self {
        self.add_attribute("cellpadding", pixels.to_string())
    }
}

/// Table-cell-only convenience setters.
pub trait HtmlTableCell: HtmlElement {
    fn colspan(self, columns: u32) -> Self {
        self.add_attribute("colspan", columns.to_string())
    }

    fn rowspan(self, rows: u32) -> Self {
        self.add_attribute("rowspan", rows.to_string())
    }
}

/// Generic element: `<tag ...>children</tag>`.
#[derive(Clone, Debug)]
pub struct ElementBuilder {
    tag: String,
    attributes: Attributes,
    children: Vec<Node>,
    cache: RenderCache,
}

impl ElementBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            cache: RenderCache::new(),
        }
    }

    /// Element with `content` as its children; a fragment contributes each of its nodes.
    pub fn with_content(tag: impl Into<String>, content: impl Into<Node>) -> Self {
        Self::new(tag).child(content)
    }

    pub fn child(mut self, content: impl Into<Node>) -> Self {
        self.children.extend(content.into().into_children());
        self.cache.invalidate();
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        for child in children {
            self.children.extend(child.into().into_children());
        }
        self.cache.invalidate();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn into_node(self) -> Node {
        Node::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

impl HtmlBuilder for ElementBuilder {
    fn render(&self, out: &mut HtmlBuffer) {
        write_element(out.as_mut_string(), &self.tag, &self.attributes, &self.children);
    }

    fn cache(&self) -> &RenderCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut RenderCache {
        &mut self.cache
    }
}

impl HtmlElement for ElementBuilder {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

impl From<ElementBuilder> for Node {
    fn from(builder: ElementBuilder) -> Self {
        builder.into_node()
    }
}

/// Void element: `<tag .../>`, optionally followed by inline text.
#[derive(Clone, Debug)]
pub struct VoidElementBuilder {
    tag: String,
    attributes: Attributes,
    trailing: Vec<Node>,
    cache: RenderCache,
}

impl VoidElementBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            trailing: Vec::new(),
            cache: RenderCache::new(),
        }
    }

    /// Text rendered after the self-closing tag.
    pub fn text(mut self, text: impl Into<Node>) -> Self {
        self.trailing.extend(text.into().into_children());
        self.cache.invalidate();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn into_node(self) -> Node {
        let element = Node::Void {
            tag: self.tag,
            attributes: self.attributes,
        };
        if self.trailing.is_empty() {
            return element;
        }
        let mut nodes = Vec::with_capacity(self.trailing.len() + 1);
        nodes.push(element);
        nodes.extend(self.trailing);
        Node::Fragment(nodes)
    }
}

impl HtmlBuilder for VoidElementBuilder {
    fn render(&self, out: &mut HtmlBuffer) {
        write_void(out.as_mut_string(), &self.tag, &self.attributes);
        for text in &self.trailing {
            out.append_node(text);
        }
    }

    fn cache(&self) -> &RenderCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut RenderCache {
        &mut self.cache
    }
}

impl HtmlElement for VoidElementBuilder {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

impl From<VoidElementBuilder> for Node {
    fn from(builder: VoidElementBuilder) -> Self {
        builder.into_node()
    }
}

/// Text without a wrapper element: escaped and raw parts, concatenated.
#[derive(Clone, Debug, Default)]
pub struct TextBuilder {
    parts: Vec<Node>,
    cache: RenderCache,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends text that is escaped on render. `None` appends empty text.
    pub fn text<T: AsRef<str>>(mut self, text: Option<T>) -> Self {
        self.parts
            .push(Node::text(text.as_ref().map_or("", |t| t.as_ref())));
        self.cache.invalidate();
        self
    }

    /// Appends pre-escaped markup, written verbatim.
    pub fn raw<T: AsRef<str>>(mut self, markup: Option<T>) -> Self {
        self.parts
            .push(Node::raw(markup.as_ref().map_or("", |m| m.as_ref())));
        self.cache.invalidate();
        self
    }

    /// Appends any node; fragments contribute each of their children.
    pub fn node(mut self, node: impl Into<Node>) -> Self {
        self.parts.extend(node.into().into_children());
        self.cache.invalidate();
        self
    }

    pub fn into_node(self) -> Node {
        Node::Fragment(self.parts)
    }
}

impl HtmlBuilder for TextBuilder {
    fn render(&self, out: &mut HtmlBuffer) {
        for part in &self.parts {
            match part {
                Node::Text { content, escaped } => {
                    out.append(Some(content.as_str()), !escaped);
                }
                other => {
                    out.append_node(other);
                }
            }
        }
    }

    fn cache(&self) -> &RenderCache {
        &self.cache
    }

    fn cache_mut(&mut self) -> &mut RenderCache {
        &mut self.cache
    }
}

impl From<TextBuilder> for Node {
    fn from(builder: TextBuilder) -> Self {
        builder.into_node()
    }
}

macro_rules! element_decorator {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(ElementBuilder);

        impl $name {
            pub fn child(self, content: impl Into<Node>) -> Self {
                Self(self.0.child(content))
            }

            pub fn tag(&self) -> &str {
                self.0.tag()
            }

            pub fn into_node(self) -> Node {
                self.0.into_node()
            }
        }

        impl HtmlBuilder for $name {
            fn render(&self, out: &mut HtmlBuffer) {
                self.0.render(out);
            }

            fn cache(&self) -> &RenderCache {
                self.0.cache()
            }

            fn cache_mut(&mut self) -> &mut RenderCache {
                self.0.cache_mut()
            }
        }

        impl HtmlElement for $name {
            fn attributes(&self) -> &Attributes {
                self.0.attributes()
            }

            fn attributes_mut(&mut self) -> &mut Attributes {
                self.0.attributes_mut()
            }
        }

        impl From<$name> for Node {
            fn from(builder: $name) -> Self {
                builder.into_node()
            }
        }
    };
}

element_decorator!(
    /// `<table>` with the table-only setters of [`HtmlTable`].
    TableBuilder
);

element_decorator!(
    /// `<td>`/`<th>` with the cell-only setters of [`HtmlTableCell`].
    TableCellBuilder
);

element_decorator!(
    /// `<style>` element. Its content is CSS and is written verbatim.
    StyleElementBuilder
);

impl TableBuilder {
    pub fn new(rows: impl Into<Node>) -> Self {
        Self(ElementBuilder::with_content("table", rows))
    }
}

impl HtmlTable for TableBuilder {}

impl TableCellBuilder {
    pub fn new(tag: impl Into<String>, content: impl Into<Node>) -> Self {
        Self(ElementBuilder::with_content(tag, content))
    }
}

impl HtmlTableCell for TableCellBuilder {}

impl StyleElementBuilder {
    pub fn new(css: impl Into<String>) -> Self {
        Self(ElementBuilder::with_content("style", Node::raw(css)))
    }
}

macro_rules! display_cached_html {
    ($($name:ident),+ $(,)?) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.to_html())
                }
            }
        )+
    };
}

display_cached_html!(
    ElementBuilder,
    VoidElementBuilder,
    TextBuilder,
    TableBuilder,
    TableCellBuilder,
    StyleElementBuilder,
);
