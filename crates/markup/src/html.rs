//! Factories for common tags.
//!
//! Content is anything convertible into a [`Node`]: text (escaped on render), another builder,
//! or a `Vec<Node>` for several children.
//!
//! ```
//! use markup::html::{div, h2, table, td, tr};
//! use markup::{HtmlBuilder, Node};
//!
//! let html = div(vec![
//!     Node::from(h2("h2")),
//!     table(tr(vec![Node::from(td("A00")), Node::from(td("B00"))])).into(),
//! ]);
//! assert_eq!(
//!     html.to_html(),
//!     "<div><h2>h2</h2><table><tr><td>A00</td><td>B00</td></tr></table></div>"
//! );
//! ```
use crate::elements::{
    ElementBuilder, HtmlElement, StyleElementBuilder, TableBuilder, TableCellBuilder,
    TextBuilder, VoidElementBuilder,
};
use crate::node::Node;

/// CSS class the UI runtime uses to find application links.
pub const APP_LINK_CLASS: &str = "app-link";

pub fn element(tag: &str, content: impl Into<Node>) -> ElementBuilder {
    ElementBuilder::with_content(tag, content)
}

pub fn void_element(tag: &str) -> VoidElementBuilder {
    VoidElementBuilder::new(tag)
}

pub fn div(content: impl Into<Node>) -> ElementBuilder {
    element("div", content)
}

pub fn span(content: impl Into<Node>) -> ElementBuilder {
    element("span", content)
}

pub fn p(content: impl Into<Node>) -> ElementBuilder {
    element("p", content)
}

pub fn b(content: impl Into<Node>) -> ElementBuilder {
    element("b", content)
}

pub fn i(content: impl Into<Node>) -> ElementBuilder {
    element("i", content)
}

pub fn ul(items: impl Into<Node>) -> ElementBuilder {
    element("ul", items)
}

pub fn ol(items: impl Into<Node>) -> ElementBuilder {
    element("ol", items)
}

pub fn li(content: impl Into<Node>) -> ElementBuilder {
    element("li", content)
}

/// `<h1>`..`<h6>`; levels outside `1..=6` are clamped.
pub fn heading(level: u8, content: impl Into<Node>) -> ElementBuilder {
    let clamped = level.clamp(1, 6);
    if clamped != level {
        log::warn!(target: "markup.builder", "heading level {level} clamped to {clamped}");
    }
    element(&format!("h{clamped}"), content)
}

pub fn h1(content: impl Into<Node>) -> ElementBuilder {
    heading(1, content)
}

pub fn h2(content: impl Into<Node>) -> ElementBuilder {
    heading(2, content)
}

pub fn h3(content: impl Into<Node>) -> ElementBuilder {
    heading(3, content)
}

pub fn h4(content: impl Into<Node>) -> ElementBuilder {
    heading(4, content)
}

pub fn h5(content: impl Into<Node>) -> ElementBuilder {
    heading(5, content)
}

pub fn h6(content: impl Into<Node>) -> ElementBuilder {
    heading(6, content)
}

pub fn table(rows: impl Into<Node>) -> TableBuilder {
    TableBuilder::new(rows)
}

pub fn tr(cells: impl Into<Node>) -> ElementBuilder {
    element("tr", cells)
}

pub fn td(content: impl Into<Node>) -> TableCellBuilder {
    TableCellBuilder::new("td", content)
}

pub fn th(content: impl Into<Node>) -> TableCellBuilder {
    TableCellBuilder::new("th", content)
}

pub fn br() -> VoidElementBuilder {
    void_element("br")
}

pub fn hr() -> VoidElementBuilder {
    void_element("hr")
}

pub fn img(src: &str) -> VoidElementBuilder {
    void_element("img").add_attribute("src", src)
}

/// `<a href>` to an external target.
pub fn link(href: &str, content: impl Into<Node>) -> ElementBuilder {
    element("a", content).add_attribute("href", href)
}

/// Inline text that navigates to an application-local `reference` when activated.
pub fn app_link(reference: &str, content: impl Into<Node>) -> ElementBuilder {
    span(content).css_class(APP_LINK_CLASS).app_link(reference)
}

pub fn style_element(css: &str) -> StyleElementBuilder {
    StyleElementBuilder::new(css)
}

/// Several nodes without a wrapper.
pub fn fragment<I, N>(nodes: I) -> TextBuilder
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    nodes
        .into_iter()
        .fold(TextBuilder::new(), |builder, node| builder.node(node))
}

/// Text, escaped on render.
pub fn text(value: &str) -> TextBuilder {
    TextBuilder::new().text(Some(value))
}

/// Pre-escaped markup, e.g. numeric entities, written verbatim.
pub fn raw(markup: &str) -> TextBuilder {
    TextBuilder::new().raw(Some(markup))
}
