//! Markup generation and plain-text extraction for UI text.
//!
//! - [`escape_str`]/[`unescape_str`] over a small fixed entity table.
//! - [`encode_text`] for text whose line breaks, tabs and space runs must survive.
//! - [`to_plain_text_str`], a lenient extractor that never fails.
//! - [`Node`] trees and lazily rendered [`HtmlBuilder`]s, with tag factories in [`html`].
pub mod html;

mod builder;
mod elements;
mod encode;
mod entities;
mod node;
mod plain_text;

pub use crate::builder::{HtmlBuffer, HtmlBuilder, RenderCache};
pub use crate::elements::{
    APP_LINK_ATTRIBUTE, ElementBuilder, HtmlElement, HtmlTable, HtmlTableCell,
    StyleElementBuilder, TableBuilder, TableCellBuilder, TextBuilder, VoidElementBuilder,
};
pub use crate::encode::encode_text;
pub use crate::entities::{ENTITY_TABLE, TAB_MARKER, escape, escape_str, unescape, unescape_str};
pub use crate::node::{Attributes, Node};
pub use crate::plain_text::{PlainTextConfig, to_plain_text, to_plain_text_str, to_plain_text_with};
