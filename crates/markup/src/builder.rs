//! Lazily rendered builders.
//!
//! A builder renders on first read and caches the markup until invalidated. The cache lives in a
//! [`OnceCell`], which makes every builder `!Sync`: one owner configures and renders it. Built
//! [`Node`] trees carry no cache and can be shared freely.
use crate::entities::escape_str;
use crate::node::Node;
use crate::plain_text::to_plain_text_str;
use std::cell::OnceCell;

/// Output buffer handed to [`HtmlBuilder::render`].
#[derive(Debug, Default)]
pub struct HtmlBuffer {
    out: String,
}

impl HtmlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value`, escaped when `escape` is set. `None` appends nothing.
    pub fn append(&mut self, value: Option<&str>, escape: bool) -> &mut Self {
        match value {
            Some(v) if escape => self.out.push_str(&escape_str(v)),
            Some(v) => self.out.push_str(v),
            None => {}
        }
        self
    }

    pub fn append_node(&mut self, node: &Node) -> &mut Self {
        node.write_html(&mut self.out);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub(crate) fn as_mut_string(&mut self) -> &mut String {
        &mut self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// Render-once cache. Starts invalid; [`RenderCache::invalidate`] makes the next read
/// re-render.
#[derive(Clone, Debug, Default)]
pub struct RenderCache {
    value: OnceCell<String>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn invalidate(&mut self) {
        self.value.take();
    }

    pub fn get_or_render(&self, render: impl FnOnce(&mut HtmlBuffer)) -> &str {
        self.value.get_or_init(|| {
            let mut buffer = HtmlBuffer::new();
            render(&mut buffer);
            log::trace!(target: "markup.builder", "rendered {} bytes", buffer.as_str().len());
            buffer.into_string()
        })
    }
}

/// A markup fragment that renders lazily.
///
/// Implementors provide [`render`](HtmlBuilder::render) and access to their cache; reads go
/// through [`to_html`](HtmlBuilder::to_html), which renders at most once per invalidation.
pub trait HtmlBuilder {
    fn render(&self, out: &mut HtmlBuffer);

    fn cache(&self) -> &RenderCache;

    fn cache_mut(&mut self) -> &mut RenderCache;

    fn to_html(&self) -> &str {
        self.cache().get_or_render(|out| self.render(out))
    }

    /// Always derived from the current [`to_html`](HtmlBuilder::to_html); never cached itself.
    fn to_plain_text(&self) -> String {
        to_plain_text_str(self.to_html())
    }

    fn invalidate(&mut self) {
        self.cache_mut().invalidate();
    }

    fn len(&self) -> usize {
        self.to_html().len()
    }

    fn is_empty(&self) -> bool {
        self.to_html().is_empty()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.to_html().chars().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counting {
        value: Option<String>,
        renders: Cell<usize>,
        cache: RenderCache,
    }

    impl HtmlBuilder for Counting {
        fn render(&self, out: &mut HtmlBuffer) {
            self.renders.set(self.renders.get() + 1);
            out.append(Some("<b>"), false)
                .append(self.value.as_deref(), true)
                .append(Some("</b>"), false);
        }

        fn cache(&self) -> &RenderCache {
            &self.cache
        }

        fn cache_mut(&mut self) -> &mut RenderCache {
            &mut self.cache
        }
    }

    #[test]
    fn renders_once_until_invalidated() {
        let mut builder = Counting {
            value: Some("a&b".to_string()),
            ..Counting::default()
        };
        assert!(!builder.cache().is_valid());
        assert_eq!(builder.to_html(), "<b>a&amp;b</b>");
        assert_eq!(builder.len(), 14);
        assert_eq!(builder.char_at(1), Some('b'));
        assert_eq!(builder.char_at(99), None);
        assert_eq!(builder.renders.get(), 1);
        assert!(builder.cache().is_valid());

        builder.value = Some("c".to_string());
        assert_eq!(builder.to_html(), "<b>a&amp;b</b>");
        builder.invalidate();
        assert!(!builder.cache().is_valid());
        assert_eq!(builder.to_html(), "<b>c</b>");
        assert_eq!(builder.renders.get(), 2);
    }

    #[test]
    fn plain_text_follows_latest_invalidation() {
        let mut builder = Counting {
            value: Some("first".to_string()),
            ..Counting::default()
        };
        assert_eq!(builder.to_plain_text(), "first");
        builder.value = Some("second".to_string());
        builder.invalidate();
        assert_eq!(builder.to_plain_text(), "second");
    }

    #[test]
    fn append_none_is_empty() {
        let mut buffer = HtmlBuffer::new();
        buffer.append(None, true).append(Some("<x>"), false).append(None, false);
        assert_eq!(buffer.as_str(), "<x>");
        let builder = Counting::default();
        assert_eq!(builder.to_html(), "<b></b>");
        assert!(!builder.is_empty());
    }
}
