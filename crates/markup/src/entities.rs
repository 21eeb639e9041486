//! Fixed entity table shared by the escaper, the unescaper and the plain-text extractor.
//!
//! Contract:
//! - The protected set is exactly `&`, `<`, `>`, `"`, `'` and `/`.
//! - [`escape_str`] and [`unescape_str`] are single left-to-right passes. Output is never
//!   re-scanned, so escaping is not idempotent and unescaping decodes exactly one level.
//! - Any other named or numeric entity (`&ouml;`, `&#215;`, `&apos;`) is not recognized and
//!   passes through unchanged.
use memchr::memchr;
use std::borrow::Cow;

/// The protected characters and their escaped forms, in table order.
pub const ENTITY_TABLE: [(char, &str); 6] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
    ('/', "&#47;"),
];

/// Sentinel emitted by [`crate::encode_text`] for a tab character. The plain-text extractor
/// decodes it back to `\t`.
pub const TAB_MARKER: &str = "<span style=\"white-space:pre\">&#9;</span>";

const NBSP: &str = "&nbsp;";
const NUMERIC_TAB: &str = "&#9;";
const AMP: &str = "&amp;";

fn escaped_form(b: u8) -> Option<&'static str> {
    match b {
        b'&' => Some("&amp;"),
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&#39;"),
        b'/' => Some("&#47;"),
        _ => None,
    }
}

fn starts_with_bytes(bytes: &[u8], i: usize, pat: &[u8]) -> bool {
    bytes.get(i..i + pat.len()).is_some_and(|s| s == pat)
}

/// Escapes `text`; `None` stays `None`.
pub fn escape(text: Option<&str>) -> Option<String> {
    text.map(|t| escape_str(t).into_owned())
}

/// Replaces each protected character with its escaped form in one pass.
///
/// Whitespace, tabs and newlines are copied unchanged. Borrows when nothing needs replacing.
pub fn escape_str(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = bytes.iter().position(|&b| escaped_form(b).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + s.len() / 4 + 8);
    let mut copy_start = 0;
    // Protected characters are ASCII, so every cut below lands on a UTF-8 char boundary.
    for (i, &b) in bytes.iter().enumerate().skip(first) {
        if let Some(replacement) = escaped_form(b) {
            out.push_str(&s[copy_start..i]);
            out.push_str(replacement);
            copy_start = i + 1;
        }
    }
    out.push_str(&s[copy_start..]);
    Cow::Owned(out)
}

/// Unescapes `text`; `None` stays `None`.
pub fn unescape(text: Option<&str>) -> Option<String> {
    text.map(|t| unescape_str(t).into_owned())
}

/// Decodes the six escaped forms of [`ENTITY_TABLE`] in one pass.
///
/// Every other `&`-led sequence is copied through byte for byte. Borrows when the input holds
/// no `&`.
pub fn unescape_str(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;
    let mut copy_start = first;

    while i < bytes.len() {
        let Some(rel) = memchr(b'&', &bytes[i..]) else {
            break;
        };
        i += rel;
        if copy_start < i {
            out.push_str(&s[copy_start..i]);
        }

        let matched = ENTITY_TABLE
            .iter()
            .find(|(_, escaped)| starts_with_bytes(bytes, i, escaped.as_bytes()));
        match matched {
            Some((literal, escaped)) => {
                out.push(*literal);
                i += escaped.len();
            }
            None => {
                // keep '&' as-is
                out.push('&');
                i += 1;
            }
        }
        copy_start = i;
    }

    if copy_start < bytes.len() {
        out.push_str(&s[copy_start..]);
    }
    Cow::Owned(out)
}

/// Matches the plain-text decode set at byte offset `i`.
///
/// Returns the decoded character and the number of input bytes consumed. Recognized forms:
/// the tab marker, `&#9;`, `&amp;` and `&nbsp;`.
pub(crate) fn plain_text_entity_at(bytes: &[u8], i: usize) -> Option<(char, usize)> {
    match bytes.get(i)? {
        b'<' if starts_with_bytes(bytes, i, TAB_MARKER.as_bytes()) => {
            Some(('\t', TAB_MARKER.len()))
        }
        b'&' => {
            if starts_with_bytes(bytes, i, NBSP.as_bytes()) {
                Some((' ', NBSP.len()))
            } else if starts_with_bytes(bytes, i, NUMERIC_TAB.as_bytes()) {
                Some(('\t', NUMERIC_TAB.len()))
            } else if starts_with_bytes(bytes, i, AMP.as_bytes()) {
                Some(('&', AMP.len()))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_none_and_empty() {
        assert_eq!(escape(None), None);
        assert_eq!(escape(Some("")), Some(String::new()));
    }

    #[test]
    fn escape_replaces_protected_characters() {
        assert_eq!(escape_str("one & two"), "one &amp; two");
        assert_eq!(
            escape_str("this is \"good\""),
            "this is &quot;good&quot;"
        );
        assert_eq!(
            escape_str("<a href='x/y'>"),
            "&lt;a href=&#39;x&#47;y&#39;&gt;"
        );
    }

    #[test]
    fn escape_leaves_whitespace_untouched() {
        let input = "plain  text\twith\nnewlines\r\n 123";
        assert!(matches!(escape_str(input), Cow::Borrowed(_)));
        assert_eq!(escape_str(input), input);
    }

    #[test]
    fn escape_is_single_pass_and_not_idempotent() {
        assert_eq!(escape_str("a&nbsp;b"), "a&amp;nbsp;b");
        assert_eq!(escape_str(&escape_str("&")), "&amp;amp;");
    }

    #[test]
    fn escape_preserves_utf8() {
        assert_eq!(escape_str("π < σ ×"), "π &lt; σ ×");
        assert_eq!(escape_str("café/thé"), "café&#47;thé");
    }

    #[test]
    fn unescape_handles_none_and_empty() {
        assert_eq!(unescape(None), None);
        assert_eq!(unescape(Some("")), Some(String::new()));
    }

    #[test]
    fn unescape_decodes_fixed_set() {
        assert_eq!(unescape_str("one&amp;nbsp;&amp;nbsp; two"), "one&nbsp;&nbsp; two");
        assert_eq!(
            unescape_str("&lt;p&gt;&quot;x&quot; &#39;y&#39; a&#47;b&lt;&#47;p&gt;"),
            "<p>\"x\" 'y' a/b</p>"
        );
    }

    #[test]
    fn unescape_decodes_only_one_level() {
        assert_eq!(unescape_str("&amp;amp;"), "&amp;");
        assert_eq!(unescape_str("&amp;lt;"), "&lt;");
    }

    #[test]
    fn unescape_passes_through_unknown_and_malformed() {
        assert_eq!(unescape_str("hell&ouml;"), "hell&ouml;");
        assert_eq!(unescape_str("&apos;&nbsp;&#215;"), "&apos;&nbsp;&#215;");
        assert_eq!(unescape_str("&amp"), "&amp");
        assert_eq!(unescape_str("a & b"), "a & b");
        assert_eq!(unescape_str("&&&lt;"), "&&<");
        assert_eq!(unescape_str("&"), "&");
    }

    #[test]
    fn unescape_reverses_escape_for_plain_text() {
        let samples = ["", "plain", "multi\nline\ttext", "päärynä 120×32", "x  y"];
        for s in samples {
            assert_eq!(unescape_str(&escape_str(s)), s);
        }
        let protected = "<a href=\"/x\">Tom & Jerry's</a>";
        assert_eq!(unescape_str(&escape_str(protected)), protected);
    }

    #[test]
    fn plain_text_entity_set_is_closed() {
        let bytes = b"&nbsp;&#9;&amp;&lt;&ouml;";
        assert_eq!(plain_text_entity_at(bytes, 0), Some((' ', 6)));
        assert_eq!(plain_text_entity_at(bytes, 6), Some(('\t', 4)));
        assert_eq!(plain_text_entity_at(bytes, 10), Some(('&', 5)));
        assert_eq!(plain_text_entity_at(bytes, 15), None);
        assert_eq!(plain_text_entity_at(bytes, 19), None);
        assert_eq!(
            plain_text_entity_at(TAB_MARKER.as_bytes(), 0),
            Some(('\t', TAB_MARKER.len()))
        );
        assert_eq!(plain_text_entity_at(b"", 0), None);
    }
}
