//! Whitespace-preserving text encoding.
//!
//! [`encode_text`] escapes like [`crate::escape_str`] and additionally rewrites the whitespace
//! a browser would collapse, so the text keeps its layout when embedded in markup:
//! - `\n`, `\r\n` and a lone `\r` become `<br/>`;
//! - `\t` becomes [`crate::TAB_MARKER`];
//! - runs of two or more spaces become the same number of `&nbsp;`. Single spaces stay.
//!
//! [`crate::to_plain_text_str`] reverses the whitespace rewrites.

use crate::entities::{TAB_MARKER, escape_str};

const LINE_BREAK: &str = "<br/>";
const NBSP: &str = "&nbsp;";

/// Encodes `text` for inclusion in markup, preserving line breaks, tabs and space runs.
pub fn encode_text(text: &str) -> String {
    let escaped = escape_str(text);
    let bytes = escaped.as_bytes();
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut copy_start = 0;
    let mut i = 0;

    // Every byte we cut at is ASCII whitespace, so slices stay on char boundaries.
    while i < bytes.len() {
        match bytes[i] {
            b'\r' | b'\n' => {
                out.push_str(&escaped[copy_start..i]);
                out.push_str(LINE_BREAK);
                i += if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                copy_start = i;
            }
            b'\t' => {
                out.push_str(&escaped[copy_start..i]);
                out.push_str(TAB_MARKER);
                i += 1;
                copy_start = i;
            }
            b' ' => {
                let run_start = i;
                while i < bytes.len() && bytes[i] == b' ' {
                    i += 1;
                }
                let run = i - run_start;
                if run > 1 {
                    out.push_str(&escaped[copy_start..run_start]);
                    for _ in 0..run {
                        out.push_str(NBSP);
                    }
                    copy_start = i;
                }
            }
            _ => i += 1,
        }
    }

    out.push_str(&escaped[copy_start..]);
    out
}
