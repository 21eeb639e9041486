//! Lenient markup-to-plain-text extraction.
//!
//! This is a small character-level state machine, not a parser. It never fails: malformed,
//! truncated or unbalanced markup degrades to best-effort text.
//!
//! Rules:
//! - `<head>` content is dropped. Everything outside it is kept, including a body that is never
//!   closed and any trailing content after the head section. A `<head>` without `</head>` ends
//!   at the next `<body>` tag, or right away when there is none.
//! - `<title>`, comments and declarations produce nothing. `<script>`/`<style>` content is
//!   dropped unless [`PlainTextConfig::keep_rawtext`] is set.
//! - `<br>` in any spelling becomes exactly one `\n`; collapsible whitespace around it is dropped.
//! - `</tr>` ends an output line, as does a `<tr>` that follows the cells of an unclosed row.
//!   Cells of one row are joined with [`PlainTextConfig::cell_separator`].
//! - Every other tag, source space run and source newline collapses to at most one space. A lone
//!   `\r` is dropped.
//! - Only `&nbsp;`, `&#9;`, `&amp;` and [`crate::TAB_MARKER`] are decoded. Decoded spaces and
//!   tabs are never collapsed.
//!
//! Known limitations (intentional):
//! - `<` followed by whitespace is literal text, so `< p>` is not a tag.
//! - Section close tags accept only ASCII whitespace before `>` (see `find_close_tag`).
use crate::entities::plain_text_entity_at;
use memchr::memchr;

const HTML_COMMENT_START: &[u8] = b"<!--";
const HTML_COMMENT_END: &str = "-->";
const BODY_OPEN_TAG: &[u8] = b"<body";

/// Options for [`to_plain_text_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainTextConfig {
    /// Emitted between two cells of the same table row. A separator made only of spaces
    /// collapses like any other whitespace.
    pub cell_separator: String,
    /// Keep the content of `<script>` and `<style>` elements as text.
    pub keep_rawtext: bool,
}

impl Default for PlainTextConfig {
    fn default() -> Self {
        Self {
            cell_separator: " ".to_string(),
            keep_rawtext: false,
        }
    }
}

impl PlainTextConfig {
    /// Renders table cells as pipe-separated columns.
    pub fn with_table_columns() -> Self {
        Self {
            cell_separator: " | ".to_string(),
            ..Self::default()
        }
    }
}

/// Converts markup to plain text; `None` stays `None`.
pub fn to_plain_text(markup: Option<&str>) -> Option<String> {
    markup.map(to_plain_text_str)
}

/// Converts markup to plain text with the default [`PlainTextConfig`].
pub fn to_plain_text_str(markup: &str) -> String {
    to_plain_text_with(markup, &PlainTextConfig::default())
}

/// Converts markup to plain text.
pub fn to_plain_text_with(markup: &str, config: &PlainTextConfig) -> String {
    if markup.is_empty() {
        return String::new();
    }
    let mut scanner = Scanner::new(markup, config);
    scanner.run();
    scanner.out.finish()
}

/// Sections whose content is skipped (or, for rawtext, copied without tag interpretation)
/// up to their close tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Head,
    Title,
    Script,
    Style,
}

impl Section {
    fn opened_by(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("head") {
            Some(Self::Head)
        } else if name.eq_ignore_ascii_case("title") {
            Some(Self::Title)
        } else if name.eq_ignore_ascii_case("script") {
            Some(Self::Script)
        } else if name.eq_ignore_ascii_case("style") {
            Some(Self::Style)
        } else {
            None
        }
    }

    fn close_tag(self) -> &'static [u8] {
        match self {
            Self::Head => b"</head",
            Self::Title => b"</title",
            Self::Script => b"</script",
            Self::Style => b"</style",
        }
    }

    fn is_rawtext(self) -> bool {
        matches!(self, Self::Script | Self::Style)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Text,
    Ignored(Section),
    Rawtext(Section),
}

/// Output side of the scanner: owns the collapsing rules for whitespace.
#[derive(Debug)]
struct LineWriter {
    text: String,
    /// A collapsible space was seen since the last content.
    pending_space: bool,
    /// At line start or right after a separator ending in whitespace.
    suppress_space: bool,
}

impl LineWriter {
    fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            pending_space: false,
            suppress_space: true,
        }
    }

    fn soft_space(&mut self) {
        self.pending_space = true;
    }

    fn flush_space(&mut self) {
        if self.pending_space && !self.suppress_space {
            self.text.push(' ');
        }
        self.pending_space = false;
        self.suppress_space = false;
    }

    fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.flush_space();
        self.text.push_str(s);
    }

    fn push_char(&mut self, ch: char) {
        self.flush_space();
        self.text.push(ch);
    }

    fn newline(&mut self) {
        self.pending_space = false;
        self.text.push('\n');
        self.suppress_space = true;
    }

    fn separator(&mut self, separator: &str) {
        if separator.bytes().all(|b| b == b' ') {
            self.soft_space();
            return;
        }
        self.pending_space = false;
        self.text.push_str(separator);
        self.suppress_space = separator.ends_with(|c: char| c.is_whitespace());
    }

    fn finish(self) -> String {
        let trimmed = self.text.trim();
        if trimmed.len() == self.text.len() {
            self.text
        } else {
            trimmed.to_string()
        }
    }
}

struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    mode: Mode,
    cells_in_row: usize,
    config: &'a PlainTextConfig,
    out: LineWriter,
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_text_delimiter(b: u8) -> bool {
    matches!(b, b'<' | b'&' | b' ' | b'\n' | b'\r')
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

/// Finds `close_tag` (e.g. `</head`) case-insensitively, followed by optional ASCII whitespace
/// and `>`. Returns the byte range of the whole close tag.
fn find_close_tag(haystack: &[u8], close_tag: &[u8]) -> Option<(usize, usize)> {
    let len = haystack.len();
    let n = close_tag.len();
    debug_assert!(n >= 2 && close_tag[0] == b'<' && close_tag[1] == b'/');
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &haystack[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if starts_with_ignore_ascii_case_at(haystack, i, close_tag) {
            let mut k = i + n;
            while k < len && haystack[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && haystack[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Finds a start tag opening with `open_tag` (e.g. `<body`) case-insensitively. The name must
/// end there, so `<bodyx` does not match.
fn find_open_tag(haystack: &[u8], open_tag: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i + open_tag.len() <= haystack.len() {
        i += memchr(b'<', &haystack[i..])?;
        if starts_with_ignore_ascii_case_at(haystack, i, open_tag)
            && haystack
                .get(i + open_tag.len())
                .is_none_or(|&b| !is_name_char(b))
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Finds the `>` ending a start tag, skipping quoted attribute values.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            quote @ (b'"' | b'\'') => {
                let close = memchr(quote, &bytes[i + 1..])?;
                i += close + 2;
            }
            _ => i += 1,
        }
    }
    None
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, config: &'a PlainTextConfig) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            mode: Mode::Text,
            cells_in_row: 0,
            config,
            out: LineWriter::new(input.len()),
        }
    }

    // Invariant: `pos` only ever moves past ASCII structural bytes or whole runs ending before
    // one, so every slice taken from `input` starts and ends on a UTF-8 char boundary.
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            match self.mode {
                Mode::Text => self.step_text(),
                Mode::Ignored(section) => self.leave_section(section, false),
                Mode::Rawtext(section) => self.leave_section(section, true),
            }
        }
    }

    fn enter(&mut self, mode: Mode) {
        log::trace!(target: "markup.plain_text", "{:?} -> {:?} at byte {}", self.mode, mode, self.pos);
        self.mode = mode;
    }

    fn step_text(&mut self) {
        match self.bytes[self.pos] {
            b'<' => self.step_markup(),
            b'&' => {
                if let Some((ch, len)) = plain_text_entity_at(self.bytes, self.pos) {
                    self.out.push_char(ch);
                    self.pos += len;
                } else {
                    self.out.push_char('&');
                    self.pos += 1;
                }
            }
            b' ' | b'\n' => {
                self.out.soft_space();
                self.pos += 1;
            }
            // CRLF collapses through its '\n'; a lone CR joins the adjacent text.
            b'\r' => self.pos += 1,
            _ => {
                let start = self.pos;
                let end = self.bytes[start..]
                    .iter()
                    .position(|&b| is_text_delimiter(b))
                    .map_or(self.bytes.len(), |rel| start + rel);
                self.out.push_str(&self.input[start..end]);
                self.pos = end;
            }
        }
    }

    fn step_markup(&mut self) {
        let pos = self.pos;
        if let Some((ch, len)) = plain_text_entity_at(self.bytes, pos) {
            self.out.push_char(ch);
            self.pos += len;
            return;
        }
        if self.bytes[pos..].starts_with(HTML_COMMENT_START) {
            let body = pos + HTML_COMMENT_START.len();
            self.pos = match self.input[body..].find(HTML_COMMENT_END) {
                Some(end) => body + end + HTML_COMMENT_END.len(),
                None => self.bytes.len(),
            };
            return;
        }
        match self.bytes.get(pos + 1).copied() {
            Some(b'!') | Some(b'?') => match memchr(b'>', &self.bytes[pos..]) {
                Some(rel) => self.pos = pos + rel + 1,
                None => self.literal_rest(),
            },
            Some(b'/') => {
                let name_end = self.scan_name(pos + 2);
                if name_end == pos + 2 {
                    self.literal_lt();
                    return;
                }
                let Some(rel) = memchr(b'>', &self.bytes[name_end..]) else {
                    self.literal_rest();
                    return;
                };
                let name = &self.input[pos + 2..name_end];
                self.pos = name_end + rel + 1;
                self.end_tag(name);
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let name_end = self.scan_name(pos + 1);
                let Some(gt) = find_tag_end(self.bytes, name_end) else {
                    self.literal_rest();
                    return;
                };
                let self_closing = gt > name_end && self.bytes[gt - 1] == b'/';
                let name = &self.input[pos + 1..name_end];
                self.pos = gt + 1;
                self.start_tag(name, self_closing);
            }
            _ => self.literal_lt(),
        }
    }

    fn scan_name(&self, start: usize) -> usize {
        let mut j = start;
        while j < self.bytes.len() && is_name_char(self.bytes[j]) {
            j += 1;
        }
        j
    }

    fn literal_lt(&mut self) {
        self.out.push_char('<');
        self.pos += 1;
    }

    /// An unterminated tag: keep the remainder as text.
    fn literal_rest(&mut self) {
        log::trace!(target: "markup.plain_text", "unterminated tag at byte {}", self.pos);
        self.out.push_str(&self.input[self.pos..]);
        self.pos = self.bytes.len();
    }

    fn start_tag(&mut self, name: &str, self_closing: bool) {
        if name.eq_ignore_ascii_case("br") {
            self.out.newline();
            return;
        }
        if let Some(section) = Section::opened_by(name)
            && !self_closing
        {
            let mode = if section.is_rawtext() && self.config.keep_rawtext {
                Mode::Rawtext(section)
            } else {
                Mode::Ignored(section)
            };
            self.enter(mode);
            return;
        }
        if name.eq_ignore_ascii_case("tr") {
            // `</tr>` may be omitted; an open row still ends its line.
            if self.cells_in_row > 0 {
                self.out.newline();
            } else {
                self.out.soft_space();
            }
            self.cells_in_row = 0;
        } else if name.eq_ignore_ascii_case("td") || name.eq_ignore_ascii_case("th") {
            if self.cells_in_row > 0 {
                self.out.separator(&self.config.cell_separator);
            } else {
                self.out.soft_space();
            }
            self.cells_in_row += 1;
        } else {
            self.out.soft_space();
        }
    }

    fn end_tag(&mut self, name: &str) {
        if name.eq_ignore_ascii_case("tr") {
            self.cells_in_row = 0;
            self.out.newline();
        } else {
            if name.eq_ignore_ascii_case("table") {
                self.cells_in_row = 0;
            }
            self.out.soft_space();
        }
    }

    fn leave_section(&mut self, section: Section, keep_content: bool) {
        let start = self.pos;
        let (content_end, resume) = match find_close_tag(&self.bytes[start..], section.close_tag())
        {
            Some((rel_start, rel_end)) => (start + rel_start, start + rel_end),
            // An unterminated head ends where the body starts. Without a body tag nothing is
            // dropped: head-only elements produce no text on their own.
            None if section == Section::Head => {
                let end = find_open_tag(&self.bytes[start..], BODY_OPEN_TAG)
                    .map_or(start, |rel| start + rel);
                log::trace!(target: "markup.plain_text", "unterminated head ends at byte {end}");
                (end, end)
            }
            None => (self.bytes.len(), self.bytes.len()),
        };
        if keep_content {
            self.rawtext_run(start, content_end);
        }
        self.pos = resume;
        self.enter(Mode::Text);
        self.out.soft_space();
    }

    /// Copies rawtext without tag or entity interpretation, collapsing whitespace.
    fn rawtext_run(&mut self, start: usize, end: usize) {
        let raw = &self.input[start..end];
        let mut first = true;
        for line in raw.split(['\n', ' ']) {
            if !first {
                self.out.soft_space();
            }
            first = false;
            self.out.push_str(&line.replace('\r', ""));
        }
    }
}
