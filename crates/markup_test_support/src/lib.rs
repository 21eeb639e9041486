use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const PLAIN_TEXT_FORMAT_V1: &str = "markup-plain-text-v1";
pub const ESCAPE_FORMAT_V1: &str = "markup-escape-v1";

/// Only cases whose id contains this substring run.
pub const FIXTURE_FILTER_ENV: &str = "MARKUP_FIXTURE_FILTER";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PlainTextCase {
    pub id: String,
    pub input: String,
    pub expected: String,
    /// Use the pipe-separated table preset instead of the default config.
    #[serde(default)]
    pub table_columns: bool,
    #[serde(default)]
    pub keep_rawtext: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
struct PlainTextManifest {
    format: String,
    cases: Vec<PlainTextCase>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct EscapeCase {
    pub id: String,
    /// `null` exercises the absent-input path.
    pub raw: Option<String>,
    pub escaped: Option<String>,
    /// Only `unescape(escaped) == raw` is checked; `escaped` is not what `escape` produces.
    #[serde(default)]
    pub unescape_only: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
struct EscapeManifest {
    format: String,
    cases: Vec<EscapeCase>,
}

pub fn load_plain_text_cases(path: &Path) -> Vec<PlainTextCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read plain-text corpus {path:?}: {err}"));
    let manifest: PlainTextManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse plain-text corpus {path:?}: {err}"));
    if let Err(err) = validate_manifest(
        &manifest.format,
        PLAIN_TEXT_FORMAT_V1,
        manifest.cases.iter().map(|case| case.id.as_str()),
    ) {
        panic!("invalid plain-text corpus {path:?}: {err}");
    }
    filter_cases(manifest.cases, |case| case.id.as_str())
}

pub fn load_escape_cases(path: &Path) -> Vec<EscapeCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read escape corpus {path:?}: {err}"));
    let manifest: EscapeManifest = serde_json::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse escape corpus {path:?}: {err}"));
    if let Err(err) = validate_manifest(
        &manifest.format,
        ESCAPE_FORMAT_V1,
        manifest.cases.iter().map(|case| case.id.as_str()),
    ) {
        panic!("invalid escape corpus {path:?}: {err}");
    }
    filter_cases(manifest.cases, |case| case.id.as_str())
}

fn validate_manifest<'a>(
    format: &str,
    expected_format: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), String> {
    if format != expected_format {
        return Err(format!(
            "unsupported format '{format}', expected '{expected_format}'"
        ));
    }
    let mut seen = BTreeSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err("case with empty id".to_string());
        }
        if !seen.insert(id) {
            return Err(format!("duplicate case id '{id}'"));
        }
    }
    if seen.is_empty() {
        return Err("corpus has no cases".to_string());
    }
    Ok(())
}

fn filter_cases<T>(cases: Vec<T>, id: impl Fn(&T) -> &str) -> Vec<T> {
    let Some(filter) = std::env::var(FIXTURE_FILTER_ENV)
        .ok()
        .filter(|value| !value.is_empty())
    else {
        return cases;
    };
    cases
        .into_iter()
        .filter(|case| id(case).contains(filter.as_str()))
        .collect()
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{a0}' => out.push_str("\\u{A0}"),
            ch if ch < ' ' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Splits into lines for [`diff_lines`], keeping a trailing empty line visible.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(escape_text).collect()
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;
    let max = expected.len().max(actual.len());
    let missing = "<missing>";
    let line = |lines: &[String], idx: usize| -> String {
        lines
            .get(idx)
            .map(String::clone)
            .unwrap_or_else(|| missing.to_string())
    };
    let mut out = String::new();
    let mismatch = (0..max).find(|&i| line(expected, i) != line(actual, i));
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(
                &mut out,
                "{marker} {:>4}  expected: {}",
                line_idx + 1,
                line(expected, line_idx)
            );
            let _ = writeln!(
                &mut out,
                "{marker} {:>4}    actual: {}",
                line_idx + 1,
                line(actual, line_idx)
            );
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_makes_whitespace_visible() {
        assert_eq!(escape_text("a\tb\r\n\"c\"\u{1}"), "a\\tb\\r\\n\\\"c\\\"\\u{01}");
    }

    #[test]
    fn diff_points_at_first_mismatch() {
        let expected = split_lines("one\ntwo\nthree");
        let actual = split_lines("one\n2\nthree");
        let diff = diff_lines(&expected, &actual);
        assert!(diff.starts_with("first mismatch at line 2"));
        assert!(diff.contains(">    2  expected: two"));
        assert!(diff.contains(">    2    actual: 2"));
    }

    #[test]
    fn validation_rejects_duplicates_and_wrong_format() {
        let ids = ["a", "b", "a"];
        assert_eq!(
            validate_manifest(ESCAPE_FORMAT_V1, ESCAPE_FORMAT_V1, ids.into_iter()),
            Err("duplicate case id 'a'".to_string())
        );
        assert!(validate_manifest("v0", ESCAPE_FORMAT_V1, ["a"].into_iter()).is_err());
        assert!(validate_manifest(ESCAPE_FORMAT_V1, ESCAPE_FORMAT_V1, std::iter::empty()).is_err());
    }

    #[test]
    fn escape_manifest_accepts_null_inputs() {
        let manifest: EscapeManifest = serde_json::from_str(
            r#"{"format":"markup-escape-v1","cases":[{"id":"none","raw":null,"escaped":null}]}"#,
        )
        .expect("manifest parses");
        assert_eq!(manifest.cases[0].raw, None);
        assert!(!manifest.cases[0].unescape_only);
    }
}
