use markup::{PlainTextConfig, encode_text, to_plain_text_str, to_plain_text_with};
use markup_test_support::{
    FIXTURE_FILTER_ENV, PlainTextCase, diff_lines, escape_text, load_plain_text_cases,
    split_lines,
};
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn config_for(case: &PlainTextCase) -> PlainTextConfig {
    let mut config = if case.table_columns {
        PlainTextConfig::with_table_columns()
    } else {
        PlainTextConfig::default()
    };
    config.keep_rawtext = case.keep_rawtext;
    config
}

#[test]
fn plain_text_golden_corpus() {
    let cases = load_plain_text_cases(&fixtures_dir().join("plain_text.toml"));
    assert!(
        !cases.is_empty(),
        "no plain-text cases matched {FIXTURE_FILTER_ENV}"
    );
    let mut failures = Vec::new();
    for case in &cases {
        let actual = to_plain_text_with(&case.input, &config_for(case));
        if actual != case.expected {
            failures.push(format!(
                "case '{}' (input \"{}\")\n{}",
                case.id,
                escape_text(&case.input),
                diff_lines(&split_lines(&case.expected), &split_lines(&actual))
            ));
        }
    }
    assert!(
        failures.is_empty(),
        "{} of {} plain-text cases failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}

#[test]
fn extraction_is_idempotent_on_corpus_output() {
    // Output without markup, entities or uncollapsible whitespace extracts to itself.
    for case in load_plain_text_cases(&fixtures_dir().join("plain_text.toml")) {
        if case.expected.contains(['<', '&', '\t']) || case.expected.contains("  ") {
            continue;
        }
        let again = to_plain_text_str(&case.expected.replace('\n', "<br>"));
        assert_eq!(again, case.expected, "case '{}'", case.id);
    }
}

#[test]
fn encoded_text_restores_layout() {
    let samples = [
        "a\nb\tc   d",
        "line one\r\nline two\rthree",
        "  leading and trailing  ",
        "tabs\t\tin\ta row",
        "1 < 2 & 3 > 2",
    ];
    for sample in samples {
        let restored = to_plain_text_str(&encode_text(sample));
        let expected = markup::escape_str(&sample.replace("\r\n", "\n").replace('\r', "\n"))
            .replace("&amp;", "&")
            .trim()
            .to_string();
        assert_eq!(
            restored,
            expected,
            "sample \"{}\"",
            escape_text(sample)
        );
    }
}
