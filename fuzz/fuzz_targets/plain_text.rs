#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{PlainTextConfig, to_plain_text_str, to_plain_text_with};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let text = to_plain_text_str(&input);
    assert_eq!(text.trim(), text);

    let config = PlainTextConfig {
        keep_rawtext: true,
        ..PlainTextConfig::with_table_columns()
    };
    let _ = to_plain_text_with(&input, &config);
});
