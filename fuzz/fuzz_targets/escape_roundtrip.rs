#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{escape_str, unescape_str};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let escaped = escape_str(input);
    assert!(!escaped.contains(['<', '>', '"', '\'', '/']));
    assert_eq!(unescape_str(&escaped), input);
    let _ = unescape_str(input);
});
