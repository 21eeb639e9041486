#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{encode_text, to_plain_text_str};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let encoded = encode_text(input);
    assert!(!encoded.contains(['\n', '\r', '\t']));
    let _ = to_plain_text_str(&encoded);
});
