//! Fuzz target for color string parsing.

#![no_main]

use boxtag::color::Color;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = text.parse::<Color>();
    }
});
