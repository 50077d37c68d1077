//! Fuzz target for regions document parsing.
//!
//! Feeds arbitrary bytes to the regions parser, including nested response
//! envelopes, checking for panics, crashes, or hangs.

#![no_main]

use boxtag::io::from_regions_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_regions_slice(data);
});
