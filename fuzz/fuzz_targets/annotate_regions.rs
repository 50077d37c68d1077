//! Fuzz target for drawing.
//!
//! Parses the input as a regions document and draws it onto a small image.
//! Geometry is never validated before drawing, so arbitrary boxes must
//! still only ever clip.

#![no_main]

use boxtag::annotate::{annotate_regions, AnnotateOptions};
use boxtag::font::FontBook;
use boxtag::io::from_regions_slice;
use image::RgbaImage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let Ok(regions) = from_regions_slice(data) else {
        return;
    };
    let mut image = RgbaImage::new(64, 48);
    let opts = AnnotateOptions {
        font_name: String::new(),
        ..AnnotateOptions::default()
    };
    annotate_regions(&mut image, &regions, &opts, &FontBook::empty(), true);
});
