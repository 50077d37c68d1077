#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};

pub const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

pub fn gray_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, GRAY)
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    gray_image(width, height).save(path).expect("write png file");
}

pub fn write_text(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write text file");
}
