//! Drawing detection boxes and label tags onto images.
//!
//! [`annotate`] draws one region: an outline of the requested thickness and
//! a filled tag holding the label text. The tag sits on top of the box when
//! there is room for it between the box and the top edge of the image, and
//! hangs below the box otherwise.
//!
//! Nothing here validates geometry. Boxes that are inverted, degenerate or
//! partly off-canvas are drawn as far as they overlap the image, and each
//! call overwrites whatever earlier calls left in the pixels it touches.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use log::trace;

use crate::color::Color;
use crate::font::{FontBook, LabelFont, DEFAULT_FONT_NAME};
use crate::geom::{BBoxXYXY, Pixel, Region, RegionBox};

/// Vertical padding above and below the text, as a fraction of its height.
pub const TAG_PADDING_RATIO: f64 = 0.05;

/// Tag margin as a fraction of the text height (rounded up to whole pixels).
pub const TAG_MARGIN_RATIO: f64 = 0.1;

/// Color of the label text inside the tag.
pub const LABEL_TEXT_COLOR: Color = Color::WHITE;

/// How regions are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotateOptions {
    /// Outline and tag background color.
    pub color: Color,
    /// Outline width in pixels; 0 draws no outline.
    pub thickness: u32,
    /// Preferred font, by file name or path.
    pub font_name: String,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            thickness: 2,
            font_name: DEFAULT_FONT_NAME.to_string(),
        }
    }
}

/// Placement of a label tag, in image pixels.
///
/// `bottom` is the anchor edge: either the top of the box or, when the tag
/// would not fit above it, the box bottom plus the tag height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelTag {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// Top-left corner of the label text.
    pub text_x: f64,
    pub text_y: f64,
    pub margin: f64,
}

impl LabelTag {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Height reserved for a tag holding text `text_height` pixels tall.
pub fn tag_total_height(text_height: u32) -> f64 {
    text_height as f64 * (1.0 + 2.0 * TAG_PADDING_RATIO)
}

/// Computes where the tag for a box goes, given the measured label size.
pub fn tag_layout(bbox: &BBoxXYXY<Pixel>, text_width: u32, text_height: u32) -> LabelTag {
    let text_h = text_height as f64;
    let margin = (TAG_MARGIN_RATIO * text_h).ceil();
    let total_height = tag_total_height(text_height);

    let bottom = if bbox.ymin() > total_height {
        bbox.ymin()
    } else {
        bbox.ymax() + total_height
    };
    let left = bbox.xmin();
    let top = bottom - text_h - 2.0 * margin;

    LabelTag {
        left,
        top,
        right: left + text_width as f64 + 4.0 * margin,
        bottom,
        text_x: left + margin,
        text_y: top + margin,
        margin,
    }
}

/// Draws one labelled region onto `image` and returns the same image.
///
/// The font is chosen from `fonts` at a size proportional to the image
/// width; if it cannot be loaded the built-in bitmap font is used.
pub fn annotate<'a>(
    image: &'a mut RgbaImage,
    bbox: &RegionBox,
    label: &str,
    opts: &AnnotateOptions,
    fonts: &FontBook,
) -> &'a mut RgbaImage {
    let font = fonts.font_for_width(&opts.font_name, image.width());
    draw_region(image, bbox, label, opts.color, opts.thickness, &font);
    image
}

/// Draws every region in order, loading the font once.
///
/// A region's own color wins over `opts.color`. With `show_scores`, scored
/// regions are labelled `label: NN%`.
pub fn annotate_regions<'a>(
    image: &'a mut RgbaImage,
    regions: &[Region],
    opts: &AnnotateOptions,
    fonts: &FontBook,
    show_scores: bool,
) -> &'a mut RgbaImage {
    let font = fonts.font_for_width(&opts.font_name, image.width());
    for region in regions {
        let color = region.color.unwrap_or(opts.color);
        let label = region.display_label(show_scores);
        draw_region(image, &region.bbox, &label, color, opts.thickness, &font);
    }
    image
}

/// Draws a region with an already-loaded font and returns the tag placement.
pub fn draw_region(
    image: &mut RgbaImage,
    bbox: &RegionBox,
    label: &str,
    color: Color,
    thickness: u32,
    font: &LabelFont,
) -> LabelTag {
    let (width, height) = image.dimensions();
    let px = bbox.resolve(width, height);
    let color = color.to_rgba();

    if thickness > 0 {
        let corners = [
            (px.xmin(), px.ymin()),
            (px.xmin(), px.ymax()),
            (px.xmax(), px.ymax()),
            (px.xmax(), px.ymin()),
            (px.xmin(), px.ymin()),
        ];
        for segment in corners.windows(2) {
            draw_segment(image, segment[0], segment[1], thickness, color);
        }
    }

    let (text_w, text_h) = font.measure(label);
    let tag = tag_layout(&px, text_w, text_h);
    trace!("label {:?} at {:?}, tag {:?}", label, px, tag);

    // Text only goes where the tag is at least partly visible, which also
    // keeps its origin within i32 range.
    if fill_rect(image, tag.left, tag.top, tag.right, tag.bottom, color) {
        font.draw(
            image,
            LABEL_TEXT_COLOR.to_rgba(),
            tag.text_x.round() as i32,
            tag.text_y.round() as i32,
            label,
        );
    }
    tag
}

/// Draws an axis-aligned segment `thickness` pixels wide, centred on the
/// line and extended by half the width past each end so corners join.
fn draw_segment(
    image: &mut RgbaImage,
    from: (f64, f64),
    to: (f64, f64),
    thickness: u32,
    color: Rgba<u8>,
) {
    let half = thickness as f64 / 2.0;
    fill_rect(
        image,
        from.0.min(to.0) - half,
        from.1.min(to.1) - half,
        from.0.max(to.0) + half,
        from.1.max(to.1) + half,
        color,
    );
}

/// Fills the pixels of `[x0, x1) x [y0, y1)` that fall inside the image.
/// Returns false when nothing was drawn.
fn fill_rect(image: &mut RgbaImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) -> bool {
    let (width, height) = image.dimensions();
    match (clip_span(x0, x1, width), clip_span(y0, y1, height)) {
        (Some((x, w)), Some((y, h))) => {
            draw_filled_rect_mut(image, Rect::at(x as i32, y as i32).of_size(w, h), color);
            true
        }
        _ => false,
    }
}

/// Rounds `[a, b)` to pixel edges and clips it to `[0, limit)`, returning
/// `(start, len)` when any pixels remain. NaN bounds yield nothing.
fn clip_span(a: f64, b: f64, limit: u32) -> Option<(u32, u32)> {
    let limit_f = limit as f64;
    let lo = a.min(b).round().clamp(0.0, limit_f);
    let hi = a.max(b).round().clamp(0.0, limit_f);
    if hi > lo {
        Some((lo as u32, (hi - lo) as u32))
    } else {
        None
    }
}
