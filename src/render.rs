//! The fetch → detect → annotate → save pipeline for image files.

use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, info};

use crate::annotate::{annotate_regions, AnnotateOptions};
use crate::detect::Detector;
use crate::error::BoxtagError;
use crate::font::FontBook;
use crate::geom::{Region, RegionBox};

/// Settings for a render beyond the per-region drawing options.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub annotate: AnnotateOptions,
    /// Append `NN%` scores to labels.
    pub show_scores: bool,
    /// Interpret every box as normalized, whatever its own flag says.
    pub force_normalized: bool,
}

/// Decodes an image file into RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, BoxtagError> {
    let image = image::open(path)
        .map_err(|source| BoxtagError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BoxtagError::EmptyImage { width, height });
    }
    debug!("loaded {} ({}x{})", path.display(), width, height);
    Ok(image)
}

/// Encodes `image` to `path`, creating parent directories. The format
/// follows the extension; formats without alpha get the RGB channels.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), BoxtagError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let write_err = |source| BoxtagError::ImageWrite {
        path: path.to_path_buf(),
        source,
    };
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) | Ok(ImageFormat::Bmp) => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save(path)
            .map_err(write_err),
        _ => image.save(path).map_err(write_err),
    }
}

/// Reinterprets every box's raw coordinates as normalized.
pub fn treat_as_normalized(regions: &mut [Region]) {
    for region in regions {
        if let RegionBox::Pixel(_) = region.bbox {
            let (xmin, ymin, xmax, ymax) = region.bbox.raw_xyxy();
            region.bbox = RegionBox::normalized(xmin, ymin, xmax, ymax);
        }
    }
}

/// Runs `detector` on `image` and draws the regions it returns.
pub fn render_with<D: Detector + ?Sized>(
    image: &mut RgbaImage,
    detector: &D,
    opts: &RenderOptions,
    fonts: &FontBook,
) -> Result<Vec<Region>, BoxtagError> {
    let mut regions = detector.detect(image)?;
    if opts.force_normalized {
        treat_as_normalized(&mut regions);
    }
    annotate_regions(image, &regions, &opts.annotate, fonts, opts.show_scores);
    Ok(regions)
}

/// Loads `input`, annotates it with `detector`'s regions and writes `output`.
pub fn render_file<D: Detector + ?Sized>(
    input: &Path,
    output: &Path,
    detector: &D,
    opts: &RenderOptions,
    fonts: &FontBook,
) -> Result<usize, BoxtagError> {
    let mut image = load_image(input)?;
    let regions = render_with(&mut image, detector, opts, fonts)?;
    save_image(&image, output)?;
    info!(
        "annotated {} region(s) from {} into {}",
        regions.len(),
        input.display(),
        output.display()
    );
    Ok(regions.len())
}
