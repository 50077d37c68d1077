//! The detection capability behind an annotated render.
//!
//! A [`Detector`] turns an image into labelled regions. Remote endpoints and
//! model bindings would implement it; this crate ships
//! [`PrecomputedDetector`], which serves predictions that were produced
//! elsewhere and saved as a regions document.

use std::path::Path;

use image::RgbaImage;

use crate::error::BoxtagError;
use crate::geom::Region;
use crate::io::read_regions;

pub trait Detector {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<Region>, BoxtagError>;
}

/// Returns a fixed list of regions for any image.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedDetector {
    regions: Vec<Region>,
}

impl PrecomputedDetector {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Loads predictions from a regions file.
    pub fn from_file(path: &Path) -> Result<Self, BoxtagError> {
        Ok(Self::new(read_regions(path)?))
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl Detector for PrecomputedDetector {
    fn detect(&self, _image: &RgbaImage) -> Result<Vec<Region>, BoxtagError> {
        Ok(self.regions.clone())
    }
}

impl<D: Detector + ?Sized> Detector for &D {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<Region>, BoxtagError> {
        (**self).detect(image)
    }
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<Region>, BoxtagError> {
        (**self).detect(image)
    }
}
