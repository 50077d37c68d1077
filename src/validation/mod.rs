//! Region validation.
//!
//! Annotation draws whatever it is given; this module is where problems in
//! detector output get reported instead:
//! - Geometric validity (finite, ordered, non-empty boxes)
//! - Placement (inside the image, normalized values within [0, 1])
//! - Content (non-empty labels, scores within [0, 1])

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use crate::geom::{Region, RegionBox};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates regions against the size of the image they will be drawn on.
pub fn validate_regions(
    regions: &[Region],
    image_size: (u32, u32),
    _opts: &ValidateOptions,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let (width, height) = image_size;

    if width == 0 || height == 0 {
        report.add(ValidationIssue::error(
            IssueCode::InvalidImageDimensions,
            format!("Invalid dimensions {}x{} (must be positive)", width, height),
            IssueContext::Document,
        ));
    }

    for (index, region) in regions.iter().enumerate() {
        validate_region(region, width, height, IssueContext::Region { index }, &mut report);
    }

    report
}

fn validate_region(
    region: &Region,
    width: u32,
    height: u32,
    context: IssueContext,
    report: &mut ValidationReport,
) {
    if region.label.trim().is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::EmptyLabel,
            "Empty label",
            context.clone(),
        ));
    }

    if let Some(score) = region.score {
        if !(0.0..=1.0).contains(&score) {
            report.add(ValidationIssue::warning(
                IssueCode::ScoreOutOfRange,
                format!("Score {} is outside [0, 1]", score),
                context.clone(),
            ));
        }
    }

    let bbox = region.bbox.resolve(width, height);

    // Non-finite boxes make every later check meaningless.
    if !bbox.is_finite() {
        report.add(ValidationIssue::error(
            IssueCode::BBoxNotFinite,
            format!("Bounding box has non-finite coordinates: {:?}", bbox),
            context,
        ));
        return;
    }

    if !bbox.is_ordered() {
        report.add(ValidationIssue::error(
            IssueCode::InvalidBBoxOrdering,
            format!(
                "Bounding box has min > max: ({}, {}) > ({}, {})",
                bbox.xmin(),
                bbox.ymin(),
                bbox.xmax(),
                bbox.ymax()
            ),
            context.clone(),
        ));
    } else if bbox.area() == 0.0 {
        report.add(ValidationIssue::warning(
            IssueCode::InvalidBBoxArea,
            format!(
                "Bounding box has zero area ({}x{})",
                bbox.width(),
                bbox.height()
            ),
            context.clone(),
        ));
    }

    if let RegionBox::Normalized(normalized) = &region.bbox {
        if !normalized.is_unit() {
            report.add(ValidationIssue::warning(
                IssueCode::NormalizedOutOfRange,
                format!(
                    "Normalized coordinates outside [0, 1]: {:?}",
                    normalized
                ),
                context.clone(),
            ));
        }
    }

    if width > 0 && height > 0 && !bbox.fits_within(width as f64, height as f64) {
        report.add(ValidationIssue::warning(
            IssueCode::BBoxOutOfBounds,
            format!(
                "Bounding box ({}, {}, {}, {}) extends outside {}x{} image",
                bbox.xmin(),
                bbox.ymin(),
                bbox.xmax(),
                bbox.ymax(),
                width,
                height
            ),
            context,
        ));
    }
}
