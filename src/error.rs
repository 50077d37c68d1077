use std::path::PathBuf;
use thiserror::Error;

use crate::color::ParseColorError;
use crate::validation::ValidationReport;

/// The main error type for boxtag operations.
#[derive(Debug, Error)]
pub enum BoxtagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to probe image size of {path}: {source}")]
    ImageProbe {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Cannot annotate image with zero dimensions ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to parse regions JSON from {path}: {source}")]
    RegionsJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse regions YAML from {path}: {source}")]
    RegionsYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write regions JSON to {path}: {source}")]
    RegionsJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write regions YAML to {path}: {source}")]
    RegionsYamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse batch manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidColor(#[from] ParseColorError),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
