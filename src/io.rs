//! Reading and writing region lists.
//!
//! A regions document may take any of these shapes:
//!
//! - a bare array of regions: `[{"label": "cat", "xmin": ..., ...}]`
//! - an object holding the array: `{"regions": [...]}`
//! - parallel columns, as many detection endpoints return them:
//!   `{"boxes": [[xmin, ymin, xmax, ymax], ...], "labels": [...], "scores": [...], "normalized": true}`
//! - a function-invocation response envelope whose `body` is one of the
//!   above, either inline or as a JSON-encoded string:
//!   `{"statusCode": 200, "body": "[...]"}`
//!
//! Files ending in `.yaml` / `.yml` are read and written as YAML, anything
//! else as JSON. Writers always emit a bare array.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Deserialize;

use crate::error::BoxtagError;
use crate::geom::{Region, RegionBox};

#[derive(Deserialize)]
#[serde(untagged)]
enum RegionsDocument {
    List(Vec<Region>),
    Wrapped {
        regions: Vec<Region>,
    },
    Columns {
        boxes: Vec<[f64; 4]>,
        #[serde(default)]
        labels: Vec<String>,
        #[serde(default)]
        scores: Vec<f64>,
        #[serde(default)]
        normalized: bool,
    },
    Envelope {
        body: EnvelopeBody,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnvelopeBody {
    Encoded(String),
    Inline(Box<RegionsDocument>),
}

impl RegionsDocument {
    fn into_regions(self) -> Result<Vec<Region>, serde_json::Error> {
        match self {
            RegionsDocument::List(regions) | RegionsDocument::Wrapped { regions } => Ok(regions),
            RegionsDocument::Columns {
                boxes,
                labels,
                scores,
                normalized,
            } => columns_to_regions(boxes, labels, scores, normalized),
            RegionsDocument::Envelope { body } => match body {
                EnvelopeBody::Encoded(text) => from_regions_str(&text),
                EnvelopeBody::Inline(doc) => doc.into_regions(),
            },
        }
    }
}

fn columns_to_regions(
    boxes: Vec<[f64; 4]>,
    labels: Vec<String>,
    scores: Vec<f64>,
    normalized: bool,
) -> Result<Vec<Region>, serde_json::Error> {
    use serde::de::Error as _;

    if !labels.is_empty() && labels.len() != boxes.len() {
        return Err(serde_json::Error::custom(format!(
            "{} labels for {} boxes",
            labels.len(),
            boxes.len()
        )));
    }
    if !scores.is_empty() && scores.len() != boxes.len() {
        return Err(serde_json::Error::custom(format!(
            "{} scores for {} boxes",
            scores.len(),
            boxes.len()
        )));
    }

    let mut labels = labels.into_iter();
    let mut scores = scores.into_iter();
    Ok(boxes
        .into_iter()
        .map(|[xmin, ymin, xmax, ymax]| Region {
            label: labels.next().unwrap_or_default(),
            bbox: RegionBox::from_flag(xmin, ymin, xmax, ymax, normalized),
            score: scores.next(),
            color: None,
        })
        .collect())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Reads regions from a JSON or YAML file (chosen by extension).
///
/// # Errors
/// Returns an error if the file cannot be read or is not a regions document.
pub fn read_regions(path: &Path) -> Result<Vec<Region>, BoxtagError> {
    let file = File::open(path).map_err(BoxtagError::Io)?;
    let reader = BufReader::new(file);

    let json_err = |source| BoxtagError::RegionsJsonParse {
        path: path.to_path_buf(),
        source,
    };

    let document: RegionsDocument = if is_yaml(path) {
        serde_yaml::from_reader(reader).map_err(|source| BoxtagError::RegionsYamlParse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_reader(reader).map_err(json_err)?
    };
    document.into_regions().map_err(json_err)
}

/// Writes regions to a JSON or YAML file (chosen by extension).
pub fn write_regions(path: &Path, regions: &[Region]) -> Result<(), BoxtagError> {
    let file = File::create(path).map_err(BoxtagError::Io)?;
    let writer = BufWriter::new(file);

    if is_yaml(path) {
        serde_yaml::to_writer(writer, regions).map_err(|source| BoxtagError::RegionsYamlWrite {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::to_writer_pretty(writer, regions).map_err(|source| {
            BoxtagError::RegionsJsonWrite {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

/// Parses a JSON regions document from a string.
pub fn from_regions_str(json: &str) -> Result<Vec<Region>, serde_json::Error> {
    serde_json::from_str::<RegionsDocument>(json)?.into_regions()
}

/// Parses a JSON regions document from bytes.
pub fn from_regions_slice(bytes: &[u8]) -> Result<Vec<Region>, serde_json::Error> {
    serde_json::from_slice::<RegionsDocument>(bytes)?.into_regions()
}

/// Serializes regions as a pretty-printed JSON array.
pub fn to_regions_string(regions: &[Region]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(regions)
}
