//! Labelled regions as produced by a detector.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYXY;
use super::{Normalized, Pixel};
use crate::color::Color;

/// A box in whichever coordinate space the detector reported it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegionBox {
    Pixel(BBoxXYXY<Pixel>),
    Normalized(BBoxXYXY<Normalized>),
}

impl RegionBox {
    /// Creates a box in absolute pixel coordinates.
    pub fn pixel(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        RegionBox::Pixel(BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax))
    }

    /// Creates a box in normalized `[0, 1]` coordinates.
    pub fn normalized(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        RegionBox::Normalized(BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax))
    }

    /// Creates a box from raw coordinates and a `normalized` flag.
    pub fn from_flag(xmin: f64, ymin: f64, xmax: f64, ymax: f64, normalized: bool) -> Self {
        if normalized {
            Self::normalized(xmin, ymin, xmax, ymax)
        } else {
            Self::pixel(xmin, ymin, xmax, ymax)
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, RegionBox::Normalized(_))
    }

    /// Returns the coordinates as stored, without resolving the space.
    pub fn raw_xyxy(&self) -> (f64, f64, f64, f64) {
        match self {
            RegionBox::Pixel(b) => (b.xmin(), b.ymin(), b.xmax(), b.ymax()),
            RegionBox::Normalized(b) => (b.xmin(), b.ymin(), b.xmax(), b.ymax()),
        }
    }

    /// Resolves the box to absolute pixels for an image of the given size.
    ///
    /// Pixel boxes pass through unchanged; no clamping is applied.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> BBoxXYXY<Pixel> {
        match self {
            RegionBox::Pixel(b) => *b,
            RegionBox::Normalized(b) => b.to_pixel(image_width as f64, image_height as f64),
        }
    }
}

/// A labelled box plus optional detector score and display color.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub label: String,
    pub bbox: RegionBox,
    pub score: Option<f64>,
    /// Overrides the annotation color for this region when set.
    pub color: Option<Color>,
}

impl Region {
    pub fn new(label: impl Into<String>, bbox: RegionBox) -> Self {
        Self {
            label: label.into(),
            bbox,
            score: None,
            color: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Text drawn in the label tag, e.g. `dog: 87%` when scores are shown.
    pub fn display_label(&self, show_score: bool) -> String {
        match (show_score, self.score) {
            (true, Some(score)) if self.label.is_empty() => {
                format!("{:.0}%", score * 100.0)
            }
            (true, Some(score)) => format!("{}: {:.0}%", self.label, score * 100.0),
            _ => self.label.clone(),
        }
    }
}

// Flattened on the wire: coordinates sit next to the label with a
// `normalized` flag rather than a nested tagged box.
impl Serialize for Region {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let (xmin, ymin, xmax, ymax) = self.bbox.raw_xyxy();
        let fields = 6 + usize::from(self.score.is_some()) + usize::from(self.color.is_some());
        let mut state = serializer.serialize_struct("Region", fields)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("xmin", &xmin)?;
        state.serialize_field("ymin", &ymin)?;
        state.serialize_field("xmax", &xmax)?;
        state.serialize_field("ymax", &ymax)?;
        state.serialize_field("normalized", &self.bbox.is_normalized())?;
        if let Some(score) = self.score {
            state.serialize_field("score", &score)?;
        }
        if let Some(color) = &self.color {
            state.serialize_field("color", color)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RegionData {
            #[serde(default)]
            label: String,
            xmin: f64,
            ymin: f64,
            xmax: f64,
            ymax: f64,
            #[serde(default)]
            normalized: bool,
            #[serde(default)]
            score: Option<f64>,
            #[serde(default)]
            color: Option<Color>,
        }
        let data = RegionData::deserialize(deserializer)?;
        Ok(Region {
            label: data.label,
            bbox: RegionBox::from_flag(data.xmin, data.ymin, data.xmax, data.ymax, data.normalized),
            score: data.score,
            color: data.color,
        })
    }
}
