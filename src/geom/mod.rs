//! Geometry types for detections.
//!
//! Boxes carry their coordinate space in the type: a `BBoxXYXY<Normalized>`
//! has to be resolved against an image size before it can be drawn, and
//! [`RegionBox`] records which space a detector reported.
//!
//! # Example
//!
//! ```
//! use boxtag::geom::{Region, RegionBox};
//!
//! let region = Region::new("cat", RegionBox::normalized(0.25, 0.25, 0.75, 0.75));
//! let px = region.bbox.resolve(100, 100);
//! assert_eq!((px.xmin(), px.ymax()), (25.0, 75.0));
//! ```

mod bbox;
mod coord;
mod region;
mod space;

pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use region::{Region, RegionBox};
pub use space::{Normalized, Pixel};
