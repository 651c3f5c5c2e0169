//! Coordinate reference systems, projections and extents used to bring road segment geometries
//! into geographic coordinates.
//!
//! Geometries are plain [`geo_types`] coordinates. A [`Crs`] describes what the numbers in a
//! coordinate mean and can produce a [`Projection`] to move between geographic longitude/latitude
//! degrees and the projected plane.

pub mod crs;
pub mod error;
pub mod projection;
pub mod rect;

pub use crs::{Crs, ProjectionType};
pub use error::KsiGeoError;
pub use projection::Projection;
pub use rect::Rect;
