//! Conversion between geographic and projected coordinates.
#[cfg(feature = "geodesy")]
mod geodesy;
#[cfg(feature = "geodesy")]
pub use self::geodesy::GeodesyProjection;

use geo_types::Coord;

/// Projection between geographic coordinates (`x` is longitude, `y` is latitude, both in degrees)
/// and some projected plane.
pub trait Projection {
    /// Projects a longitude/latitude coordinate into the plane.
    fn project(&self, lonlat: Coord) -> Option<Coord>;
    /// Converts a projected coordinate back into longitude/latitude.
    fn unproject(&self, xy: Coord) -> Option<Coord>;
}
