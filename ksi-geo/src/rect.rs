//! Axis aligned rectangle used for extents.

use geo_types::{coord, Coord, Polygon};
use serde::{Deserialize, Serialize};

/// Axis aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum x (west for geographic coordinates).
    pub x_min: f64,
    /// Minimum y (south for geographic coordinates).
    pub y_min: f64,
    /// Maximum x (east for geographic coordinates).
    pub x_max: f64,
    /// Maximum y (north for geographic coordinates).
    pub y_max: f64,
}

impl Rect {
    /// Longitude/latitude bounds of the whole globe.
    pub const GEOGRAPHIC: Rect = Rect {
        x_min: -180.0,
        y_min: -90.0,
        x_max: 180.0,
        y_max: 90.0,
    };

    /// Creates a new rectangle.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Coord {
        coord! {
            x: (self.x_min + self.x_max) / 2.0,
            y: (self.y_min + self.y_max) / 2.0,
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Returns true if `self` lies inside `other` without touching its edges.
    pub fn is_strictly_inside(&self, other: &Rect) -> bool {
        self.x_min > other.x_min
            && self.x_max < other.x_max
            && self.y_min > other.y_min
            && self.y_max < other.y_max
    }

    /// Closed polygon with the rectangle outline.
    pub fn to_polygon(&self) -> Polygon {
        geo_types::Rect::new(
            coord! { x: self.x_min, y: self.y_min },
            coord! { x: self.x_max, y: self.y_max },
        )
        .to_polygon()
    }
}

impl From<geo_types::Rect> for Rect {
    fn from(value: geo_types::Rect) -> Self {
        Self::new(value.min().x, value.min().y, value.max().x, value.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_geo_rect() {
        let rect = Rect::from(geo_types::Rect::new(
            coord! { x: 1.0, y: 7.0 },
            coord! { x: -2.0, y: 3.0 },
        ));
        assert_eq!(rect, Rect::new(-2.0, 3.0, 1.0, 7.0));
    }

    #[test]
    fn strict_containment_excludes_edges() {
        let inside = Rect::new(-1.0, 50.0, 1.0, 53.0);
        assert!(inside.is_strictly_inside(&Rect::GEOGRAPHIC));

        let touching = Rect::new(-180.0, 50.0, 1.0, 53.0);
        assert!(!touching.is_strictly_inside(&Rect::GEOGRAPHIC));

        let projected = Rect::new(300_000.0, 5_700_000.0, 310_000.0, 5_710_000.0);
        assert!(!projected.is_strictly_inside(&Rect::GEOGRAPHIC));
    }

    #[test]
    fn merge_and_center() {
        let merged = Rect::new(0.0, 0.0, 1.0, 1.0).merge(Rect::new(2.0, -1.0, 3.0, 0.5));
        assert_eq!(merged, Rect::new(0.0, -1.0, 3.0, 1.0));
        assert_eq!(merged.center(), coord! { x: 1.5, y: 0.0 });
        assert_eq!(merged.width(), 3.0);
        assert_eq!(merged.height(), 2.0);
    }
}
