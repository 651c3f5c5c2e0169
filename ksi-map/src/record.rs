//! Road segment record, one row of the working dataset.

use geo_types::LineString;

/// Name of the column with the WKT geometry. The only required column.
pub const GEOMETRY_COLUMN: &str = "geometry";
/// Name of the column with the road identifier.
pub const ROAD_NUMBER_COLUMN: &str = "Road Number";
/// Name of the column with the speed limit.
pub const SPEED_LIMIT_COLUMN: &str = "speed_limit";
/// Name of the column with the killed-or-seriously-injured count.
pub const KSI_COUNT_COLUMN: &str = "KSI Count";

/// Road number used for rows that have none.
pub const UNKNOWN_ROAD: &str = "Unknown";

/// A road segment with its accident severity count.
///
/// Segments are never edited after loading; every pipeline stage produces new values.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    /// Polyline of the segment, at least two vertices.
    pub geometry: LineString,
    /// Road identifier, trimmed. [`UNKNOWN_ROAD`] if missing.
    pub road_number: String,
    /// Speed limit, `0` if missing.
    pub speed_limit: u32,
    /// Killed-or-seriously-injured count, `0` if missing.
    pub ksi_count: u32,
}

impl RoadSegment {
    /// Creates a new segment.
    pub fn new(
        geometry: LineString,
        road_number: impl Into<String>,
        speed_limit: u32,
        ksi_count: u32,
    ) -> Self {
        Self {
            geometry,
            road_number: road_number.into(),
            speed_limit,
            ksi_count,
        }
    }

    /// Returns a copy of the segment with the geometry replaced.
    pub fn with_geometry(self, geometry: LineString) -> Self {
        Self { geometry, ..self }
    }

    /// Number of vertices in the geometry.
    pub fn vertex_count(&self) -> usize {
        self.geometry.0.len()
    }
}
