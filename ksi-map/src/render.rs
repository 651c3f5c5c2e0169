//! Styling of road segments for display on a web map.
//!
//! The map widget itself lives outside of this crate. Segments are colored by severity and
//! exported as a GeoJSON feature collection that carries the tooltip fields (road number, KSI
//! count, speed limit) and `simplestyle` stroke properties.

use geo_types::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::KsiMapError;
use crate::filter::Region;
use crate::record::{RoadSegment, KSI_COUNT_COLUMN, ROAD_NUMBER_COLUMN, SPEED_LIMIT_COLUMN};
use crate::severity::{BucketThresholds, SeverityBucket};

/// Line style and initial view of the map.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    /// Initial zoom level of the map.
    pub zoom: u8,
    /// Width of road lines in pixels.
    pub line_width: f64,
    /// Opacity of road lines, `0..=1`.
    pub line_opacity: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            zoom: 10,
            line_width: 6.0,
            line_opacity: 0.8,
        }
    }
}

impl MapStyle {
    /// Checks that line width is positive and opacity is within `0..=1`.
    pub fn is_valid(&self) -> bool {
        self.line_width > 0.0 && (0.0..=1.0).contains(&self.line_opacity)
    }
}

/// A road segment ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSegment {
    /// Line in longitude/latitude degrees.
    pub geometry: LineString,
    /// Road identifier shown in the tooltip.
    pub road_number: String,
    /// Speed limit shown in the tooltip.
    pub speed_limit: u32,
    /// KSI count shown in the tooltip.
    pub ksi_count: u32,
    /// Line color.
    pub color: Color,
}

/// One row of the map legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Severity bucket.
    pub bucket: SeverityBucket,
    /// Label, e.g. `"1–4"`.
    pub label: String,
    /// Color of the bucket.
    pub color: Color,
}

/// Everything a map front end needs to display the result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMap {
    /// Segments to draw.
    pub segments: Vec<RenderedSegment>,
    /// Initial map center, `x` is longitude.
    pub center: Coord,
    /// Line style and zoom.
    pub style: MapStyle,
    /// Legend rows from least to most severe.
    pub legend: Vec<LegendEntry>,
}

impl RenderedMap {
    /// Returns true if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments as a GeoJSON feature collection.
    pub fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self
                .segments
                .iter()
                .map(|segment| self.feature(segment))
                .collect(),
            foreign_members: None,
        }
    }

    /// Segments as a GeoJSON string.
    pub fn to_geojson_string(&self) -> Result<String, KsiMapError> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    fn feature(&self, segment: &RenderedSegment) -> Feature {
        let coordinates = segment.geometry.coords().map(|c| vec![c.x, c.y]).collect();

        let mut properties = JsonObject::new();
        properties.insert(
            ROAD_NUMBER_COLUMN.to_string(),
            JsonValue::from(segment.road_number.clone()),
        );
        properties.insert(
            KSI_COUNT_COLUMN.to_string(),
            JsonValue::from(segment.ksi_count),
        );
        properties.insert(
            SPEED_LIMIT_COLUMN.to_string(),
            JsonValue::from(segment.speed_limit),
        );
        properties.insert(
            "stroke".to_string(),
            JsonValue::from(segment.color.to_css_hex()),
        );
        properties.insert(
            "stroke-width".to_string(),
            JsonValue::from(self.style.line_width),
        );
        properties.insert(
            "stroke-opacity".to_string(),
            JsonValue::from(self.style.line_opacity),
        );

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(coordinates))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Turns filtered and smoothed segments into a [`RenderedMap`].
#[derive(Debug, Clone)]
pub struct Renderer {
    thresholds: BucketThresholds,
    style: MapStyle,
    center: Coord,
}

impl Renderer {
    /// Creates a renderer centered on the region.
    pub fn new(region: &Region, thresholds: BucketThresholds, style: MapStyle) -> Self {
        Self {
            thresholds,
            style,
            center: region.center(),
        }
    }

    /// Colors the segments by severity.
    pub fn render(&self, records: &[RoadSegment]) -> RenderedMap {
        let segments = records
            .iter()
            .map(|record| RenderedSegment {
                geometry: record.geometry.clone(),
                road_number: record.road_number.clone(),
                speed_limit: record.speed_limit,
                ksi_count: record.ksi_count,
                color: self.thresholds.color(record.ksi_count),
            })
            .collect();

        RenderedMap {
            segments,
            center: self.center,
            style: self.style,
            legend: self.legend(),
        }
    }

    /// Legend for the bucket thresholds.
    pub fn legend(&self) -> Vec<LegendEntry> {
        SeverityBucket::ALL
            .iter()
            .map(|bucket| LegendEntry {
                bucket: *bucket,
                label: self.thresholds.label(*bucket),
                color: bucket.color(),
            })
            .collect()
    }
}
