//! Region and attribute filters over road segments.
//!
//! Every filter is a pure predicate over a single [`RoadSegment`], so filters can be applied in
//! any order with the same result.

use std::collections::BTreeSet;

use geo::Intersects;
use geo_types::{Coord, Polygon};
use ksi_geo::Rect;
use serde::{Deserialize, Serialize};

use crate::record::RoadSegment;
use crate::severity::{BucketThresholds, SeverityBucket};

/// Number of values pre-selected by [`FilterConfig::default_selection`].
pub const DEFAULT_SELECTION_SIZE: usize = 5;

/// Predicate over road segments.
pub trait RecordFilter {
    /// Returns true if the segment passes the filter.
    fn accepts(&self, record: &RoadSegment) -> bool;

    /// Keeps the segments accepted by the filter, preserving their order.
    fn apply(&self, records: Vec<RoadSegment>) -> Vec<RoadSegment> {
        records.into_iter().filter(|r| self.accepts(r)).collect()
    }
}

/// Geographic region of interest, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Southern latitude.
    pub south: f64,
    /// Northern latitude.
    pub north: f64,
    /// Western longitude.
    pub west: f64,
    /// Eastern longitude.
    pub east: f64,
}

impl Region {
    /// Essex, UK.
    pub const ESSEX: Region = Region {
        south: 51.2,
        north: 52.3,
        west: -0.2,
        east: 1.5,
    };

    /// Region as a lon/lat rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.west, self.south, self.east, self.north)
    }

    /// Center of the region, `x` is longitude.
    pub fn center(&self) -> Coord {
        self.to_rect().center()
    }

    /// Checks that the region is a non-empty rectangle within geographic bounds.
    pub fn is_valid(&self) -> bool {
        let rect = self.to_rect();
        rect.width() > 0.0
            && rect.height() > 0.0
            && rect.merge(Rect::GEOGRAPHIC) == Rect::GEOGRAPHIC
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::ESSEX
    }
}

/// Keeps segments that touch the region of interest and have at least one KSI.
#[derive(Debug, Clone)]
pub struct SpatialFilter {
    area: Polygon,
}

impl SpatialFilter {
    /// Creates a filter for the region.
    pub fn new(region: &Region) -> Self {
        Self {
            area: region.to_rect().to_polygon(),
        }
    }
}

impl RecordFilter for SpatialFilter {
    fn accepts(&self, record: &RoadSegment) -> bool {
        record.ksi_count != 0 && record.geometry.intersects(&self.area)
    }
}

/// Set of selected values of a categorical attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T: Ord> {
    /// Every value is selected.
    All,
    /// Only these values are selected. An empty set selects nothing.
    Only(BTreeSet<T>),
}

impl<T: Ord> Selection<T> {
    /// Selects only the given values.
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Self::Only(values.into_iter().collect())
    }

    /// Returns true if the value is selected.
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

/// User choice of road numbers, speed limits and severity buckets to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Selected road numbers.
    pub roads: Selection<String>,
    /// Selected speed limits.
    pub speeds: Selection<u32>,
    /// Enabled severity buckets. No buckets means nothing is shown.
    pub buckets: BTreeSet<SeverityBucket>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            roads: Selection::All,
            speeds: Selection::All,
            buckets: SeverityBucket::ALL.into_iter().collect(),
        }
    }
}

impl FilterConfig {
    /// Preselection offered when "select all" is switched off: the first few road numbers and
    /// speed limits of the choices, all buckets.
    pub fn default_selection(choices: &FilterChoices) -> Self {
        Self {
            roads: Selection::only(
                choices
                    .road_numbers
                    .iter()
                    .take(DEFAULT_SELECTION_SIZE)
                    .cloned(),
            ),
            speeds: Selection::only(
                choices
                    .speed_limits
                    .iter()
                    .take(DEFAULT_SELECTION_SIZE)
                    .copied(),
            ),
            ..Default::default()
        }
    }

    /// Sets road number selection.
    pub fn with_roads(self, roads: Selection<String>) -> Self {
        Self { roads, ..self }
    }

    /// Sets speed limit selection.
    pub fn with_speeds(self, speeds: Selection<u32>) -> Self {
        Self { speeds, ..self }
    }

    /// Sets enabled severity buckets.
    pub fn with_buckets(self, buckets: impl IntoIterator<Item = SeverityBucket>) -> Self {
        Self {
            buckets: buckets.into_iter().collect(),
            ..self
        }
    }
}

/// Applies a [`FilterConfig`] to segments.
#[derive(Debug, Clone)]
pub struct AttributeFilter<'a> {
    config: &'a FilterConfig,
    thresholds: BucketThresholds,
}

impl<'a> AttributeFilter<'a> {
    /// Creates a filter for the config, bucketing KSI counts with the given thresholds.
    pub fn new(config: &'a FilterConfig, thresholds: BucketThresholds) -> Self {
        Self { config, thresholds }
    }
}

impl RecordFilter for AttributeFilter<'_> {
    fn accepts(&self, record: &RoadSegment) -> bool {
        self.config.roads.contains(&record.road_number)
            && self.config.speeds.contains(&record.speed_limit)
            && self
                .thresholds
                .bucket(record.ksi_count)
                .is_some_and(|bucket| self.config.buckets.contains(&bucket))
    }
}

/// Distinct values available for selection, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterChoices {
    /// Road numbers present in the data.
    pub road_numbers: Vec<String>,
    /// Speed limits present in the data.
    pub speed_limits: Vec<u32>,
}

impl FilterChoices {
    /// Collects the choices from the segments.
    pub fn from_records(records: &[RoadSegment]) -> Self {
        let road_numbers: BTreeSet<&str> =
            records.iter().map(|r| r.road_number.as_str()).collect();
        let speed_limits: BTreeSet<u32> = records.iter().map(|r| r.speed_limit).collect();

        Self {
            road_numbers: road_numbers.into_iter().map(String::from).collect(),
            speed_limits: speed_limits.into_iter().collect(),
        }
    }
}
