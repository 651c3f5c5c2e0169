//! Bringing segment geometries into geographic coordinates.
//!
//! Input files carry no CRS metadata, so the CRS is guessed from the extent of the data: if all
//! coordinates fit strictly inside `(-180, 180) x (-90, 90)` they are taken as longitude/latitude,
//! otherwise as coordinates of the configured projected CRS. Projected data that happens to fit
//! into geographic bounds is classified as geographic and left as is.

use geo::BoundingRect;
use geo_types::LineString;
use ksi_geo::{Crs, Projection, Rect};

use crate::error::KsiMapError;
use crate::record::RoadSegment;

/// Result of CRS detection.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsDecision {
    /// CRS the input was taken to be in.
    pub detected: Crs,
    /// Whether the geometries were reprojected.
    pub reprojected: bool,
    /// Extent of the input before reprojection. `None` for empty input.
    pub extent: Option<Rect>,
}

/// Converts segment geometries into WGS84 longitude/latitude.
pub struct CrsNormalizer {
    projected_crs: Crs,
    projection: Option<Box<dyn Projection>>,
}

impl std::fmt::Debug for CrsNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrsNormalizer")
            .field("projected_crs", &self.projected_crs)
            .finish_non_exhaustive()
    }
}

impl CrsNormalizer {
    /// Creates a normalizer that assumes `projected_crs` for data outside of geographic bounds.
    pub fn new(projected_crs: Crs) -> Result<Self, KsiMapError> {
        let projection = projected_crs.get_projection()?;
        Ok(Self {
            projected_crs,
            projection,
        })
    }

    /// Combined extent of the segment geometries.
    pub fn extent(records: &[RoadSegment]) -> Option<Rect> {
        records
            .iter()
            .filter_map(|record| record.geometry.bounding_rect())
            .map(Rect::from)
            .reduce(|acc, rect| acc.merge(rect))
    }

    /// Guesses the CRS of data with the given extent.
    pub fn classify(&self, extent: Option<&Rect>) -> Crs {
        match extent {
            Some(extent) if !extent.is_strictly_inside(&Rect::GEOGRAPHIC) => {
                self.projected_crs.clone()
            }
            _ => Crs::WGS84,
        }
    }

    /// Returns the segments with geometries in longitude/latitude.
    pub fn normalize(&self, records: Vec<RoadSegment>) -> (Vec<RoadSegment>, CrsDecision) {
        let extent = Self::extent(&records);
        let detected = self.classify(extent.as_ref());

        let Some(projection) = self.projection.as_deref().filter(|_| !detected.is_geographic())
        else {
            log::debug!("Input extent {extent:?} is geographic, keeping coordinates");
            let decision = CrsDecision {
                detected,
                reprojected: false,
                extent,
            };
            return (records, decision);
        };

        log::info!("Input extent {extent:?} is not geographic, reprojecting from {detected}");
        let records = records
            .into_iter()
            .map(|record| {
                let geometry = unproject_line(projection, &record.geometry);
                record.with_geometry(geometry)
            })
            .collect();

        let decision = CrsDecision {
            detected,
            reprojected: true,
            extent,
        };
        (records, decision)
    }
}

fn unproject_line(projection: &dyn Projection, line: &LineString) -> LineString {
    line.coords()
        .map(|&c| match projection.unproject(c) {
            Some(lonlat) => lonlat,
            None => {
                log::warn!("Cannot reproject {c:?}, keeping it as is");
                c
            }
        })
        .collect()
}
