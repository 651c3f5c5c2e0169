//! Pipeline configuration.

use std::io::Read;

use ksi_geo::Crs;
use serde::{Deserialize, Serialize};

use crate::error::KsiMapError;
use crate::filter::Region;
use crate::render::MapStyle;
use crate::severity::BucketThresholds;
use crate::smoother::SmoothingOptions;

/// Fixed parameters of a pipeline. Every field has a default, so an options file only needs to
/// list what it changes:
///
/// ```json
/// { "smoothing": { "num_points": 200 }, "projected_crs": { "epsg": 27700, "projection_type": { "geodesy": "tmerc lat_0=49 lon_0=-2 k_0=0.9996012717 x_0=400000 y_0=-100000 ellps=airy" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Segments that do not touch this region are dropped.
    pub region: Region,
    /// CRS assumed for data whose extent does not fit into geographic bounds.
    pub projected_crs: Crs,
    /// Spline smoothing parameters.
    pub smoothing: SmoothingOptions,
    /// KSI count thresholds of the severity buckets.
    pub thresholds: BucketThresholds,
    /// Display parameters passed to the map.
    pub map: MapStyle,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            region: Region::ESSEX,
            projected_crs: Crs::EPSG32631,
            smoothing: SmoothingOptions::default(),
            thresholds: BucketThresholds::default(),
            map: MapStyle::default(),
        }
    }
}

impl PipelineOptions {
    /// Reads options from JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self, KsiMapError> {
        let options: Self = serde_json::from_reader(reader)?;
        options.validate()?;
        Ok(options)
    }

    /// Sets the region of interest.
    pub fn with_region(self, region: Region) -> Self {
        Self { region, ..self }
    }

    /// Sets the CRS assumed for projected data.
    pub fn with_projected_crs(self, projected_crs: Crs) -> Self {
        Self {
            projected_crs,
            ..self
        }
    }

    /// Sets smoothing parameters.
    pub fn with_smoothing(self, smoothing: SmoothingOptions) -> Self {
        Self { smoothing, ..self }
    }

    /// Sets severity bucket thresholds.
    pub fn with_thresholds(self, thresholds: BucketThresholds) -> Self {
        Self { thresholds, ..self }
    }

    /// Checks the options for consistency.
    pub fn validate(&self) -> Result<(), KsiMapError> {
        if !self.region.is_valid() {
            return Err(KsiMapError::InvalidOptions(format!(
                "region {:?} is empty or outside of geographic bounds",
                self.region
            )));
        }

        if self.smoothing.num_points < 2 {
            return Err(KsiMapError::InvalidOptions(format!(
                "smoothed lines need at least 2 points, got {}",
                self.smoothing.num_points
            )));
        }

        if !self.thresholds.is_valid() {
            return Err(KsiMapError::InvalidOptions(format!(
                "severity thresholds must satisfy 1 < moderate_from < high_from, got {} and {}",
                self.thresholds.moderate_from, self.thresholds.high_from
            )));
        }

        if !self.map.is_valid() {
            return Err(KsiMapError::InvalidOptions(format!(
                "invalid map style {:?}",
                self.map
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ksi_geo::ProjectionType;

    #[test]
    fn defaults_are_valid() {
        assert!(PipelineOptions::default().validate().is_ok());
    }

    #[test]
    fn partial_json() {
        let json = r#"{ "smoothing": { "num_points": 50 }, "thresholds": { "high_from": 10 } }"#;
        let options = PipelineOptions::from_reader(json.as_bytes()).expect("valid options");

        assert_eq!(options.smoothing.num_points, 50);
        assert_eq!(options.thresholds.moderate_from, 5);
        assert_eq!(options.thresholds.high_from, 10);
        assert_eq!(options.region, Region::ESSEX);
        assert_eq!(options.projected_crs, Crs::EPSG32631);
    }

    #[test]
    fn projected_crs_from_json() {
        let json = r#"{ "projected_crs": { "epsg": 32630, "projection_type": { "utm": { "zone": 30 } } } }"#;
        let options = PipelineOptions::from_reader(json.as_bytes()).expect("valid options");

        assert_eq!(options.projected_crs, Crs::utm(30, false));
        assert_eq!(
            options.projected_crs.projection_type(),
            &ProjectionType::Utm {
                zone: 30,
                south: false
            }
        );
    }

    #[test]
    fn invalid_options() {
        let options = PipelineOptions::default().with_smoothing(SmoothingOptions {
            num_points: 1,
            ..Default::default()
        });
        assert_matches!(options.validate(), Err(KsiMapError::InvalidOptions(_)));

        let options = PipelineOptions::default().with_thresholds(BucketThresholds {
            moderate_from: 8,
            high_from: 5,
        });
        assert_matches!(options.validate(), Err(KsiMapError::InvalidOptions(_)));

        assert_matches!(
            PipelineOptions::from_reader("{ \"region\": 5 }".as_bytes()),
            Err(KsiMapError::Json(_))
        );
    }
}
