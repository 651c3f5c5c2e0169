//! Coordinate reference system description.

use serde::{Deserialize, Serialize};

use crate::error::KsiGeoError;
use crate::projection::Projection;

/// Coordinate reference system of a set of coordinates.
///
/// Geographic systems (no projection) store longitude and latitude in degrees as `x` and `y`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    epsg: Option<u32>,
    projection_type: ProjectionType,
}

/// Kind of projection used by a [`Crs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ProjectionType {
    /// Geographic coordinates, longitude and latitude in degrees.
    None,
    /// Universal Transverse Mercator on the WGS84 ellipsoid.
    Utm {
        /// UTM zone number, `1..=60`.
        zone: u8,
        /// Southern hemisphere variant of the zone.
        #[serde(default)]
        south: bool,
    },
    /// Any operation understood by the `geodesy` crate, e.g. `"laea lon_0=10 lat_0=52"`.
    Geodesy(String),
}

impl Crs {
    /// WGS84 geographic coordinates (EPSG:4326).
    pub const WGS84: Crs = Crs {
        epsg: Some(4326),
        projection_type: ProjectionType::None,
    };

    /// WGS 84 / UTM zone 31N (EPSG:32631).
    pub const EPSG32631: Crs = Crs {
        epsg: Some(32631),
        projection_type: ProjectionType::Utm {
            zone: 31,
            south: false,
        },
    };

    /// Creates a WGS84 based UTM CRS. The EPSG code is derived from the zone.
    pub fn utm(zone: u8, south: bool) -> Self {
        let base = if south { 32700 } else { 32600 };
        Self {
            epsg: Some(base + zone as u32),
            projection_type: ProjectionType::Utm { zone, south },
        }
    }

    /// EPSG code of the CRS, if known.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Projection type of the CRS.
    pub fn projection_type(&self) -> &ProjectionType {
        &self.projection_type
    }

    /// Returns true if coordinates in this CRS are longitude/latitude degrees.
    pub fn is_geographic(&self) -> bool {
        self.projection_type == ProjectionType::None
    }

    /// Returns the projection from geographic coordinates into this CRS.
    ///
    /// Geographic CRSs have no projection and return `Ok(None)`.
    pub fn get_projection(&self) -> Result<Option<Box<dyn Projection>>, KsiGeoError> {
        match &self.projection_type {
            ProjectionType::None => Ok(None),
            ProjectionType::Utm { zone, south } => {
                let mut definition = format!("utm zone={zone} ellps=WGS84");
                if *south {
                    definition.push_str(" south");
                }

                geodesy_projection(&definition).map(Some)
            }
            ProjectionType::Geodesy(definition) => geodesy_projection(definition).map(Some),
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.epsg, &self.projection_type) {
            (Some(code), _) => write!(f, "EPSG:{code}"),
            (None, ProjectionType::None) => write!(f, "geographic"),
            (None, ProjectionType::Utm { zone, south }) => {
                write!(f, "UTM {zone}{}", if *south { "S" } else { "N" })
            }
            (None, ProjectionType::Geodesy(definition)) => write!(f, "{definition}"),
        }
    }
}

#[cfg(feature = "geodesy")]
fn geodesy_projection(definition: &str) -> Result<Box<dyn Projection>, KsiGeoError> {
    let projection = crate::projection::GeodesyProjection::new(definition)?;
    Ok(Box::new(projection))
}

#[cfg(not(feature = "geodesy"))]
fn geodesy_projection(definition: &str) -> Result<Box<dyn Projection>, KsiGeoError> {
    Err(KsiGeoError::Unsupported(definition.to_string()))
}
