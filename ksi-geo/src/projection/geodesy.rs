use geo_types::{coord, Coord};
use geodesy::prelude::*;

use super::Projection;
use crate::error::KsiGeoError;

/// Projection backed by an operation of the `geodesy` crate.
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
}

impl GeodesyProjection {
    /// Creates the projection from a `geodesy` operation definition, e.g. `"utm zone=31"`.
    pub fn new(definition: &str) -> Result<Self, KsiGeoError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|err| KsiGeoError::InvalidProjection {
                definition: definition.to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self { context, op })
    }
}

impl std::fmt::Debug for GeodesyProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyProjection").finish_non_exhaustive()
    }
}

impl Projection for GeodesyProjection {
    fn project(&self, lonlat: Coord) -> Option<Coord> {
        let mut data = [Coor2D::geo(lonlat.y, lonlat.x)];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        let [x, y] = data[0].0;
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        Some(coord! { x: x, y: y })
    }

    fn unproject(&self, xy: Coord) -> Option<Coord> {
        let mut data = [Coor2D([xy.x, xy.y])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        let [lon, lat] = data[0].0;
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }

        Some(coord! { x: lon.to_degrees(), y: lat.to_degrees() })
    }
}
