//! Cosmetic smoothing of road geometries.

use geo_types::LineString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::RoadSegment;
use crate::spline::{ParametricSpline, SplineDegree};

/// Number of vertices of a smoothed line by default.
pub const DEFAULT_SMOOTHED_POINTS: usize = 500;

/// Reason a geometry was left unsmoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmoothingError {
    /// Lines with two or fewer vertices are already as simple as they get.
    #[error("{0} vertices are not enough to fit a curve")]
    TooFewVertices(usize),
    /// Vertex at the index repeats the previous one.
    #[error("vertex {0} repeats the previous vertex")]
    RepeatedVertex(usize),
    /// Input or fitted values are not finite.
    #[error("non-finite coordinate")]
    NonFinite,
    /// Spline equations have no stable solution.
    #[error("spline system is singular")]
    SingularSystem,
}

/// Smoothing parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingOptions {
    /// Number of vertices of a smoothed line.
    pub num_points: usize,
    /// Degree of the interpolating spline.
    pub degree: SplineDegree,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_SMOOTHED_POINTS,
            degree: SplineDegree::Cubic,
        }
    }
}

/// Replaces road geometries with a resampled interpolating spline through their vertices.
#[derive(Debug, Clone, Default)]
pub struct Smoother {
    options: SmoothingOptions,
}

impl Smoother {
    /// Creates a smoother.
    pub fn new(options: SmoothingOptions) -> Self {
        Self { options }
    }

    /// Smoothed version of the line, or the reason it cannot be smoothed.
    pub fn try_smooth(&self, line: &LineString) -> Result<LineString, SmoothingError> {
        let vertices = line.0.len();
        if vertices <= 2 {
            return Err(SmoothingError::TooFewVertices(vertices));
        }

        let spline = ParametricSpline::fit(&line.0, self.options.degree)?;
        let points = spline.sample(self.options.num_points);
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(SmoothingError::NonFinite);
        }

        Ok(LineString::new(points))
    }

    /// Smoothed version of the line. Lines that cannot be smoothed are returned unchanged.
    pub fn smooth(&self, line: &LineString) -> LineString {
        match self.try_smooth(line) {
            Ok(smoothed) => smoothed,
            Err(SmoothingError::TooFewVertices(_)) => line.clone(),
            Err(err) => {
                log::debug!("Keeping geometry unsmoothed: {err}");
                line.clone()
            }
        }
    }

    /// Smooths every segment. The number and order of segments never changes.
    pub fn smooth_records(&self, records: Vec<RoadSegment>) -> Vec<RoadSegment> {
        records
            .into_iter()
            .map(|record| {
                let geometry = self.smooth(&record.geometry);
                record.with_geometry(geometry)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo_types::line_string;

    fn curved() -> LineString {
        line_string![
            (x: 0.40, y: 51.70),
            (x: 0.42, y: 51.72),
            (x: 0.45, y: 51.73),
            (x: 0.47, y: 51.75),
            (x: 0.50, y: 51.755),
        ]
    }

    #[test]
    fn resamples_to_configured_count() {
        let smoother = Smoother::default();
        let line = curved();
        let smoothed = smoother.smooth(&line);

        assert_eq!(smoothed.0.len(), DEFAULT_SMOOTHED_POINTS);
        assert_eq!(smoothed.0.first(), line.0.first());
        assert_abs_diff_eq!(smoothed.0[499].x, 0.50, epsilon = 1e-12);
        assert_abs_diff_eq!(smoothed.0[499].y, 51.755, epsilon = 1e-12);
    }

    #[test]
    fn custom_point_count() {
        let smoother = Smoother::new(SmoothingOptions {
            num_points: 20,
            degree: SplineDegree::Linear,
        });
        assert_eq!(smoother.smooth(&curved()).0.len(), 20);
    }

    #[test]
    fn three_vertices_are_smoothed() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 0.0)];
        assert_eq!(Smoother::default().smooth(&line).0.len(), DEFAULT_SMOOTHED_POINTS);
    }

    #[test]
    fn short_lines_are_unchanged() {
        let line = line_string![(x: 0.1, y: 51.5), (x: 0.2, y: 51.6)];
        let smoother = Smoother::default();

        assert_matches!(
            smoother.try_smooth(&line),
            Err(SmoothingError::TooFewVertices(2))
        );
        assert_eq!(smoother.smooth(&line), line);
    }

    #[test]
    fn failed_fit_keeps_original() {
        let line = line_string![
            (x: 0.1, y: 51.5),
            (x: 0.2, y: 51.6),
            (x: 0.2, y: 51.6),
            (x: 0.3, y: 51.5),
        ];
        let smoother = Smoother::default();

        assert_matches!(
            smoother.try_smooth(&line),
            Err(SmoothingError::RepeatedVertex(2))
        );
        assert_eq!(smoother.smooth(&line), line);
    }

    #[test]
    fn never_drops_records() {
        let records = vec![
            RoadSegment::new(curved(), "A12", 30, 3),
            RoadSegment::new(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)], "A13", 40, 5),
            RoadSegment::new(
                line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
                "A14",
                50,
                9,
            ),
        ];

        let smoothed = Smoother::default().smooth_records(records.clone());

        assert_eq!(smoothed.len(), records.len());
        assert_eq!(smoothed[0].vertex_count(), DEFAULT_SMOOTHED_POINTS);
        assert_eq!(smoothed[1], records[1]);
        assert_eq!(smoothed[2], records[2]);
        assert_eq!(smoothed[0].road_number, "A12");
    }

    #[test]
    fn deterministic() {
        let smoother = Smoother::default();
        assert_eq!(smoother.smooth(&curved()), smoother.smooth(&curved()));
    }
}
