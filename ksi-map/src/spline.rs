//! Interpolating parametric splines through polyline vertices.
//!
//! A curve is parametrised by normalised cumulative chord length, so the first vertex is at `0`
//! and the last one at `1`. Each coordinate is interpolated independently. Cubic curves use
//! not-a-knot end conditions and are stored in Hermite form (values and first derivatives at the
//! knots).

use geo_types::{coord, Coord};
use serde::{Deserialize, Serialize};

use crate::smoother::SmoothingError;

/// Degree of the interpolating spline.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineDegree {
    /// Piecewise linear interpolation.
    Linear,
    /// Cubic interpolation, C2 continuous.
    #[default]
    Cubic,
}

#[derive(Debug, Clone)]
pub(crate) struct ParametricSpline {
    params: Vec<f64>,
    x: Interpolant,
    y: Interpolant,
}

#[derive(Debug, Clone)]
struct Interpolant {
    values: Vec<f64>,
    slopes: Option<Vec<f64>>,
}

impl ParametricSpline {
    pub(crate) fn fit(coords: &[Coord], degree: SplineDegree) -> Result<Self, SmoothingError> {
        if coords.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(SmoothingError::NonFinite);
        }

        let params = chord_length_params(coords)?;
        let xs: Vec<f64> = coords.iter().map(|c| c.x).collect();
        let ys: Vec<f64> = coords.iter().map(|c| c.y).collect();

        Ok(Self {
            x: Interpolant::fit(&params, xs, degree)?,
            y: Interpolant::fit(&params, ys, degree)?,
            params,
        })
    }

    /// Parameter values of the fitted vertices.
    #[cfg(test)]
    pub(crate) fn params(&self) -> &[f64] {
        &self.params
    }

    /// Point of the curve at `t`, clamped into `[0, 1]`.
    pub(crate) fn evaluate(&self, t: f64) -> Coord {
        let t = t.clamp(0.0, 1.0);
        let i = self.segment_index(t);

        coord! {
            x: self.x.evaluate(&self.params, i, t),
            y: self.y.evaluate(&self.params, i, t),
        }
    }

    /// `count` points at evenly spaced parameters, first and last ones included.
    pub(crate) fn sample(&self, count: usize) -> Vec<Coord> {
        match count {
            0 => vec![],
            1 => vec![self.evaluate(0.0)],
            _ => {
                let step = 1.0 / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        let t = if i == count - 1 { 1.0 } else { i as f64 * step };
                        self.evaluate(t)
                    })
                    .collect()
            }
        }
    }

    fn segment_index(&self, t: f64) -> usize {
        let last = self.params.len() - 2;
        self.params
            .partition_point(|&p| p <= t)
            .saturating_sub(1)
            .min(last)
    }
}

impl Interpolant {
    fn fit(params: &[f64], values: Vec<f64>, degree: SplineDegree) -> Result<Self, SmoothingError> {
        let slopes = match degree {
            SplineDegree::Linear => None,
            SplineDegree::Cubic if values.len() < 3 => None,
            SplineDegree::Cubic => Some(not_a_knot_slopes(params, &values)?),
        };

        Ok(Self { values, slopes })
    }

    fn evaluate(&self, params: &[f64], i: usize, t: f64) -> f64 {
        let h = params[i + 1] - params[i];
        let s = (t - params[i]) / h;
        let (y0, y1) = (self.values[i], self.values[i + 1]);

        match &self.slopes {
            None => y0 + s * (y1 - y0),
            Some(m) => {
                let s2 = s * s;
                let s3 = s2 * s;
                let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
                let h10 = s3 - 2.0 * s2 + s;
                let h01 = -2.0 * s3 + 3.0 * s2;
                let h11 = s3 - s2;

                h00 * y0 + h10 * h * m[i] + h01 * y1 + h11 * h * m[i + 1]
            }
        }
    }
}

fn chord_length_params(coords: &[Coord]) -> Result<Vec<f64>, SmoothingError> {
    if coords.len() < 2 {
        return Err(SmoothingError::TooFewVertices(coords.len()));
    }

    let mut params = Vec::with_capacity(coords.len());
    let mut total = 0.0;
    params.push(total);

    for (index, pair) in coords.windows(2).enumerate() {
        let step = (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y);
        if step <= 0.0 {
            return Err(SmoothingError::RepeatedVertex(index + 1));
        }

        total += step;
        params.push(total);
    }

    for p in params.iter_mut() {
        *p /= total;
    }
    if let Some(last) = params.last_mut() {
        *last = 1.0;
    }

    Ok(params)
}

/// First derivatives at the knots of the cubic spline through `(params[i], values[i])` with
/// not-a-knot end conditions. Three points give the interpolating parabola.
fn not_a_knot_slopes(params: &[f64], values: &[f64]) -> Result<Vec<f64>, SmoothingError> {
    let n = values.len();
    let dx: Vec<f64> = params.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = values
        .windows(2)
        .zip(&dx)
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();

    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    if n == 3 {
        diag[0] = 1.0;
        upper[0] = 1.0;
        rhs[0] = 2.0 * slope[0];

        lower[1] = dx[1];
        diag[1] = 2.0 * (dx[0] + dx[1]);
        upper[1] = dx[0];
        rhs[1] = 3.0 * (dx[0] * slope[1] + dx[1] * slope[0]);

        lower[2] = 1.0;
        diag[2] = 1.0;
        rhs[2] = 2.0 * slope[1];
    } else {
        let first = params[2] - params[0];
        diag[0] = dx[1];
        upper[0] = first;
        rhs[0] = ((dx[0] + 2.0 * first) * dx[1] * slope[0] + dx[0] * dx[0] * slope[1]) / first;

        for i in 1..n - 1 {
            lower[i] = dx[i];
            diag[i] = 2.0 * (dx[i - 1] + dx[i]);
            upper[i] = dx[i - 1];
            rhs[i] = 3.0 * (dx[i] * slope[i - 1] + dx[i - 1] * slope[i]);
        }

        let last = params[n - 1] - params[n - 3];
        lower[n - 1] = last;
        diag[n - 1] = dx[n - 3];
        rhs[n - 1] = (dx[n - 2] * dx[n - 2] * slope[n - 3]
            + (2.0 * last + dx[n - 2]) * dx[n - 3] * slope[n - 2])
            / last;
    }

    solve_tridiagonal(&lower, diag, &upper, rhs)
}

/// Thomas algorithm. `lower[0]` and `upper[n - 1]` are ignored.
fn solve_tridiagonal(
    lower: &[f64],
    mut diag: Vec<f64>,
    upper: &[f64],
    mut rhs: Vec<f64>,
) -> Result<Vec<f64>, SmoothingError> {
    let n = diag.len();
    let pivot_ok = |p: f64| p.is_finite() && p.abs() > f64::EPSILON * 1e-3;

    for i in 1..n {
        if !pivot_ok(diag[i - 1]) {
            return Err(SmoothingError::SingularSystem);
        }
        let w = lower[i] / diag[i - 1];
        diag[i] -= w * upper[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }

    if !pivot_ok(diag[n - 1]) {
        return Err(SmoothingError::SingularSystem);
    }

    let mut solution = rhs;
    solution[n - 1] /= diag[n - 1];
    for i in (0..n - 1).rev() {
        solution[i] = (solution[i] - upper[i] * solution[i + 1]) / diag[i];
    }

    if solution.iter().any(|v| !v.is_finite()) {
        return Err(SmoothingError::NonFinite);
    }

    Ok(solution)
}
