//! Least-squares fits over (x, cost) point sets.
//!
//! These fits produce smoothed renderings of the step curve; they are
//! advisory only and never feed back into the target/budget allocation.
//! Insufficient or degenerate data yields `None` ("no fit") instead of
//! garbage coefficients.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Determinant threshold below which a normal-equations system is treated
/// as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Simple ordinary-least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; `None` when the y-values carry no
    /// variance (SST = 0).
    pub r2: Option<f64>,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Quadratic least-squares fit `y = a + b·x + c·x²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r2: Option<f64>,
}

impl QuadraticFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.a + self.b * x + self.c * x * x
    }
}

/// One line of a two-segment piecewise fit, spanning the x-range of the
/// points it was fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseSegment {
    pub start_x: f64,
    pub end_x: f64,
    pub fit: LinearFit,
}

/// Two-segment piecewise-linear fit: one line for points with cost ≤ 0,
/// another for points with cost > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseFit {
    pub segments: Vec<PiecewiseSegment>,
    /// Input points mapped through whichever segment's line applies to them.
    pub fitted: Vec<(f64, f64)>,
    /// Combined R² across both segments, compared against every point with
    /// an applicable line; `None` when those points carry no variance.
    pub r2: Option<f64>,
}

impl PiecewiseFit {
    /// A piecewise fit is only usable as a curve rendering when it produced
    /// at least two fitted output points.
    pub fn is_usable(&self) -> bool {
        self.fitted.len() >= 2
    }
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Ordinary least-squares simple linear regression.
///
/// Requires at least two points. A degenerate x-spread (all points at the
/// same x) yields a horizontal line through the mean of y.
pub fn linear_regression(xs: ArrayView1<'_, f64>, ys: ArrayView1<'_, f64>) -> Option<LinearFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }
    let n_f = n as f64;

    let sx = xs.sum();
    let sy = ys.sum();
    let sxx = xs.dot(&xs);
    let sxy = xs.dot(&ys);

    let denom = n_f * sxx - sx * sx;
    let (slope, intercept) = if denom.abs() < SINGULAR_EPS {
        (0.0, sy / n_f)
    } else {
        let slope = (n_f * sxy - sx * sy) / denom;
        (slope, (sy - slope * sx) / n_f)
    };

    let y_mean = sy / n_f;
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let y_hat = slope * x + intercept;
        sse += (y - y_hat).powi(2);
        sst += (y - y_mean).powi(2);
    }
    let r2 = (sst > 0.0).then(|| 1.0 - sse / sst);

    Some(LinearFit {
        slope,
        intercept,
        r2,
    })
}

/// Quadratic least-squares fit via the 3×3 normal-equations system, solved
/// with Cramer's rule.
///
/// Returns `None` for fewer than three points or a numerically singular
/// system.
pub fn quadratic_fit(xs: ArrayView1<'_, f64>, ys: ArrayView1<'_, f64>) -> Option<QuadraticFit> {
    let n = xs.len();
    if n < 3 || ys.len() != n {
        return None;
    }
    let n_f = n as f64;

    let mut sx = 0.0;
    let mut sx2 = 0.0;
    let mut sx3 = 0.0;
    let mut sx4 = 0.0;
    let mut sy = 0.0;
    let mut sxy = 0.0;
    let mut sx2y = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let x2 = x * x;
        sx += x;
        sx2 += x2;
        sx3 += x2 * x;
        sx4 += x2 * x2;
        sy += y;
        sxy += x * y;
        sx2y += x2 * y;
    }

    let m = [[n_f, sx, sx2], [sx, sx2, sx3], [sx2, sx3, sx4]];
    let d = det3(m);
    if d.abs() < SINGULAR_EPS {
        return None;
    }

    let m_a = [[sy, sx, sx2], [sxy, sx2, sx3], [sx2y, sx3, sx4]];
    let m_b = [[n_f, sy, sx2], [sx, sxy, sx3], [sx2, sx2y, sx4]];
    let m_c = [[n_f, sx, sy], [sx, sx2, sxy], [sx2, sx3, sx2y]];

    let a = det3(m_a) / d;
    let b = det3(m_b) / d;
    let c = det3(m_c) / d;

    let y_mean = sy / n_f;
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let y_hat = a + b * x + c * x * x;
        sse += (y - y_hat).powi(2);
        sst += (y - y_mean).powi(2);
    }
    let r2 = (sst > 0.0).then(|| 1.0 - sse / sst);

    Some(QuadraticFit { a, b, c, r2 })
}

/// Two-segment piecewise-linear fit over (x, cost) points.
///
/// Points are partitioned at cost ≤ 0 / cost > 0 (zero-cost points join the
/// non-positive group) and an independent OLS line is fitted to each group
/// with at least two points. Requires at least four points overall; returns
/// `None` otherwise.
pub fn piecewise_linear_fit(points: &[(f64, f64)]) -> Option<PiecewiseFit> {
    if points.len() < 4 {
        return None;
    }

    let negative: Vec<(f64, f64)> = points.iter().copied().filter(|p| p.1 <= 0.0).collect();
    let positive: Vec<(f64, f64)> = points.iter().copied().filter(|p| p.1 > 0.0).collect();

    let fit_group = |group: &[(f64, f64)]| -> Option<PiecewiseSegment> {
        if group.len() < 2 {
            return None;
        }
        let xs: Vec<f64> = group.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = group.iter().map(|p| p.1).collect();
        let fit = linear_regression(
            ArrayView1::from(xs.as_slice()),
            ArrayView1::from(ys.as_slice()),
        )?;
        Some(PiecewiseSegment {
            start_x: group[0].0,
            end_x: group[group.len() - 1].0,
            fit,
        })
    };

    let negative_fit = fit_group(&negative);
    let positive_fit = fit_group(&positive);

    let mut segments = Vec::new();
    if let Some(seg) = negative_fit {
        segments.push(seg);
    }
    if let Some(seg) = positive_fit {
        segments.push(seg);
    }

    // Map each point through whichever group's line applies to it; points
    // whose group produced no line are left out of the fitted rendering.
    let mut fitted = Vec::new();
    let mut sse = 0.0;
    let mut sst = 0.0;
    let mut covered_sum = 0.0;
    let mut covered = Vec::new();
    for &(x, y) in points {
        let line = if y <= 0.0 { &negative_fit } else { &positive_fit };
        if let Some(seg) = line {
            fitted.push((x, seg.fit.predict(x)));
            covered.push((x, y, seg.fit));
            covered_sum += y;
        }
    }
    if !covered.is_empty() {
        let y_mean = covered_sum / covered.len() as f64;
        for &(x, y, fit) in &covered {
            sse += (y - fit.predict(x)).powi(2);
            sst += (y - y_mean).powi(2);
        }
    }
    let r2 = (sst > 0.0).then(|| 1.0 - sse / sst);

    Some(PiecewiseFit {
        segments,
        fitted,
        r2,
    })
}
