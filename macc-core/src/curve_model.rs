//! Curve rendering models and their availability rules.
//!
//! The step rendering is always available; the quadratic and piecewise
//! renderings depend on fits over the current curve points and fall back
//! to the step model when their fit cannot be produced.

use crate::curve::CurvePoint;
use crate::errors::MaccError;
use crate::regression::{self, PiecewiseFit, QuadraticFit};
use log::warn;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the cost curve is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveModel {
    /// The exact cumulative step curve.
    #[default]
    Step,
    /// Quadratic least-squares fit over the curve points.
    Quadratic,
    /// Two-segment piecewise-linear fit split at zero cost.
    Piecewise,
}

impl CurveModel {
    /// Keep the requested model only while its fit is available, otherwise
    /// fall back to the step rendering.
    pub fn reconcile(self, quadratic_available: bool, piecewise_available: bool) -> CurveModel {
        match self {
            CurveModel::Quadratic if !quadratic_available => {
                warn!("quadratic fit unavailable, falling back to step curve");
                CurveModel::Step
            }
            CurveModel::Piecewise if !piecewise_available => {
                warn!("piecewise fit unavailable, falling back to step curve");
                CurveModel::Step
            }
            model => model,
        }
    }
}

impl fmt::Display for CurveModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveModel::Step => "step",
            CurveModel::Quadratic => "quadratic",
            CurveModel::Piecewise => "piecewise",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CurveModel {
    type Err = MaccError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "step" => Ok(CurveModel::Step),
            "quadratic" => Ok(CurveModel::Quadratic),
            "piecewise" => Ok(CurveModel::Piecewise),
            other => Err(MaccError::UnknownCurveModel(other.to_string())),
        }
    }
}

/// Quadratic fit plus its rendering sampled at every curve point's x.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadraticCurve {
    pub fit: QuadraticFit,
    pub fitted: Vec<(f64, f64)>,
}

/// The smoothed renderings available for the current curve points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurveFits {
    pub quadratic: Option<QuadraticCurve>,
    pub piecewise: Option<PiecewiseFit>,
}

impl CurveFits {
    pub fn quadratic_available(&self) -> bool {
        self.quadratic.is_some()
    }

    pub fn piecewise_available(&self) -> bool {
        self.piecewise.is_some()
    }
}

/// Compute the smoothed fits for a set of curve points.
///
/// With `positive_costs_only` the quadratic regression is restricted to
/// points with non-negative cost, which keeps deep cost-saving outliers
/// from bending the parabola; the fitted rendering is still sampled at
/// every point's x. The piecewise fit always sees all points since it
/// splits on the cost sign itself.
pub fn fit_curve(points: &[CurvePoint], positive_costs_only: bool) -> CurveFits {
    let quad_input: Vec<(f64, f64)> = points
        .iter()
        .filter(|p| !positive_costs_only || p.cost >= 0.0)
        .map(|p| (p.x, p.cost))
        .collect();

    let quadratic = if quad_input.len() >= 3 {
        let xs = Array1::from_iter(quad_input.iter().map(|p| p.0));
        let ys = Array1::from_iter(quad_input.iter().map(|p| p.1));
        regression::quadratic_fit(xs.view(), ys.view()).map(|fit| QuadraticCurve {
            fitted: points.iter().map(|p| (p.x, fit.predict(p.x))).collect(),
            fit,
        })
    } else {
        None
    };

    let all_points: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.cost)).collect();
    let piecewise = regression::piecewise_linear_fit(&all_points).filter(|fit| fit.is_usable());

    CurveFits {
        quadratic,
        piecewise,
    }
}
