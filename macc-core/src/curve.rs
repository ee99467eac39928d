//! Cost-curve assembly: sorting, cumulative step segments and curve points.
//!
//! Measures are ranked by effective marginal cost (cheapest first, stable
//! on ties) and walked cumulatively to produce the step segments of the
//! MACC and the per-measure (x, cost) points the smoothed fits are
//! computed over.

use crate::baseline::ALL_SECTORS;
use crate::measure::Measure;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Fixed colour palette cycled by sorted position when a measure carries
/// no explicit colour.
pub const PALETTE: [&str; 25] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab", "#2f4b7c", "#ffa600", "#a05195", "#003f5c", "#d45087", "#1f77b4",
    "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22",
    "#17becf",
];

/// What the cumulative x-axis measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisMode {
    /// Cumulative abatement in tCO₂.
    #[default]
    Capacity,
    /// Cumulative abatement as % of baseline annual emissions.
    Intensity,
}

impl AxisMode {
    /// Transform a cumulative abatement value into plot units.
    pub fn to_plot(&self, value: f64, baseline_emissions: f64) -> f64 {
        match self {
            AxisMode::Capacity => value,
            AxisMode::Intensity => {
                if baseline_emissions > 0.0 {
                    value / baseline_emissions * 100.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// A measure after filtering and effective-cost ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMeasure {
    pub id: f64,
    pub name: String,
    pub sector: String,
    pub abatement_tco2: f64,
    pub effective_cost: f64,
    pub color_override: Option<String>,
}

/// One bar of the step curve, bounds in plot units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: f64,
    pub name: String,
    pub sector: String,
    pub x1: f64,
    pub x2: f64,
    pub cost: f64,
    pub abatement: f64,
    pub color: String,
}

/// One per-measure point of the cumulative curve, emitted at the upper
/// cumulative bound; the fit routines consume these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePoint {
    pub id: f64,
    pub name: String,
    pub sector: String,
    pub abatement: f64,
    pub cost: f64,
    pub cumulative_abatement: f64,
    pub x: f64,
}

/// Filter to selected measures in the sector and rank ascending by
/// effective marginal cost. The sort is stable, so equal-cost measures
/// keep their original relative order.
pub fn rank_measures(measures: &[Measure], sector: &str, carbon_price: f64) -> Vec<RankedMeasure> {
    let mut ranked: Vec<RankedMeasure> = measures
        .iter()
        .filter(|m| m.selected && (sector == ALL_SECTORS || m.sector == sector))
        .map(|m| RankedMeasure {
            id: m.id,
            name: m.name.clone(),
            sector: m.sector.clone(),
            abatement_tco2: m.abatement_tco2,
            effective_cost: m.effective_cost(carbon_price),
            color_override: m.display_color().map(str::to_string),
        })
        .collect();
    ranked.sort_by(|a, b| {
        a.effective_cost
            .partial_cmp(&b.effective_cost)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Build the cumulative step segments of the curve, returning the segments
/// and the total curve width (the last upper bound, or 0).
///
/// Measures with non-finite cost/abatement or non-positive abatement are
/// skipped but still consume a palette slot, so colours stay stable as
/// measures toggle in and out of the curve.
pub fn build_segments(
    ranked: &[RankedMeasure],
    axis_mode: AxisMode,
    baseline_emissions: f64,
) -> (Vec<Segment>, f64) {
    let mut segments = Vec::new();
    let mut cumulative = 0.0_f64;

    for (position, measure) in ranked.iter().enumerate() {
        let abatement = measure.abatement_tco2;
        let cost = measure.effective_cost;
        if !abatement.is_finite() || !cost.is_finite() || abatement <= 0.0 {
            debug!(
                "skipping measure '{}' from curve (abatement {}, cost {})",
                measure.name, abatement, cost
            );
            continue;
        }

        let x1 = cumulative;
        let x2 = cumulative + abatement;
        cumulative = x2;

        let color = measure
            .color_override
            .clone()
            .unwrap_or_else(|| PALETTE[position % PALETTE.len()].to_string());

        segments.push(Segment {
            id: measure.id,
            name: measure.name.clone(),
            sector: measure.sector.clone(),
            x1: axis_mode.to_plot(x1, baseline_emissions),
            x2: axis_mode.to_plot(x2, baseline_emissions),
            cost,
            abatement,
            color,
        });
    }

    let total_width = segments.last().map(|s| s.x2).unwrap_or(0.0);
    (segments, total_width)
}

/// Mirror the cumulative walk as one (x, cost) point per ranked measure at
/// the upper cumulative bound. Non-positive abatement contributes no width
/// but still emits a point.
pub fn curve_points(
    ranked: &[RankedMeasure],
    axis_mode: AxisMode,
    baseline_emissions: f64,
) -> Vec<CurvePoint> {
    let mut cumulative = 0.0_f64;
    ranked
        .iter()
        .map(|measure| {
            cumulative += measure.abatement_tco2.max(0.0);
            CurvePoint {
                id: measure.id,
                name: measure.name.clone(),
                sector: measure.sector.clone(),
                abatement: measure.abatement_tco2,
                cost: measure.effective_cost,
                cumulative_abatement: cumulative,
                x: axis_mode.to_plot(cumulative, baseline_emissions),
            }
        })
        .collect()
}

/// Cost-axis display bounds: the segment cost range padded by 10% (at
/// least 1), always spanning zero.
pub fn cost_axis_domain(segments: &[Segment]) -> (f64, f64) {
    if segments.is_empty() {
        return (0.0, 1.0);
    }
    let mut min_y = 0.0_f64;
    let mut max_y = 0.0_f64;
    for segment in segments {
        min_y = min_y.min(segment.cost);
        max_y = max_y.max(segment.cost);
    }
    let padding = ((max_y - min_y) * 0.1).max(1.0);
    (min_y - padding, max_y + padding)
}

/// The x-position of a reduction target, in plot units.
pub fn target_x(axis_mode: AxisMode, baseline_emissions: f64, target_pct: f64) -> f64 {
    match axis_mode {
        AxisMode::Capacity => {
            if baseline_emissions > 0.0 {
                baseline_emissions * target_pct / 100.0
            } else {
                0.0
            }
        }
        AxisMode::Intensity => target_pct,
    }
}
