//! Greedy target/budget walk along the ranked curve.
//!
//! Walks the measures cheapest-first, taking abatement until a reduction
//! target (% of baseline annual emissions) is met or the curve runs out,
//! and accumulates the spend at each measure's effective marginal cost.

use crate::curve::{AxisMode, RankedMeasure};
use log::debug;

/// Result of walking the curve toward a reduction target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetOutcome {
    /// Abatement actually reached, in the axis's plot units, capped at
    /// what the curve offers.
    pub reached: f64,
    /// Cumulative spend over the taken abatement (currency per year).
    /// Negative when the walk is dominated by cost-saving measures.
    pub budget: f64,
}

/// Walk the ranked curve toward `target_pct` percent of
/// `baseline_emissions`, greedily taking the cheapest abatement first.
///
/// Measures with non-finite or non-positive abatement contribute nothing.
/// When the curve cannot cover the target the walk stops at the total
/// available abatement.
pub fn solve_target(
    ranked: &[RankedMeasure],
    target_pct: f64,
    baseline_emissions: f64,
    axis_mode: AxisMode,
) -> TargetOutcome {
    let target_t = if baseline_emissions > 0.0 && target_pct > 0.0 {
        baseline_emissions * target_pct / 100.0
    } else {
        0.0
    };

    let mut remaining = target_t;
    let mut taken_t = 0.0_f64;
    let mut budget = 0.0_f64;

    for measure in ranked {
        if remaining <= 0.0 {
            break;
        }
        let abatement = measure.abatement_tco2;
        if !abatement.is_finite() || !measure.effective_cost.is_finite() || abatement <= 0.0 {
            continue;
        }
        let take = remaining.min(abatement);
        taken_t += take;
        budget += take * measure.effective_cost;
        remaining -= take;
    }

    if remaining > 0.0 {
        debug!(
            "curve exhausted {:.1} tCO2 short of the {:.1}% target",
            remaining, target_pct
        );
    }

    TargetOutcome {
        reached: axis_mode.to_plot(taken_t, baseline_emissions),
        budget,
    }
}
