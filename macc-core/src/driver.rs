//! Per-year evaluation of a single driver line.
//!
//! Resolves the effective unit price and emission factor for one line in
//! one year, applying overrides and compound drift, and converts the
//! adoption-scaled usage delta into an emissions delta and a driver cost
//! in crore.

use crate::catalog::{CatalogEntry, ElectricityEntry};
use crate::finance::CR;
use crate::measure::{DriverLine, ElectricityLine};
use crate::series::value_at;

/// Evaluated values for one driver line in one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineYearValue {
    pub effective_price: f64,
    pub effective_ef: f64,
    /// Adoption-scaled usage delta (units, or MWh for electricity).
    pub quantity: f64,
    /// Emissions delta vs BAU (tCO₂, + = more emissions).
    pub delta_emissions: f64,
    /// Cost contribution in crore.
    pub driver_cost_cr: f64,
}

/// Compound a base value at `pct_per_year` percent over `years` years.
fn escalate(base: f64, pct_per_year: f64, years: f64) -> f64 {
    base * (1.0 + pct_per_year / 100.0).powf(years)
}

/// Evaluate a fuel/raw/transport/waste line for one year.
///
/// `entry` is the resolved catalog entry; `None` (the referenced key no
/// longer exists) degrades price and EF to 0 rather than erroring.
pub fn evaluate_line(
    line: &DriverLine,
    entry: Option<&CatalogEntry>,
    year_index: usize,
    years_since_base: f64,
    adoption_fraction: f64,
) -> LineYearValue {
    let base_price = line
        .price_override
        .or(entry.map(|e| e.price_per_unit))
        .unwrap_or(0.0);
    let base_ef = line
        .ef_override
        .or(entry.map(|e| e.ef_per_unit))
        .unwrap_or(0.0);

    let effective_price = escalate(base_price, line.price_drift_pct_per_year, years_since_base);
    let effective_ef = escalate(base_ef, line.ef_drift_pct_per_year, years_since_base);

    let quantity = adoption_fraction * value_at(&line.delta, year_index);

    LineYearValue {
        effective_price,
        effective_ef,
        quantity,
        delta_emissions: quantity * effective_ef,
        driver_cost_cr: quantity * effective_price / CR,
    }
}

/// Evaluate an electricity line for one year.
///
/// An explicit per-year EF override wins outright for that year: no drift
/// escalation is applied on top of it.
pub fn evaluate_electricity_line(
    line: &ElectricityLine,
    entry: Option<&ElectricityEntry>,
    year_index: usize,
    years_since_base: f64,
    adoption_fraction: f64,
) -> LineYearValue {
    let base_price = line
        .price_override
        .or(entry.map(|e| e.price_per_mwh))
        .unwrap_or(0.0);
    let effective_price = escalate(base_price, line.price_drift_pct_per_year, years_since_base);

    let effective_ef = match line.ef_override_per_year.get(year_index).copied().flatten() {
        Some(override_ef) if override_ef.is_finite() => override_ef,
        _ => {
            let base_ef = entry.map(|e| e.ef_per_mwh).unwrap_or(0.0);
            escalate(base_ef, line.ef_drift_pct_per_year, years_since_base)
        }
    };

    let quantity = adoption_fraction * value_at(&line.delta_mwh, year_index);

    LineYearValue {
        effective_price,
        effective_ef,
        quantity,
        delta_emissions: quantity * effective_ef,
        driver_cost_cr: quantity * effective_price / CR,
    }
}
