//! Multi-driver measure projection.
//!
//! Turns a template measure's driver lines, adoption profile and financial
//! stack into a per-year series of abatement, net cost and cash flows, and
//! aggregates (NPV, average cost, representative year). This is the engine
//! behind every template-mode measure's curve-facing scalars.
//!
//! Sign convention: driver deltas are usage changes vs business-as-usual
//! (+ = more), so direct abatement is the *negated* emissions delta plus
//! any "other direct reduction".

use crate::catalog::Catalogs;
use crate::driver::{evaluate_electricity_line, evaluate_line};
use crate::finance::{annuity_factor, npv, CR};
use crate::horizon::Horizon;
use crate::measure::TemplateDetails;
use crate::series::{clamp01, value_at};
use ndarray::Array1;

/// Itemised per-year contributions, by driver category and cost component.
/// Category abatements are sign-flipped deltas (+ = reduction).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearBreakdown {
    pub fuel_t: f64,
    pub raw_t: f64,
    pub transport_t: f64,
    pub waste_t: f64,
    pub electricity_t: f64,
    pub other_t: f64,
    /// Total emissions delta vs BAU (+ = more emissions).
    pub delta_emissions_t: f64,
    pub driver_cr: f64,
    pub opex_cr: f64,
    pub other_cr: f64,
    pub savings_cr: f64,
    pub financed_annuity_cr: f64,
    pub capex_upfront_cr: f64,
}

/// Projection of one measure for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearProjection {
    pub year: i32,
    /// Net abatement vs BAU (tCO₂, + = reduction).
    pub direct_abatement_t: f64,
    /// Net recurring cost in crore, excluding upfront capex.
    pub net_cost_cr: f64,
    /// Implied marginal cost per tCO₂ without the carbon price; 0 when
    /// abatement is non-positive.
    pub implied_cost_per_t: f64,
    /// Implied marginal cost per tCO₂ net of carbon price revenue.
    pub implied_cost_per_t_with_cp: f64,
    /// Cash flow in currency units, excluding carbon price (+ = inflow).
    pub cashflow: f64,
    /// Cash flow including carbon price revenue on abated tonnes.
    pub cashflow_with_cp: f64,
    pub breakdown: YearBreakdown,
}

/// Full projection of one measure across the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub years: Vec<YearProjection>,
    /// First year with positive abatement, else the mid-horizon anchor.
    pub auto_representative_index: usize,
    /// Discounted NPV of the cash-flow series, excluding carbon price.
    pub npv: f64,
    pub npv_with_cp: f64,
    /// Simple (non-discounted) cost per tonne over the whole horizon,
    /// excluding carbon price; 0 when no year abates.
    pub average_cost_per_t: f64,
    pub average_cost_per_t_with_cp: f64,
    /// Sum of positive per-year abatement across the horizon.
    pub total_abatement_t: f64,
}

impl Projection {
    /// Resolve the representative-year index, clamping any explicit caller
    /// override into the horizon.
    pub fn representative_index(&self, explicit: Option<usize>) -> usize {
        match explicit {
            Some(index) => index.min(self.years.len().saturating_sub(1)),
            None => self.auto_representative_index,
        }
    }

    /// The representative year's projection; `None` only for a projection
    /// over zero years.
    pub fn representative(&self, explicit: Option<usize>) -> Option<&YearProjection> {
        self.years.get(self.representative_index(explicit))
    }

    /// The (abatement, cost) pair promoted to a measure's curve-facing
    /// scalars: abatement floored at 0, cost with or without the carbon
    /// price netted out depending on how the measure is saved. A projection
    /// with no years degrades to (0, 0).
    pub fn representative_values(&self, explicit: Option<usize>, include_cp: bool) -> (f64, f64) {
        let Some(rep) = self.representative(explicit) else {
            return (0.0, 0.0);
        };
        let cost = if include_cp {
            rep.implied_cost_per_t_with_cp
        } else {
            rep.implied_cost_per_t
        };
        (rep.direct_abatement_t.max(0.0), cost)
    }
}

/// Project a template measure over the horizon at the given carbon price.
///
/// Pure function of its inputs; the carbon price and horizon are always
/// explicit parameters.
pub fn project(
    details: &TemplateDetails,
    catalogs: &Catalogs,
    horizon: &Horizon,
    carbon_price: f64,
) -> Projection {
    let drivers = &details.drivers;
    let stack = &details.stack;

    let mut years = Vec::with_capacity(horizon.len());
    for (i, &year) in horizon.years().iter().enumerate() {
        let adoption = clamp01(value_at(&details.adoption, i));
        let years_since_base = horizon.years_since_base(i);

        let mut breakdown = YearBreakdown::default();
        let mut driver_cr = 0.0;

        let mut fuel_de = 0.0;
        for line in &drivers.fuel_lines {
            let value = evaluate_line(
                line,
                catalogs.find_fuel(&line.catalog_key),
                i,
                years_since_base,
                adoption,
            );
            fuel_de += value.delta_emissions;
            driver_cr += value.driver_cost_cr;
        }

        let mut raw_de = 0.0;
        for line in &drivers.raw_lines {
            let value = evaluate_line(
                line,
                catalogs.find_raw(&line.catalog_key),
                i,
                years_since_base,
                adoption,
            );
            raw_de += value.delta_emissions;
            driver_cr += value.driver_cost_cr;
        }

        let mut transport_de = 0.0;
        for line in &drivers.transport_lines {
            let value = evaluate_line(
                line,
                catalogs.find_transport(&line.catalog_key),
                i,
                years_since_base,
                adoption,
            );
            transport_de += value.delta_emissions;
            driver_cr += value.driver_cost_cr;
        }

        let mut waste_de = 0.0;
        for line in &drivers.waste_lines {
            let value = evaluate_line(
                line,
                catalogs.find_waste(&line.catalog_key),
                i,
                years_since_base,
                adoption,
            );
            waste_de += value.delta_emissions;
            driver_cr += value.driver_cost_cr;
        }

        let mut electricity_de = 0.0;
        for line in &drivers.electricity_lines {
            let value = evaluate_electricity_line(
                line,
                catalogs.find_electricity(&line.state),
                i,
                years_since_base,
                adoption,
            );
            electricity_de += value.delta_emissions;
            driver_cr += value.driver_cost_cr;
        }

        let delta_emissions = fuel_de + raw_de + transport_de + waste_de + electricity_de;
        let other_t = adoption * value_at(&drivers.other_direct_t, i);
        let direct_abatement = -delta_emissions + other_t;

        let opex_cr = value_at(&stack.opex_cr, i);
        let savings_cr = value_at(&stack.savings_cr, i);
        let other_cr = value_at(&stack.other_cr, i);
        let capex_upfront_cr = value_at(&stack.capex_upfront_cr, i);
        let capex_financed_cr = value_at(&stack.capex_financed_cr, i);

        let rate = value_at(&stack.interest_rate_pct, i) / 100.0;
        let tenure = value_at(&stack.financing_tenure_years, i);
        let financed_annuity_cr = if capex_financed_cr > 0.0 && rate > 0.0 && tenure > 0.0 {
            capex_financed_cr * annuity_factor(rate, tenure)
        } else {
            0.0
        };

        let net_cost_cr = driver_cr + opex_cr + other_cr - savings_cr + financed_annuity_cr;

        let cashflow = (savings_cr
            - opex_cr
            - driver_cr
            - other_cr
            - financed_annuity_cr
            - capex_upfront_cr)
            * CR;
        let cashflow_with_cp = cashflow + carbon_price * direct_abatement;

        let implied_cost_per_t = if direct_abatement > 0.0 {
            net_cost_cr * CR / direct_abatement
        } else {
            0.0
        };
        let implied_cost_per_t_with_cp = if direct_abatement > 0.0 {
            (net_cost_cr * CR - carbon_price * direct_abatement) / direct_abatement
        } else {
            0.0
        };

        breakdown.fuel_t = -fuel_de;
        breakdown.raw_t = -raw_de;
        breakdown.transport_t = -transport_de;
        breakdown.waste_t = -waste_de;
        breakdown.electricity_t = -electricity_de;
        breakdown.other_t = other_t;
        breakdown.delta_emissions_t = delta_emissions;
        breakdown.driver_cr = driver_cr;
        breakdown.opex_cr = opex_cr;
        breakdown.other_cr = other_cr;
        breakdown.savings_cr = savings_cr;
        breakdown.financed_annuity_cr = financed_annuity_cr;
        breakdown.capex_upfront_cr = capex_upfront_cr;

        years.push(YearProjection {
            year,
            direct_abatement_t: direct_abatement,
            net_cost_cr,
            implied_cost_per_t,
            implied_cost_per_t_with_cp,
            cashflow,
            cashflow_with_cp,
            breakdown,
        });
    }

    let auto_representative_index = years
        .iter()
        .position(|y| y.direct_abatement_t > 0.0)
        .unwrap_or_else(|| horizon.mid_anchor());

    let year_axis = Array1::from_iter(horizon.years().iter().copied());
    let flows = Array1::from_iter(years.iter().map(|y| y.cashflow));
    let flows_with_cp = Array1::from_iter(years.iter().map(|y| y.cashflow_with_cp));
    let rate = details.meta.discount_rate;

    let npv_wo = npv(rate, flows.view(), year_axis.view(), horizon.base_year());
    let npv_w = npv(
        rate,
        flows_with_cp.view(),
        year_axis.view(),
        horizon.base_year(),
    );

    let total_abatement: f64 = years.iter().map(|y| y.direct_abatement_t.max(0.0)).sum();
    let total_cost: f64 = years.iter().map(|y| y.net_cost_cr * CR).sum();
    let total_cost_with_cp: f64 = years
        .iter()
        .map(|y| y.net_cost_cr * CR - carbon_price * y.direct_abatement_t)
        .sum();

    let (average_cost_per_t, average_cost_per_t_with_cp) = if total_abatement > 0.0 {
        (
            total_cost / total_abatement,
            total_cost_with_cp / total_abatement,
        )
    } else {
        (0.0, 0.0)
    };

    Projection {
        years,
        auto_representative_index,
        npv: npv_wo,
        npv_with_cp: npv_w,
        average_cost_per_t,
        average_cost_per_t_with_cp,
        total_abatement_t: total_abatement,
    }
}
