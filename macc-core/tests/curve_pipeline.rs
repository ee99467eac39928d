//! End-to-end walk: imported measure JSON through projection, ranking,
//! step-curve assembly, smoothed fits and the target/budget solver.

use is_close::is_close;
use macc_core::baseline::{Baseline, BaselineSet, ALL_SECTORS};
use macc_core::catalog::{CatalogEntry, Catalogs};
use macc_core::curve::{build_segments, curve_points, rank_measures, target_x, AxisMode};
use macc_core::curve_model::{fit_curve, CurveModel};
use macc_core::horizon::Horizon;
use macc_core::measure::{normalize_measures, Measure};
use macc_core::projector::project;
use macc_core::solver::solve_target;

fn catalogs() -> Catalogs {
    Catalogs {
        fuels: vec![CatalogEntry {
            name: "Coal".to_string(),
            unit: "t".to_string(),
            price_per_unit: 5000.0,
            ef_per_unit: 2.0,
        }],
        ..Default::default()
    }
}

fn baselines() -> BaselineSet {
    let mut set = BaselineSet::new();
    set.insert(
        "Power",
        Baseline {
            production_label: "MWh".to_string(),
            annual_production: 2_000_000.0,
            annual_emissions: 1_000_000.0,
        },
    );
    set
}

/// Two quick measures and one template measure, in the exported wire
/// format, with quirks the importer must tolerate: string numbers, a
/// string boolean and a missing id.
const FIRM_DATA: &str = r##"[
    {
        "id": 1,
        "name": "Solar PPA",
        "sector": "Power",
        "selected": true,
        "abatement_tco2": 100000,
        "cost_per_tco2": 500,
        "details": { "mode": "quick", "color_hex": "#1f77b4" }
    },
    {
        "name": "Efficiency retrofit",
        "sector": "Power",
        "selected": "true",
        "abatement_tco2": "50000",
        "cost_per_tco2": "-200"
    },
    {
        "id": 3,
        "name": "Coal reduction",
        "sector": "Power",
        "abatement_tco2": 0,
        "cost_per_tco2": 0,
        "details": {
            "mode": "template_db_multiline",
            "meta": { "project_name": "Coal reduction", "sector": "Power" },
            "adoption": [1, 1, 1, 1, 1, 1],
            "drivers": {
                "fuel_lines": [
                    {
                        "name": "Coal",
                        "priceOv": "",
                        "efOv": null,
                        "priceEscPctYr": 0,
                        "efEscPctYr": 0,
                        "delta": [-100, -100, -100, -100, -100, -100]
                    }
                ]
            },
            "stack": {
                "opex_cr": [0, 0, 0, 0, 0, 0],
                "savings_cr": [0, 0, 0, 0, 0, 0],
                "other_cr": [0, 0, 0, 0, 0, 0],
                "capex_upfront_cr": [0, 0, 0, 0, 0, 0],
                "capex_financed_cr": [0, 0, 0, 0, 0, 0],
                "financing_tenure_years": [10, 10, 10, 10, 10, 10],
                "interest_rate_pct": [7, 7, 7, 7, 7, 7]
            }
        }
    }
]"##;

fn import_and_project() -> Vec<Measure> {
    let measures: Vec<Measure> = serde_json::from_str(FIRM_DATA).unwrap();
    let mut measures = normalize_measures(measures);

    let horizon = Horizon::default();
    let catalogs = catalogs();
    for measure in &mut measures {
        if let Some(details) = measure.template_details().cloned() {
            let projection = project(&details, &catalogs, &horizon, 0.0);
            let (abatement, cost) = projection.representative_values(
                details.representative_index,
                details.saved_cost_includes_carbon_price,
            );
            measure.abatement_tco2 = abatement;
            measure.cost_per_tco2 = cost;
        }
    }
    measures
}

#[test]
fn import_tolerates_wire_format_quirks() {
    let measures = import_and_project();
    assert_eq!(measures.len(), 3);

    // Missing id gets a positional one, string scalars are coerced.
    assert_eq!(measures[1].id, 2.0);
    assert!(measures[1].selected);
    assert_eq!(measures[1].abatement_tco2, 50_000.0);
    assert_eq!(measures[1].cost_per_tco2, -200.0);
}

#[test]
fn template_measure_gets_projected_scalars() {
    let measures = import_and_project();
    let template = &measures[2];

    // 100 t less coal at 2 tCO₂/t, fully adopted from the first year.
    assert!(is_close!(template.abatement_tco2, 200.0));
    assert!(is_close!(template.cost_per_tco2, -2500.0));
}

#[test]
fn curve_and_solver_agree_end_to_end() {
    let measures = import_and_project();
    let baseline = baselines().for_sector(ALL_SECTORS);

    let ranked = rank_measures(&measures, ALL_SECTORS, 0.0);
    let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Coal reduction", "Efficiency retrofit", "Solar PPA"]
    );

    let (segments, total_width) =
        build_segments(&ranked, AxisMode::Capacity, baseline.annual_emissions);
    assert_eq!(segments.len(), 3);
    assert!(is_close!(total_width, 150_200.0));
    assert_eq!(segments[2].x1, 50_200.0);
    // The quick measure's saved colour carries through to its bar.
    assert_eq!(segments[2].color, "#1f77b4");

    // 5% of 1,000,000 t = 50,000 t: the projected measure plus most of
    // the efficiency retrofit, both at negative cost.
    let outcome = solve_target(&ranked, 5.0, baseline.annual_emissions, AxisMode::Capacity);
    assert!(is_close!(outcome.reached, 50_000.0));
    assert!(is_close!(
        outcome.budget,
        200.0 * -2500.0 + 49_800.0 * -200.0
    ));
    assert!(is_close!(
        target_x(AxisMode::Capacity, baseline.annual_emissions, 5.0),
        50_000.0
    ));
}

#[test]
fn smoothed_fits_reconcile_against_availability() {
    let measures = import_and_project();
    let ranked = rank_measures(&measures, ALL_SECTORS, 0.0);
    let points = curve_points(&ranked, AxisMode::Capacity, 1_000_000.0);

    // Three points: quadratic fit exists, piecewise needs four.
    let fits = fit_curve(&points, false);
    assert!(fits.quadratic_available());
    assert!(!fits.piecewise_available());

    let model =
        CurveModel::Piecewise.reconcile(fits.quadratic_available(), fits.piecewise_available());
    assert_eq!(model, CurveModel::Step);
    let model =
        CurveModel::Quadratic.reconcile(fits.quadratic_available(), fits.piecewise_available());
    assert_eq!(model, CurveModel::Quadratic);
}

#[test]
fn carbon_price_shifts_every_effective_cost() {
    // None of these measures saved their cost with a carbon price netted
    // in, so a price shifts every effective cost down by the same amount
    // and the ranking is unchanged.
    let measures = import_and_project();

    let at_zero = rank_measures(&measures, ALL_SECTORS, 0.0);
    let at_300 = rank_measures(&measures, ALL_SECTORS, 300.0);
    for (a, b) in at_zero.iter().zip(at_300.iter()) {
        assert_eq!(a.name, b.name);
        assert!(is_close!(b.effective_cost, a.effective_cost - 300.0));
    }
}
