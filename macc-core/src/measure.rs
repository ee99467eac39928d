//! Abatement measures and their editable inputs.
//!
//! A measure carries the flat representative-year scalars the curve layer
//! consumes (`abatement_tco2`, `cost_per_tco2`) and, for template-mode
//! measures, the full driver/adoption/financing inputs those scalars were
//! projected from. Serde field names match the exported firm-data format so
//! persisted measures round-trip unchanged.

use crate::series::{default_true, f64_or_zero, loose_bool, number_seq, optional_number,
                    optional_number_seq};
use serde::{Deserialize, Serialize};

/// A measure's link to one priced catalog entry, with optional overrides,
/// compound drift rates and a per-year usage delta vs business-as-usual
/// (+ = more usage, − = less).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverLine {
    #[serde(rename = "name", default)]
    pub catalog_key: String,
    #[serde(rename = "priceOv", default, deserialize_with = "optional_number")]
    pub price_override: Option<f64>,
    #[serde(rename = "efOv", default, deserialize_with = "optional_number")]
    pub ef_override: Option<f64>,
    #[serde(rename = "priceEscPctYr", default, deserialize_with = "f64_or_zero")]
    pub price_drift_pct_per_year: f64,
    #[serde(rename = "efEscPctYr", default, deserialize_with = "f64_or_zero")]
    pub ef_drift_pct_per_year: f64,
    #[serde(default, deserialize_with = "number_seq")]
    pub delta: Vec<f64>,
}

/// An electricity driver line. Unlike the other categories the emission
/// factor can be overridden per year; an explicit per-year override beats
/// drift escalation for that year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectricityLine {
    #[serde(default)]
    pub state: String,
    #[serde(rename = "priceOv", default, deserialize_with = "optional_number")]
    pub price_override: Option<f64>,
    #[serde(rename = "priceEscPctYr", default, deserialize_with = "f64_or_zero")]
    pub price_drift_pct_per_year: f64,
    #[serde(rename = "efEscPctYr", default, deserialize_with = "f64_or_zero")]
    pub ef_drift_pct_per_year: f64,
    #[serde(rename = "efOvPerYear", default, deserialize_with = "optional_number_seq")]
    pub ef_override_per_year: Vec<Option<f64>>,
    #[serde(rename = "deltaMWh", default, deserialize_with = "number_seq")]
    pub delta_mwh: Vec<f64>,
}

/// The five driver-line lists of a template measure, plus the "other
/// direct reduction" series (tCO₂, + = reduction) for effects not captured
/// by any priced driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSet {
    #[serde(default)]
    pub fuel_lines: Vec<DriverLine>,
    #[serde(default)]
    pub raw_lines: Vec<DriverLine>,
    #[serde(default)]
    pub transport_lines: Vec<DriverLine>,
    #[serde(default)]
    pub waste_lines: Vec<DriverLine>,
    #[serde(default)]
    pub electricity_lines: Vec<ElectricityLine>,
    #[serde(default, deserialize_with = "number_seq")]
    pub other_direct_t: Vec<f64>,
}

/// Seven aligned per-year financial rows, in crore except the tenure
/// (years) and interest rate (%) rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStack {
    #[serde(default, deserialize_with = "number_seq")]
    pub opex_cr: Vec<f64>,
    #[serde(default, deserialize_with = "number_seq")]
    pub savings_cr: Vec<f64>,
    #[serde(default, deserialize_with = "number_seq")]
    pub other_cr: Vec<f64>,
    #[serde(default, deserialize_with = "number_seq")]
    pub capex_upfront_cr: Vec<f64>,
    #[serde(default, deserialize_with = "number_seq")]
    pub capex_financed_cr: Vec<f64>,
    #[serde(default, deserialize_with = "number_seq")]
    pub financing_tenure_years: Vec<f64>,
    #[serde(default, deserialize_with = "number_seq")]
    pub interest_rate_pct: Vec<f64>,
}

impl FinancialStack {
    /// A zeroed stack for `n_years`, seeded with the customary 10-year
    /// tenure at 7% nominal interest.
    pub fn for_horizon(n_years: usize) -> Self {
        Self {
            opex_cr: vec![0.0; n_years],
            savings_cr: vec![0.0; n_years],
            other_cr: vec![0.0; n_years],
            capex_upfront_cr: vec![0.0; n_years],
            capex_financed_cr: vec![0.0; n_years],
            financing_tenure_years: vec![10.0; n_years],
            interest_rate_pct: vec![7.0; n_years],
        }
    }
}

fn default_discount_rate() -> f64 {
    0.10
}

fn default_project_life() -> f64 {
    30.0
}

/// Descriptive metadata for a template measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureMeta {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default = "default_discount_rate", deserialize_with = "f64_or_zero")]
    pub discount_rate: f64,
    #[serde(default = "default_project_life", deserialize_with = "f64_or_zero")]
    pub project_life_years: f64,
}

impl Default for MeasureMeta {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            sector: String::new(),
            discount_rate: default_discount_rate(),
            project_life_years: default_project_life(),
        }
    }
}

/// Full projection inputs for a template-mode measure, together with the
/// save-time context needed to re-derive the effective marginal cost when
/// the carbon price changes later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDetails {
    #[serde(default)]
    pub meta: MeasureMeta,
    #[serde(default, deserialize_with = "number_seq")]
    pub adoption: Vec<f64>,
    #[serde(default)]
    pub drivers: DriverSet,
    #[serde(default)]
    pub stack: FinancialStack,
    /// Explicit representative-year index; clamped into the horizon when
    /// projecting. `None` selects the automatic representative year.
    #[serde(default)]
    pub representative_index: Option<usize>,
    #[serde(default)]
    pub saved_cost_includes_carbon_price: bool,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub carbon_price_at_save: f64,
    #[serde(default)]
    pub color_hex: Option<String>,
}

impl TemplateDetails {
    /// A blank template for `n_years`: the default 0-to-1 adoption ramp and
    /// a zeroed financial stack.
    pub fn for_horizon(n_years: usize) -> Self {
        Self {
            adoption: crate::series::default_adoption(n_years),
            stack: FinancialStack::for_horizon(n_years),
            ..Default::default()
        }
    }
}

/// Per-measure detail payload: either quick scalars supplied directly, or
/// the template inputs they were projected from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum MeasureDetails {
    #[serde(rename = "quick")]
    Quick {
        #[serde(default)]
        color_hex: Option<String>,
    },
    #[serde(rename = "template_db_multiline")]
    Template(TemplateDetails),
}

/// One abatement measure as consumed by the curve layer.
///
/// `abatement_tco2` and `cost_per_tco2` are always the representative-year
/// (or quick-mode) scalars; the richer per-year projection is optional
/// detail carried in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub id: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default = "default_true", deserialize_with = "loose_bool")]
    pub selected: bool,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub abatement_tco2: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub cost_per_tco2: f64,
    #[serde(default)]
    pub color_hex: Option<String>,
    /// Legacy colour field from older exports.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub details: Option<MeasureDetails>,
}

impl Default for Measure {
    fn default() -> Self {
        Self {
            id: 0.0,
            name: String::new(),
            sector: String::new(),
            selected: true,
            abatement_tco2: 0.0,
            cost_per_tco2: 0.0,
            color_hex: None,
            color: None,
            details: None,
        }
    }
}

impl Measure {
    pub fn template_details(&self) -> Option<&TemplateDetails> {
        match &self.details {
            Some(MeasureDetails::Template(details)) => Some(details),
            _ => None,
        }
    }

    pub fn saved_cost_includes_carbon_price(&self) -> bool {
        self.template_details()
            .map(|d| d.saved_cost_includes_carbon_price)
            .unwrap_or(false)
    }

    pub fn carbon_price_at_save(&self) -> f64 {
        self.template_details()
            .map(|d| d.carbon_price_at_save)
            .unwrap_or(0.0)
    }

    /// Marginal cost adjusted for the carbon price in effect now, relative
    /// to the price in effect when the saved cost was captured.
    pub fn effective_cost(&self, carbon_price_now: f64) -> f64 {
        let base = self.cost_per_tco2;
        if self.saved_cost_includes_carbon_price() {
            base - (carbon_price_now - self.carbon_price_at_save())
        } else {
            base - carbon_price_now
        }
    }

    /// Explicit colour for curve rendering: per-measure override first,
    /// then the colour saved in the details, then the legacy field.
    pub fn display_color(&self) -> Option<&str> {
        if let Some(hex) = self.color_hex.as_deref() {
            return Some(hex);
        }
        let detail_color = match &self.details {
            Some(MeasureDetails::Quick { color_hex }) => color_hex.as_deref(),
            Some(MeasureDetails::Template(details)) => details.color_hex.as_deref(),
            None => None,
        };
        detail_color.or(self.color.as_deref())
    }
}

/// Normalize imported measures: assign 1-based positional ids where
/// missing and coerce the curve-facing scalars.
pub fn normalize_measures(measures: Vec<Measure>) -> Vec<Measure> {
    measures
        .into_iter()
        .enumerate()
        .map(|(i, mut m)| {
            if m.id == 0.0 {
                m.id = (i + 1) as f64;
            }
            if !m.abatement_tco2.is_finite() {
                m.abatement_tco2 = 0.0;
            }
            if !m.cost_per_tco2.is_finite() {
                m.cost_per_tco2 = 0.0;
            }
            m
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_deserialize_string_booleans_and_blank_numbers() {
        let raw = r#"{
            "name": "LED retrofit",
            "sector": "Power",
            "selected": "false",
            "abatement_tco2": "1200",
            "cost_per_tco2": ""
        }"#;
        let measure: Measure = serde_json::from_str(raw).unwrap();
        assert!(!measure.selected);
        assert_eq!(measure.abatement_tco2, 1200.0);
        assert_eq!(measure.cost_per_tco2, 0.0);
    }

    #[test]
    fn test_selected_defaults_to_true() {
        let measure: Measure = serde_json::from_str(r#"{ "name": "x" }"#).unwrap();
        assert!(measure.selected);
    }

    #[test]
    fn test_normalize_assigns_positional_ids() {
        let measures = vec![
            Measure {
                name: "a".to_string(),
                ..Default::default()
            },
            Measure {
                id: 7.0,
                name: "b".to_string(),
                ..Default::default()
            },
            Measure {
                name: "c".to_string(),
                ..Default::default()
            },
        ];
        let normalized = normalize_measures(measures);
        assert_eq!(normalized[0].id, 1.0);
        assert_eq!(normalized[1].id, 7.0);
        assert_eq!(normalized[2].id, 3.0);
    }

    #[test]
    fn test_blank_template_defaults() {
        let details = TemplateDetails::for_horizon(6);
        assert_eq!(details.adoption, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(details.stack.financing_tenure_years, vec![10.0; 6]);
        assert_eq!(details.stack.interest_rate_pct, vec![7.0; 6]);
        assert!(details.drivers.fuel_lines.is_empty());
    }

    #[test]
    fn test_effective_cost_without_saved_carbon_price() {
        let measure = Measure {
            cost_per_tco2: 500.0,
            ..Default::default()
        };
        assert_eq!(measure.effective_cost(0.0), 500.0);
        assert_eq!(measure.effective_cost(100.0), 400.0);

        // Pure −Δcp shift.
        let cp1 = 40.0;
        let cp2 = 90.0;
        assert!(is_close!(
            measure.effective_cost(cp2) - measure.effective_cost(cp1),
            -(cp2 - cp1)
        ));
    }

    #[test]
    fn test_effective_cost_with_saved_carbon_price() {
        let measure = Measure {
            cost_per_tco2: 500.0,
            details: Some(MeasureDetails::Template(TemplateDetails {
                saved_cost_includes_carbon_price: true,
                carbon_price_at_save: 100.0,
                ..Default::default()
            })),
            ..Default::default()
        };
        // Saved at cp 100: unchanged price leaves the cost as saved.
        assert_eq!(measure.effective_cost(100.0), 500.0);
        // A higher price now shifts it down by the difference only.
        assert_eq!(measure.effective_cost(150.0), 450.0);
    }

    #[test]
    fn test_display_color_resolution_order() {
        let mut measure = Measure {
            color: Some("#111111".to_string()),
            details: Some(MeasureDetails::Quick {
                color_hex: Some("#222222".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(measure.display_color(), Some("#222222"));

        measure.color_hex = Some("#333333".to_string());
        assert_eq!(measure.display_color(), Some("#333333"));

        measure.color_hex = None;
        measure.details = None;
        assert_eq!(measure.display_color(), Some("#111111"));
    }

    #[test]
    fn test_template_details_round_trip() {
        let measure = Measure {
            id: 3.0,
            name: "Waste heat recovery".to_string(),
            sector: "Cement".to_string(),
            abatement_tco2: 42_000.0,
            cost_per_tco2: -120.0,
            details: Some(MeasureDetails::Template(TemplateDetails {
                adoption: vec![0.0, 0.5, 1.0],
                drivers: DriverSet {
                    fuel_lines: vec![DriverLine {
                        catalog_key: "Coal".to_string(),
                        delta: vec![0.0, -100.0, -200.0],
                        ..Default::default()
                    }],
                    electricity_lines: vec![ElectricityLine {
                        state: "Gujarat".to_string(),
                        ef_override_per_year: vec![None, Some(0.65), None],
                        delta_mwh: vec![0.0, 10.0, 20.0],
                        ..Default::default()
                    }],
                    other_direct_t: vec![0.0, 0.0, 1000.0],
                    ..Default::default()
                },
                stack: FinancialStack::for_horizon(3),
                representative_index: Some(2),
                ..Default::default()
            })),
            ..Default::default()
        };

        let json = serde_json::to_string(&measure).unwrap();
        assert!(json.contains("template_db_multiline"));
        assert!(json.contains("efOvPerYear"));

        let back: Measure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, measure);
    }

    #[test]
    fn test_electricity_line_blank_ef_cells_deserialize_as_none() {
        let raw = r#"{
            "state": "India",
            "efOvPerYear": ["", 0.7, "", null, "0.65", ""],
            "deltaMWh": [0, "10", 20, 30, 40, 50]
        }"#;
        let line: ElectricityLine = serde_json::from_str(raw).unwrap();
        assert_eq!(
            line.ef_override_per_year,
            vec![None, Some(0.7), None, None, Some(0.65), None]
        );
        assert_eq!(line.delta_mwh[1], 10.0);
    }
}
