//! Per-sector production and emissions baselines.
//!
//! The intensity axis mode and the target/budget solver express abatement
//! relative to a sector's baseline annual emissions. An aggregate
//! "All sectors" baseline sums emissions and production across sectors,
//! excluding sectors that are firm-scoped by naming convention.

use crate::series::f64_or_zero;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sector label selecting the aggregate baseline.
pub const ALL_SECTORS: &str = "All sectors";

/// Sectors whose label carries this prefix are firm-scoped and excluded
/// from the aggregate baseline.
pub const FIRM_SECTOR_PREFIX: &str = "Firm – ";

fn default_production_label() -> String {
    "units".to_string()
}

/// Annual production and emissions for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default = "default_production_label")]
    pub production_label: String,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub annual_production: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub annual_emissions: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            production_label: default_production_label(),
            annual_production: 0.0,
            annual_emissions: 0.0,
        }
    }
}

impl Baseline {
    /// Emissions per unit of production; 0 when production is non-positive.
    pub fn intensity(&self) -> f64 {
        if self.annual_production > 0.0 {
            self.annual_emissions / self.annual_production
        } else {
            0.0
        }
    }
}

/// Baselines keyed by sector, preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineSet(IndexMap<String, Baseline>);

impl BaselineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sector: impl Into<String>, baseline: Baseline) {
        self.0.insert(sector.into(), baseline);
    }

    pub fn get(&self, sector: &str) -> Option<&Baseline> {
        self.0.get(sector)
    }

    pub fn remove(&mut self, sector: &str) -> Option<Baseline> {
        self.0.shift_remove(sector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Baseline)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_firm_scoped(sector: &str) -> bool {
        sector.starts_with(FIRM_SECTOR_PREFIX)
    }

    /// Sum emissions and production across non-firm-scoped sectors. The
    /// production label is taken from the first contributing sector.
    pub fn aggregate(&self) -> Baseline {
        let mut production = 0.0;
        let mut emissions = 0.0;
        let mut label: Option<String> = None;
        for (sector, baseline) in self.iter() {
            if Self::is_firm_scoped(sector) {
                continue;
            }
            if label.is_none() {
                label = Some(baseline.production_label.clone());
            }
            production += baseline.annual_production;
            emissions += baseline.annual_emissions;
        }
        Baseline {
            production_label: label.unwrap_or_else(default_production_label),
            annual_production: production,
            annual_emissions: emissions,
        }
    }

    /// Baseline for a sector filter: the aggregate for [`ALL_SECTORS`], the
    /// sector's own baseline otherwise. A missing sector falls back to a
    /// unit baseline so intensity transforms stay defined.
    pub fn for_sector(&self, sector: &str) -> Baseline {
        if sector == ALL_SECTORS {
            return self.aggregate();
        }
        self.get(sector).cloned().unwrap_or(Baseline {
            production_label: default_production_label(),
            annual_production: 1.0,
            annual_emissions: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(label: &str, production: f64, emissions: f64) -> Baseline {
        Baseline {
            production_label: label.to_string(),
            annual_production: production,
            annual_emissions: emissions,
        }
    }

    #[test]
    fn test_intensity() {
        assert_eq!(baseline("t", 100.0, 250.0).intensity(), 2.5);
        assert_eq!(baseline("t", 0.0, 250.0).intensity(), 0.0);
    }

    #[test]
    fn test_aggregate_sums_sectors() {
        let mut set = BaselineSet::new();
        set.insert("Power", baseline("MWh", 1000.0, 800.0));
        set.insert("Cement", baseline("t clinker", 500.0, 400.0));

        let all = set.aggregate();
        assert_eq!(all.annual_production, 1500.0);
        assert_eq!(all.annual_emissions, 1200.0);
        assert_eq!(all.production_label, "MWh");
    }

    #[test]
    fn test_aggregate_excludes_firm_scoped_sectors() {
        let mut set = BaselineSet::new();
        set.insert("Power", baseline("MWh", 1000.0, 800.0));
        set.insert("Firm – Acme Steel", baseline("t", 99.0, 99.0));

        let all = set.aggregate();
        assert_eq!(all.annual_emissions, 800.0);
        assert_eq!(all.annual_production, 1000.0);
    }

    #[test]
    fn test_for_sector() {
        let mut set = BaselineSet::new();
        set.insert("Power", baseline("MWh", 1000.0, 800.0));

        assert_eq!(set.for_sector("Power").annual_emissions, 800.0);
        assert_eq!(set.for_sector(ALL_SECTORS).annual_emissions, 800.0);

        let missing = set.for_sector("Cement");
        assert_eq!(missing.annual_production, 1.0);
        assert_eq!(missing.annual_emissions, 1.0);
    }

    #[test]
    fn test_serde_shape_is_a_map() {
        let mut set = BaselineSet::new();
        set.insert("Power", baseline("MWh", 10.0, 20.0));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["Power"]["annual_emissions"], 20.0);
    }
}
