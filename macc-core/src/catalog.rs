//! Priced, carbon-factored driver catalogs.
//!
//! A catalog entry is immutable reference data: one fuel, raw material,
//! transport mode or waste stream with a unit price and an emission factor
//! per unit. Electricity is catalogued separately, keyed by grid state with
//! per-MWh price and emission factor.
//!
//! Catalogs come in two flavours, a shipped sample set and a per-firm
//! custom set; [`Catalogs::resolve`] merges them according to the selected
//! [`CatalogSource`].

use crate::series::f64_or_zero;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_elec_price() -> f64 {
    5000.0
}

fn default_elec_ef() -> f64 {
    0.710
}

/// One priced, carbon-factored driver (fuel, raw material, transport or
/// waste). Legacy field spellings from exported firm data are accepted on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(
        default,
        alias = "fuel",
        alias = "material",
        alias = "transport",
        alias = "item"
    )]
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(
        default,
        alias = "price_per_unit_inr",
        alias = "price",
        deserialize_with = "f64_or_zero"
    )]
    pub price_per_unit: f64,
    #[serde(
        default,
        alias = "ef_tco2_per_unit",
        alias = "ef_t_per_unit",
        alias = "ef_t",
        deserialize_with = "f64_or_zero"
    )]
    pub ef_per_unit: f64,
}

/// One electricity grid: per-MWh price and emission factor keyed by state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityEntry {
    #[serde(default, alias = "region", alias = "grid")]
    pub state: String,
    #[serde(
        default = "default_elec_price",
        alias = "price_per_mwh_inr",
        alias = "price",
        deserialize_with = "f64_or_zero"
    )]
    pub price_per_mwh: f64,
    #[serde(
        default = "default_elec_ef",
        alias = "ef_tco2_per_mwh",
        alias = "ef_t_per_mwh",
        deserialize_with = "f64_or_zero"
    )]
    pub ef_per_mwh: f64,
}

/// Which catalog set measure driver lines resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Sample,
    Custom,
    /// Custom entries override sample entries with the same key.
    #[default]
    Merged,
}

/// The five driver catalogs a firm's measures draw from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogs {
    #[serde(default)]
    pub fuels: Vec<CatalogEntry>,
    #[serde(default)]
    pub raw: Vec<CatalogEntry>,
    #[serde(default)]
    pub transport: Vec<CatalogEntry>,
    #[serde(default)]
    pub waste: Vec<CatalogEntry>,
    #[serde(default)]
    pub electricity: Vec<ElectricityEntry>,
}

/// Merge two entry lists keyed case-insensitively, later list winning,
/// first-seen insertion order preserved.
fn merge_by_key<T: Clone>(sample: &[T], custom: &[T], key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut merged: IndexMap<String, T> = IndexMap::new();
    for entry in sample.iter().chain(custom.iter()) {
        let k = key(entry).to_lowercase();
        if k.is_empty() {
            continue;
        }
        merged.insert(k, entry.clone());
    }
    merged.into_values().collect()
}

impl Catalogs {
    /// Resolve the catalogs a measure's driver lines should look prices and
    /// emission factors up in.
    pub fn resolve(sample: &Catalogs, custom: &Catalogs, source: CatalogSource) -> Catalogs {
        match source {
            CatalogSource::Sample => sample.clone(),
            CatalogSource::Custom => custom.clone(),
            CatalogSource::Merged => Catalogs {
                fuels: merge_by_key(&sample.fuels, &custom.fuels, |e| &e.name),
                raw: merge_by_key(&sample.raw, &custom.raw, |e| &e.name),
                transport: merge_by_key(&sample.transport, &custom.transport, |e| &e.name),
                waste: merge_by_key(&sample.waste, &custom.waste, |e| &e.name),
                electricity: merge_by_key(&sample.electricity, &custom.electricity, |e| &e.state),
            },
        }
    }

    pub fn find_fuel(&self, name: &str) -> Option<&CatalogEntry> {
        self.fuels.iter().find(|e| e.name == name)
    }

    pub fn find_raw(&self, name: &str) -> Option<&CatalogEntry> {
        self.raw.iter().find(|e| e.name == name)
    }

    pub fn find_transport(&self, name: &str) -> Option<&CatalogEntry> {
        self.transport.iter().find(|e| e.name == name)
    }

    pub fn find_waste(&self, name: &str) -> Option<&CatalogEntry> {
        self.waste.iter().find(|e| e.name == name)
    }

    pub fn find_electricity(&self, state: &str) -> Option<&ElectricityEntry> {
        self.electricity.iter().find(|e| e.state == state)
    }
}
