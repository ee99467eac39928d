//! The modelled set of years.
//!
//! The engine projects measures over a fixed, small set of sample years
//! rather than an arbitrary-granularity time axis. The default horizon is
//! five-year steps from 2025 to 2050 with 2025 as the base year for
//! escalation and discounting.

use crate::errors::{MaccError, MaccResult};
use serde::{Deserialize, Serialize};

/// Preferred fallback year when a measure never reaches positive abatement.
const MID_ANCHOR_YEAR: i32 = 2035;

/// The set of modelled years and the base year used for price/EF
/// escalation and discounting.
///
/// Deserialization routes through [`Horizon::new`], so a horizon loaded
/// from config or persisted data is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHorizon")]
pub struct Horizon {
    years: Vec<i32>,
    base_year: i32,
}

#[derive(Deserialize)]
struct RawHorizon {
    years: Vec<i32>,
    base_year: i32,
}

impl TryFrom<RawHorizon> for Horizon {
    type Error = MaccError;

    fn try_from(raw: RawHorizon) -> MaccResult<Self> {
        Horizon::new(raw.years, raw.base_year)
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            years: vec![2025, 2030, 2035, 2040, 2045, 2050],
            base_year: 2025,
        }
    }
}

impl Horizon {
    pub fn new(years: Vec<i32>, base_year: i32) -> MaccResult<Self> {
        if years.is_empty() {
            return Err(MaccError::InvalidHorizon(
                "at least one modelled year is required".to_string(),
            ));
        }
        Ok(Self { years, base_year })
    }

    /// Load a horizon from a TOML document with `years` and `base_year` keys.
    pub fn from_toml_str(raw: &str) -> MaccResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn base_year(&self) -> i32 {
        self.base_year
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Elapsed years since the base year for escalation compounding,
    /// floored at zero so pre-base years never discount prices. An
    /// out-of-range index degrades to 0 elapsed years.
    pub fn years_since_base(&self, index: usize) -> f64 {
        match self.years.get(index) {
            Some(&year) => (year - self.base_year).max(0) as f64,
            None => 0.0,
        }
    }

    /// Fallback representative-year index: the mid-horizon anchor year if
    /// present, otherwise the middle of the horizon.
    pub fn mid_anchor(&self) -> usize {
        self.years
            .iter()
            .position(|&y| y == MID_ANCHOR_YEAR)
            .unwrap_or(self.years.len() / 2)
    }

    /// Clamp a caller-supplied year index into `[0, len)`.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.years.len().saturating_sub(1))
    }
}
