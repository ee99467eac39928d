//! Per-year series utilities and the numeric coercion boundary.
//!
//! Measure data arrives from persistence and user forms, where a numeric
//! field may be a number, a numeric string, a blank string or absent
//! entirely. All of those normalise to a plain `f64` (0 for anything
//! unusable) through this module, so the maths elsewhere never has to
//! consider malformed input.

use serde::{Deserialize, Deserializer};

/// A raw numeric cell as it appears in persisted or imported data.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Num(f64),
    Text(String),
}

impl RawNumber {
    fn into_option(self) -> Option<f64> {
        match self {
            RawNumber::Num(v) if v.is_finite() => Some(v),
            RawNumber::Num(_) => None,
            RawNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }
}

/// Coerce a raw textual field to a number, treating blanks and garbage as 0.
pub fn parse_optional_number(raw: &str) -> f64 {
    RawNumber::Text(raw.to_string())
        .into_option()
        .unwrap_or(0.0)
}

/// Deserialize a numeric field that may be a number, a string or null,
/// coercing anything unusable to 0.
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::into_option).unwrap_or(0.0))
}

/// Deserialize an optional numeric field, mapping blanks and garbage to `None`.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::into_option))
}

/// Deserialize a per-year row of numbers, coercing each cell to 0 when unusable.
pub fn number_seq<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Option<RawNumber>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|cell| cell.and_then(RawNumber::into_option).unwrap_or(0.0))
        .collect())
}

/// Deserialize a per-year row of optional numbers (e.g. explicit per-year
/// emission-factor overrides), where a blank cell means "no override".
pub fn optional_number_seq<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Option<RawNumber>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|cell| cell.and_then(RawNumber::into_option))
        .collect())
}

/// Deserialize a boolean-like field that may arrive as a bool or as the
/// strings `"true"`/`"false"`. Anything other than an explicit `false`
/// counts as true, matching how selection flags are persisted.
pub fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBool {
        Bool(bool),
        Text(String),
    }

    let raw = Option::<RawBool>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawBool::Bool(b)) => b,
        Some(RawBool::Text(s)) => !s.trim().eq_ignore_ascii_case("false"),
        None => true,
    })
}

pub fn default_true() -> bool {
    true
}

/// Value of a per-year row at `index`, degrading to 0 when the row is
/// shorter than the horizon or holds a non-finite entry.
pub fn value_at(series: &[f64], index: usize) -> f64 {
    match series.get(index) {
        Some(v) if v.is_finite() => *v,
        _ => 0.0,
    }
}

/// Clamp an adoption fraction into [0, 1].
pub fn clamp01(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Default adoption profile: a linear ramp from 0 to 1 across the horizon,
/// rounded to one decimal place (0.0, 0.2, ... 1.0 over six years).
pub fn default_adoption(n_years: usize) -> Vec<f64> {
    if n_years <= 1 {
        return vec![1.0; n_years];
    }
    (0..n_years)
        .map(|i| {
            let v = i as f64 / (n_years - 1) as f64;
            (v * 10.0).round() / 10.0
        })
        .collect()
}

/// Fill interior gaps of a partially-entered per-year row by linear
/// interpolation between the nearest entered values. Leading and trailing
/// gaps are left untouched.
pub fn interpolate_gaps(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut filled = series.to_vec();
    let mut last_idx: Option<usize> = None;

    for i in 0..filled.len() {
        let value = match filled[i] {
            Some(v) if v.is_finite() => v,
            _ => continue,
        };

        if let Some(prev) = last_idx {
            let prev_value = filled[prev].unwrap_or(0.0);
            let step = (value - prev_value) / (i - prev) as f64;
            for k in (prev + 1)..i {
                filled[k] = Some(prev_value + step * (k - prev) as f64);
            }
        }
        last_idx = Some(i);
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("12.5"), 12.5);
        assert_eq!(parse_optional_number("  -3 "), -3.0);
        assert_eq!(parse_optional_number(""), 0.0);
        assert_eq!(parse_optional_number("abc"), 0.0);
        assert_eq!(parse_optional_number("NaN"), 0.0);
    }

    #[test]
    fn test_value_at_degrades_to_zero() {
        let row = vec![1.0, f64::NAN];
        assert_eq!(value_at(&row, 0), 1.0);
        assert_eq!(value_at(&row, 1), 0.0);
        assert_eq!(value_at(&row, 5), 0.0);
    }

    #[test]
    fn test_default_adoption_is_linear_ramp() {
        assert_eq!(default_adoption(6), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(default_adoption(1), vec![1.0]);
        assert!(default_adoption(0).is_empty());
    }

    #[test]
    fn test_interpolate_gaps_fills_interior_only() {
        let row = vec![None, Some(10.0), None, None, Some(40.0), None];
        let filled = interpolate_gaps(&row);

        assert_eq!(filled[0], None, "leading gap must stay empty");
        assert_eq!(filled[5], None, "trailing gap must stay empty");
        assert!(is_close!(filled[2].unwrap(), 20.0));
        assert!(is_close!(filled[3].unwrap(), 30.0));
    }

    #[test]
    fn test_interpolate_gaps_no_entries() {
        let row: Vec<Option<f64>> = vec![None, None];
        assert_eq!(interpolate_gaps(&row), row);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }
}
