//! Annuity and net-present-value primitives.
//!
//! Costs in measure financial stacks are expressed in crore ("cr"), a
//! sub-unit of 10⁷ currency units; [`CR`] converts between the two. All
//! functions degrade to 0 on malformed input rather than erroring, so the
//! curve can always be rendered for arbitrary user-entered data.

use ndarray::ArrayView1;

/// Currency units per crore. Driver costs and net costs are carried in
/// crore; cash flows and marginal costs in plain currency units.
pub const CR: f64 = 10_000_000.0;

/// Level-payment annuity factor: the per-period multiplier converting a
/// principal into equal periodic payments at `rate` over `periods`.
///
/// Returns 0 for non-positive `periods`; `1 / periods` as `rate`
/// approaches 0; otherwise
/// $$ \frac{r (1+r)^n}{(1+r)^n - 1} $$
pub fn annuity_factor(rate: f64, periods: f64) -> f64 {
    if !rate.is_finite() || !periods.is_finite() || periods <= 0.0 {
        return 0.0;
    }
    if rate.abs() < 1e-9 {
        return 1.0 / periods;
    }
    let growth = (1.0 + rate).powf(periods);
    rate * growth / (growth - 1.0)
}

/// Net present value of `cash_flows` occurring in `years`, discounted at
/// `rate` back to `base_year`.
///
/// Years need not be contiguous. The discount factor at the base year (and
/// any earlier year) is exactly 1; non-finite flows contribute 0.
pub fn npv(
    rate: f64,
    cash_flows: ArrayView1<'_, f64>,
    years: ArrayView1<'_, i32>,
    base_year: i32,
) -> f64 {
    cash_flows
        .iter()
        .zip(years.iter())
        .map(|(&flow, &year)| {
            let flow = if flow.is_finite() { flow } else { 0.0 };
            let t = (year - base_year).max(0);
            if t == 0 {
                flow
            } else {
                flow / (1.0 + rate).powi(t)
            }
        })
        .sum()
}
