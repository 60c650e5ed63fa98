//! Day-count helpers for mapping calendar dates to year fractions.

use chrono::NaiveDate;

/// ACT/365 year fraction between two dates.
///
/// Negative or zero results (expiry on or before `today`) are passed through
/// unchanged; `MarketSnapshot::validate` rejects them before pricing.
#[inline]
pub fn year_fraction(today: NaiveDate, expiry: NaiveDate) -> f64 {
    (expiry - today).num_days() as f64 / 365.0
}
