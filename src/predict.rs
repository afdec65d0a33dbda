//! One-step retention-driven forecast

use crate::cohort::CohortTable;
use crate::month::YearMonth;

/// Forecast the next period's order volume for one cohort
///
/// Reads the diagonal cell `table[base, base]` (the cohort's own first-month
/// volume) and projects one step forward with the dataset-wide average
/// retention rate, truncating toward zero. This is a single-cohort linear
/// projection, not a statistical model: it assumes the cohort's future
/// retention equals the historical average.
///
/// Returns `None` when `base` is absent from the matrix rows or columns —
/// an expected condition for data that does not yet contain that period,
/// not an error.
pub fn predict_next_period(table: &CohortTable, base: YearMonth, avg_rate: f64) -> Option<u64> {
    let base_orders = table.get(base, base)?;
    Some((base_orders as f64 * avg_rate).floor() as u64)
}
