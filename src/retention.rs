//! Retention-rate reduction over the retention matrix

use crate::cohort::RetentionTable;

/// Average retention rate from a cohort's first month to its second
///
/// For every cohort row the ratio `count(period 1) / count(period 0)` is
/// computed; a zero denominator contributes 0.0 rather than being skipped,
/// so dormant cohorts still pull the average down. Returns the unweighted
/// mean over all cohorts, as a plain fraction.
///
/// Returns 0.0 immediately when the matrix has no period-0 or no period-1
/// column at all. The result is not clamped to [0, 1]: a cohort whose
/// second month outgrows its first surfaces as a ratio above 1 instead of
/// being hidden.
pub fn average_first_to_second_month_retention(table: &RetentionTable) -> f64 {
    if !table.periods().contains(&0) || !table.periods().contains(&1) {
        return 0.0;
    }

    let mut sum = 0.0;
    for &cohort in table.cohorts() {
        let base = table.get(cohort, 0).unwrap_or(0.0);
        let next = table.get(cohort, 1).unwrap_or(0.0);
        sum += if base == 0.0 { 0.0 } else { next / base };
    }

    sum / table.cohorts().len() as f64
}
