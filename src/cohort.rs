//! Dense cohort and retention matrices built from enriched order records

use crate::data::OrderRecord;
use crate::month::YearMonth;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Dense matrix of order counts by (cohort month, calendar month)
///
/// Every cohort month that appears as a row has a cell (possibly 0) for
/// every calendar month observed anywhere in the dataset. Rows and columns
/// are sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortTable {
    cohorts: Vec<YearMonth>,
    months: Vec<YearMonth>,
    counts: Vec<Vec<u64>>,
}

impl CohortTable {
    /// Get the cohort months (row keys)
    pub fn cohorts(&self) -> &[YearMonth] {
        &self.cohorts
    }

    /// Get the calendar months (column keys)
    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    /// Get one cell, `None` when either key is absent from the matrix
    pub fn get(&self, cohort: YearMonth, month: YearMonth) -> Option<u64> {
        let row = self.cohorts.binary_search(&cohort).ok()?;
        let col = self.months.binary_search(&month).ok()?;
        Some(self.counts[row][col])
    }

    /// Get one row of counts, `None` when the cohort is absent
    pub fn row(&self, cohort: YearMonth) -> Option<&[u64]> {
        let row = self.cohorts.binary_search(&cohort).ok()?;
        Some(&self.counts[row])
    }

    /// Sum of all cells
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}

impl fmt::Display for CohortTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cohort")?;
        for month in &self.months {
            write!(f, "  {}", month)?;
        }
        writeln!(f)?;
        for (cohort, row) in self.cohorts.iter().zip(&self.counts) {
            write!(f, "{}", cohort)?;
            for count in row {
                write!(f, "  {:>7}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Dense matrix of order counts by (cohort month, period offset)
///
/// The column key is the number of whole months between the order's calendar
/// month and its cohort month. Cells are kept as `f64` because this matrix
/// feeds ratio arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionTable {
    cohorts: Vec<YearMonth>,
    periods: Vec<u32>,
    counts: Vec<Vec<f64>>,
}

impl RetentionTable {
    /// Get the cohort months (row keys)
    pub fn cohorts(&self) -> &[YearMonth] {
        &self.cohorts
    }

    /// Get the period offsets (column keys)
    pub fn periods(&self) -> &[u32] {
        &self.periods
    }

    /// Get one cell, `None` when either key is absent from the matrix
    pub fn get(&self, cohort: YearMonth, period: u32) -> Option<f64> {
        let row = self.cohorts.binary_search(&cohort).ok()?;
        let col = self.periods.binary_search(&period).ok()?;
        Some(self.counts[row][col])
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}

impl fmt::Display for RetentionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cohort")?;
        for period in &self.periods {
            write!(f, "  {:>7}", period)?;
        }
        writeln!(f)?;
        for (cohort, row) in self.cohorts.iter().zip(&self.counts) {
            write!(f, "{}", cohort)?;
            for count in row {
                write!(f, "  {:>7}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build the cohort-by-calendar-month count matrix
///
/// Records without a cohort or calendar month are skipped. The grouped
/// counts are densified over the cross-product of observed cohort months and
/// observed calendar months, with absent combinations filled with 0.
pub fn build_cohort_table(records: &[OrderRecord]) -> CohortTable {
    let grouped = group_counts(records, |_, year_month| year_month);
    let (cohorts, months) = distinct_keys(&grouped);

    let mut counts = vec![vec![0u64; months.len()]; cohorts.len()];
    for ((cohort, month), count) in &grouped {
        let row = cohorts.binary_search(cohort).expect("row key collected");
        let col = months.binary_search(month).expect("column key collected");
        counts[row][col] = *count;
    }

    CohortTable {
        cohorts,
        months,
        counts,
    }
}

/// Build the cohort-by-period-offset retention matrix
///
/// Identical grouping to [`build_cohort_table`], with the calendar-month
/// column key replaced by the month offset from the cohort month.
pub fn build_retention_table(records: &[OrderRecord]) -> RetentionTable {
    let grouped = group_counts(records, |cohort, year_month| {
        // Non-negative by construction: a user cannot have an order before
        // their first order.
        year_month.months_since(cohort) as u32
    });
    let (cohorts, periods) = distinct_keys(&grouped);

    let mut counts = vec![vec![0f64; periods.len()]; cohorts.len()];
    for ((cohort, period), count) in &grouped {
        let row = cohorts.binary_search(cohort).expect("row key collected");
        let col = periods.binary_search(period).expect("column key collected");
        counts[row][col] = *count as f64;
    }

    RetentionTable {
        cohorts,
        periods,
        counts,
    }
}

/// Sparse group-count of records by (cohort month, derived column key)
fn group_counts<K, F>(records: &[OrderRecord], column_key: F) -> BTreeMap<(YearMonth, K), u64>
where
    K: Ord + Copy,
    F: Fn(YearMonth, YearMonth) -> K,
{
    let mut grouped = BTreeMap::new();
    for record in records {
        if let (Some(cohort), Some(year_month)) = (record.cohort_month, record.year_month) {
            *grouped
                .entry((cohort, column_key(cohort, year_month)))
                .or_insert(0u64) += 1;
        }
    }
    grouped
}

/// Collect the distinct row and column keys of a sparse grouping, sorted
fn distinct_keys<K: Ord + Copy>(grouped: &BTreeMap<(YearMonth, K), u64>) -> (Vec<YearMonth>, Vec<K>) {
    let mut rows: Vec<YearMonth> = grouped.keys().map(|(cohort, _)| *cohort).collect();
    rows.sort();
    rows.dedup();

    let mut cols: Vec<K> = grouped.keys().map(|(_, col)| *col).collect();
    cols.sort();
    cols.dedup();

    (rows, cols)
}
