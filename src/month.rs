//! Calendar-month value type and month-offset arithmetic

use crate::error::{CohortError, Result};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, such as 2022-07
///
/// Ordering is chronological. Offsets between months are computed by integer
/// month-index subtraction, never by floating-point date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a new calendar month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(CohortError::InvalidParameter(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        Ok(Self { year, month })
    }

    /// Truncate a timestamp to its calendar month
    pub fn from_datetime(ts: NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Get the year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Get the month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Absolute month index, counted from year 0
    pub fn index(&self) -> i32 {
        self.year * 12 + (self.month as i32 - 1)
    }

    /// Number of whole months from `earlier` to `self`
    ///
    /// Negative when `self` precedes `earlier`.
    pub fn months_since(&self, earlier: YearMonth) -> i32 {
        self.index() - earlier.index()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
