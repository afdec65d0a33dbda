//! Order ingestion and per-user derived attributes

use crate::error::{CohortError, Result};
use crate::month::YearMonth;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Columns every input row must provide
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["order_id", "user_id", "created_at", "basket", "discount_cost"];

/// Timestamp formats tried, in order, when no explicit format is configured
const INFERENCE_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// A raw order row, before timestamp parsing and derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrder {
    /// Opaque order identifier
    pub order_id: String,
    /// Opaque user identifier
    pub user_id: String,
    /// Order timestamp, as text
    pub created_at: String,
    /// Basket value of the order
    pub basket: f64,
    /// Discount applied to the order (>= 0 expected)
    pub discount_cost: f64,
}

/// An order row enriched with per-user derived temporal attributes
///
/// Records whose timestamp could not be parsed in lenient mode keep their
/// place in the set but have every temporal derived field set to `None`;
/// aggregation skips them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    /// Opaque order identifier
    pub order_id: String,
    /// Opaque user identifier
    pub user_id: String,
    /// Parsed order timestamp, `None` when lenient inference failed
    pub created_at: Option<NaiveDateTime>,
    /// Basket value of the order
    pub basket: f64,
    /// Discount applied to the order
    pub discount_cost: f64,
    /// `created_at` truncated to its calendar month
    pub year_month: Option<YearMonth>,
    /// Earliest parsed timestamp across this user's records
    pub first_order_date: Option<NaiveDateTime>,
    /// `first_order_date` truncated to its calendar month
    pub cohort_month: Option<YearMonth>,
    /// Whether this record is the user's first order
    pub is_first_order: bool,
    /// Whether the user's chronologically first order carried a discount
    pub discount_used_first_order: bool,
    /// 1-based position within the user's chronologically sorted records
    pub order_rank: u32,
    /// Whole days since the user's previous order, `None` at rank 1
    pub days_since_prev_order: Option<i64>,
}

/// Loader that turns raw order rows into enriched records
///
/// Timestamp handling is configured by an optional chrono format string:
/// with `Some(format)` every `created_at` value must match it exactly and a
/// mismatch fails the whole load; with `None` a fixed list of common formats
/// is tried and values that match none of them become null timestamps.
#[derive(Debug)]
pub struct OrderLoader;

impl OrderLoader {
    /// Load from untyped positional rows described by a column-name header
    ///
    /// Fails with a schema error when any required column is absent; the
    /// load aborts entirely and nothing partial is produced.
    pub fn from_fields(
        columns: &[&str],
        rows: &[Vec<String>],
        date_format: Option<&str>,
    ) -> Result<Vec<OrderRecord>> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, required) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            *slot = columns
                .iter()
                .position(|name| name == required)
                .ok_or_else(|| {
                    CohortError::SchemaError(format!("Required column '{}' not found", required))
                })?;
        }
        let [order_idx, user_idx, created_idx, basket_idx, discount_idx] = positions;

        let mut raw = Vec::with_capacity(rows.len());
        for (row_no, row) in rows.iter().enumerate() {
            let basket = parse_amount(field(row, basket_idx, row_no, "basket")?, row_no, "basket")?;
            let discount_cost = parse_amount(
                field(row, discount_idx, row_no, "discount_cost")?,
                row_no,
                "discount_cost",
            )?;

            raw.push(RawOrder {
                order_id: field(row, order_idx, row_no, "order_id")?.clone(),
                user_id: field(row, user_idx, row_no, "user_id")?.clone(),
                created_at: field(row, created_idx, row_no, "created_at")?.clone(),
                basket,
                discount_cost,
            });
        }

        Self::from_raw(raw, date_format)
    }

    /// Load from typed raw rows
    pub fn from_raw(rows: Vec<RawOrder>, date_format: Option<&str>) -> Result<Vec<OrderRecord>> {
        // Parse timestamps up front so a strict-mode failure aborts before
        // any derivation work happens.
        let mut parsed: Vec<(RawOrder, Option<NaiveDateTime>)> = Vec::with_capacity(rows.len());
        for (row_no, row) in rows.into_iter().enumerate() {
            let ts = match date_format {
                Some(format) => {
                    let ts = parse_with_format(&row.created_at, format).ok_or_else(|| {
                        CohortError::ParseError(format!(
                            "Row {}: created_at '{}' does not match format '{}'",
                            row_no, row.created_at, format
                        ))
                    })?;
                    Some(ts)
                }
                None => infer_timestamp(&row.created_at),
            };
            parsed.push((row, ts));
        }

        // Every derived field depends on chronological order within a user.
        // The sort is stable, so equal timestamps keep their input order and
        // null timestamps land at the end of their user's run.
        parsed.sort_by(|a, b| {
            a.0.user_id
                .cmp(&b.0.user_id)
                .then_with(|| compare_timestamps(a.1, b.1))
        });

        // Each user's records now form one contiguous run; derivation folds
        // over each run independently.
        let mut records = Vec::with_capacity(parsed.len());
        let mut start = 0;
        while start < parsed.len() {
            let user_id = &parsed[start].0.user_id;
            let mut end = start + 1;
            while end < parsed.len() && &parsed[end].0.user_id == user_id {
                end += 1;
            }
            derive_user_records(&parsed[start..end], &mut records);
            start = end;
        }

        Ok(records)
    }
}

/// Fold over one user's chronologically sorted records, producing derived
/// fields for each
fn derive_user_records(run: &[(RawOrder, Option<NaiveDateTime>)], out: &mut Vec<OrderRecord>) {
    let first_order_date = run.iter().filter_map(|(_, ts)| *ts).min();
    let cohort_month = first_order_date.map(YearMonth::from_datetime);

    // Nulls sort last, so the first record of the run is the chronologically
    // first order whenever the user has any parseable timestamp.
    let discount_used_first_order = run
        .first()
        .map(|(row, _)| row.discount_cost > 0.0)
        .unwrap_or(false);

    let mut prev_ts: Option<NaiveDateTime> = None;
    for (position, (row, ts)) in run.iter().enumerate() {
        let record = match ts {
            Some(ts) => OrderRecord {
                order_id: row.order_id.clone(),
                user_id: row.user_id.clone(),
                created_at: Some(*ts),
                basket: row.basket,
                discount_cost: row.discount_cost,
                year_month: Some(YearMonth::from_datetime(*ts)),
                first_order_date,
                cohort_month,
                is_first_order: first_order_date == Some(*ts),
                discount_used_first_order,
                order_rank: position as u32 + 1,
                days_since_prev_order: prev_ts.map(|prev| (*ts - prev).num_days()),
            },
            None => OrderRecord {
                order_id: row.order_id.clone(),
                user_id: row.user_id.clone(),
                created_at: None,
                basket: row.basket,
                discount_cost: row.discount_cost,
                year_month: None,
                first_order_date: None,
                cohort_month: None,
                is_first_order: false,
                discount_used_first_order,
                order_rank: position as u32 + 1,
                days_since_prev_order: None,
            },
        };
        out.push(record);
        prev_ts = *ts;
    }
}

/// Compare optional timestamps with nulls sorting last
fn compare_timestamps(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse a timestamp against one explicit chrono format
///
/// Date-only formats parse to midnight.
fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
        return Some(ts);
    }
    NaiveDate::parse_from_str(value, format)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Best-effort timestamp inference over the fixed format list
fn infer_timestamp(value: &str) -> Option<NaiveDateTime> {
    INFERENCE_FORMATS
        .iter()
        .find_map(|format| parse_with_format(value, format))
}

fn field<'a>(row: &'a [String], idx: usize, row_no: usize, name: &str) -> Result<&'a String> {
    row.get(idx).ok_or_else(|| {
        CohortError::ParseError(format!("Row {}: missing value for '{}'", row_no, name))
    })
}

fn parse_amount(value: &str, row_no: usize, column: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        CohortError::ParseError(format!(
            "Row {}: '{}' is not a valid number for '{}'",
            row_no, value, column
        ))
    })
}
