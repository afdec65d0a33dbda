//! # Cohort Metrics
//!
//! A Rust library for customer cohort and retention analytics over order
//! histories.
//!
//! ## Features
//!
//! - Order ingestion with strict or best-effort timestamp parsing
//! - Per-user derived attributes (cohort month, order rank, day gaps)
//! - Dense cohort and retention matrices
//! - Average first-to-second-month retention rate
//! - One-step retention-driven order forecast
//!
//! The pipeline is a deterministic batch computation: raw rows are enriched
//! into per-user records, aggregated into dense matrices, reduced to a
//! retention rate, and projected one period forward. File formats, plotting,
//! and report rendering belong to external collaborators; this crate only
//! consumes already-materialized rows and hands back read-only results.
//!
//! ## Quick Start
//!
//! ```rust
//! use cohort_metrics::{OrderLoader, RawOrder, YearMonth};
//! use cohort_metrics::cohort::{build_cohort_table, build_retention_table};
//! use cohort_metrics::retention::average_first_to_second_month_retention;
//! use cohort_metrics::predict::predict_next_period;
//!
//! # fn main() -> cohort_metrics::Result<()> {
//! let rows = vec![
//!     RawOrder {
//!         order_id: "1".into(),
//!         user_id: "a".into(),
//!         created_at: "07/03/2022".into(),
//!         basket: 42.0,
//!         discount_cost: 0.0,
//!     },
//!     RawOrder {
//!         order_id: "2".into(),
//!         user_id: "a".into(),
//!         created_at: "08/14/2022".into(),
//!         basket: 18.5,
//!         discount_cost: 2.0,
//!     },
//! ];
//!
//! // Strict parsing: every timestamp must match the supplied format.
//! let records = OrderLoader::from_raw(rows, Some("%m/%d/%Y"))?;
//!
//! let cohort_table = build_cohort_table(&records);
//! let retention_table = build_retention_table(&records);
//!
//! let rate = average_first_to_second_month_retention(&retention_table);
//! let forecast = predict_next_period(&cohort_table, YearMonth::new(2022, 7)?, rate);
//! assert_eq!(forecast, Some(1));
//! # Ok(())
//! # }
//! ```

pub mod cohort;
pub mod data;
pub mod error;
pub mod month;
pub mod predict;
pub mod retention;

// Re-export commonly used types
pub use crate::cohort::{build_cohort_table, build_retention_table, CohortTable, RetentionTable};
pub use crate::data::{OrderLoader, OrderRecord, RawOrder};
pub use crate::error::{CohortError, Result};
pub use crate::month::YearMonth;
pub use crate::predict::predict_next_period;
pub use crate::retention::average_first_to_second_month_retention;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
