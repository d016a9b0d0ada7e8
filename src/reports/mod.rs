//! Reports module
//!
//! Chart aggregates over a result set and the recent-spending summary with
//! its recommendation.

pub mod charts;
pub mod summary;

pub use charts::{CategorySlice, ChartData, MonthlyBar, UNCATEGORIZED};
pub use summary::{Recommendation, SpendingSummary, SUMMARY_WINDOW_DAYS};
