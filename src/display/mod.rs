//! Display formatting for terminal output

pub mod expense;
pub mod report;

pub use expense::{format_expense_details, format_expense_table};
pub use report::{format_budget_overview, format_chart_data, format_summary};
