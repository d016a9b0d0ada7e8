//! Service layer for the expense tracker
//!
//! Business logic on top of the storage layer: validation, persistence and
//! activity logging for each change.

pub mod budget;
pub mod expense;

pub use budget::{BudgetOverview, BudgetService};
pub use expense::ExpenseService;
