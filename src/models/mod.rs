//! Core data models for the expense tracker
//!
//! This module contains the data structures of the domain: expenses, money
//! amounts, and monthly budgets.

pub mod budget;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;

pub use budget::{Budget, BudgetStatus, OVERALL_CATEGORY};
pub use expense::{Expense, ExpensePatch, ExpenseValidationError, NewExpense};
pub use ids::ExpenseId;
pub use money::Money;
pub use period::BudgetMonth;
