//! Budget model
//!
//! A spending limit for one category (or "Overall") in one calendar month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::BudgetMonth;

/// Category name that makes a budget cover every category
pub const OVERALL_CATEGORY: &str = "Overall";

/// A monthly budget for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Category the budget applies to, or [`OVERALL_CATEGORY`]
    pub category: String,

    /// The month covered
    pub period: BudgetMonth,

    /// Budgeted amount
    pub amount: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(category: impl Into<String>, period: BudgetMonth, amount: Money) -> Self {
        let category: String = category.into();
        let now = Utc::now();
        Self {
            category: category.trim().to_string(),
            period,
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this budget spans all categories
    pub fn is_overall(&self) -> bool {
        self.category.eq_ignore_ascii_case(OVERALL_CATEGORY)
    }

    /// Whether this budget is keyed by the given category and month
    pub fn matches(&self, category: &str, period: BudgetMonth) -> bool {
        self.period == period && self.category.eq_ignore_ascii_case(category.trim())
    }

    /// Replace the budgeted amount
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.is_empty() {
            return Err(BudgetValidationError::MissingCategory);
        }
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeBudget);
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.period, self.category, self.amount)
    }
}

/// Spending measured against a budget
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,

    /// Total spent in the budget's category and month
    pub spent: Money,

    /// Budget minus spent (negative when overspent)
    pub remaining: Money,
}

impl BudgetStatus {
    pub fn new(budget: Budget, spent: Money) -> Self {
        let remaining = budget.amount - spent;
        Self {
            budget,
            spent,
            remaining,
        }
    }

    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }

    /// Percentage of the budget used (0 when the budget is zero and nothing was spent)
    pub fn percent_used(&self) -> f64 {
        if self.budget.amount.is_zero() {
            if self.spent.is_zero() {
                0.0
            } else {
                100.0
            }
        } else {
            self.spent.cents() as f64 / self.budget.amount.cents() as f64 * 100.0
        }
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    MissingCategory,
    NegativeBudget,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "Budget category is required"),
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
