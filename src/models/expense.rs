//! Expense model
//!
//! A single recorded expense: who was paid, for what, how much, how, and
//! under which category and tags.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, assigned by the store
    pub id: ExpenseId,

    /// Date the expense occurred
    pub date: NaiveDate,

    /// Who was paid
    pub payee: String,

    /// What it was for
    pub description: String,

    /// Amount paid (never negative)
    pub amount: Money,

    /// How it was paid (Cash, UPI, ...)
    pub mode_of_payment: String,

    /// Category (open vocabulary)
    #[serde(default)]
    pub category: String,

    /// Free-text, comma-separated tags
    #[serde(default)]
    pub tags: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

/// The caller-supplied part of an expense, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub payee: String,
    pub description: String,
    pub amount: Money,
    pub mode_of_payment: String,
    pub category: String,
    #[serde(default)]
    pub tags: String,
}

impl NewExpense {
    /// Trim every text field
    pub fn normalized(mut self) -> Self {
        self.payee = self.payee.trim().to_string();
        self.description = self.description.trim().to_string();
        self.mode_of_payment = self.mode_of_payment.trim().to_string();
        self.category = self.category.trim().to_string();
        self.tags = self.tags.trim().to_string();
        self
    }

    /// Validate mandatory fields and the amount
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(
            &self.payee,
            &self.description,
            self.amount,
            &self.mode_of_payment,
            &self.category,
        )
    }

    /// Turn the input into a stored record with the given id
    pub fn into_expense(self, id: ExpenseId) -> Expense {
        let now = Utc::now();
        Expense {
            id,
            date: self.date,
            payee: self.payee,
            description: self.description,
            amount: self.amount,
            mode_of_payment: self.mode_of_payment,
            category: self.category,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub date: Option<NaiveDate>,
    pub payee: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub mode_of_payment: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Expense {
    /// Apply a patch, bumping `updated_at`
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(payee) = patch.payee {
            self.payee = payee.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(mode) = patch.mode_of_payment {
            self.mode_of_payment = mode.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(tags) = patch.tags {
            self.tags = tags.trim().to_string();
        }
        self.updated_at = Utc::now();
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(
            &self.payee,
            &self.description,
            self.amount,
            &self.mode_of_payment,
            &self.category,
        )
    }

    /// Individual tags, trimmed, empty entries dropped
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// ISO `YYYY-MM-DD` text of the date
    pub fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM` key of the month the expense falls in
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

fn validate_fields(
    payee: &str,
    description: &str,
    amount: Money,
    mode_of_payment: &str,
    category: &str,
) -> Result<(), ExpenseValidationError> {
    if payee.trim().is_empty() {
        return Err(ExpenseValidationError::MissingField("payee"));
    }
    if description.trim().is_empty() {
        return Err(ExpenseValidationError::MissingField("description"));
    }
    if mode_of_payment.trim().is_empty() {
        return Err(ExpenseValidationError::MissingField("mode of payment"));
    }
    if category.trim().is_empty() {
        return Err(ExpenseValidationError::MissingField("category"));
    }
    if category.trim().eq_ignore_ascii_case("all") {
        return Err(ExpenseValidationError::ReservedCategory);
    }
    if amount.is_negative() {
        return Err(ExpenseValidationError::NegativeAmount(amount));
    }
    Ok(())
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} ({})",
            self.id,
            self.date_text(),
            self.payee,
            self.amount,
            self.category
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    MissingField(&'static str),
    NegativeAmount(Money),
    ReservedCategory,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Field '{}' is required", field),
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative (got {})", amount)
            }
            Self::ReservedCategory => {
                write!(f, "'All' is reserved for filters and cannot be a category")
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
