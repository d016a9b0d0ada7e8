//! Recent spending summary and the tip derived from it

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{Expense, Money};

use super::charts::UNCATEGORIZED;

/// Length of the window [`SpendingSummary::last_30_days`] covers
pub const SUMMARY_WINDOW_DAYS: i64 = 30;

/// Categories that earn a budget suggestion when they dominate spending
const DISCRETIONARY_CATEGORIES: &[&str] = &["food", "entertainment", "shopping"];

/// Per-category totals over a date window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Ordered by category name
    pub by_category: Vec<(String, Money)>,
    pub total: Money,
}

impl SpendingSummary {
    /// Totals for `[start, end]`, both inclusive
    pub fn between(expenses: &[Expense], start: NaiveDate, end: NaiveDate) -> Self {
        let mut totals: BTreeMap<String, Money> = BTreeMap::new();
        for expense in expenses.iter().filter(|e| e.date >= start && e.date <= end) {
            let category = match expense.category.trim() {
                "" => UNCATEGORIZED.to_string(),
                name => name.to_string(),
            };
            *totals.entry(category).or_insert_with(Money::zero) += expense.amount;
        }

        let total = totals.values().copied().sum();
        Self {
            start,
            end,
            by_category: totals.into_iter().collect(),
            total,
        }
    }

    /// Totals for the 30 days up to and including `today`
    pub fn last_30_days(expenses: &[Expense], today: NaiveDate) -> Self {
        Self::between(expenses, today - Duration::days(SUMMARY_WINDOW_DAYS), today)
    }

    /// The category with the most spending; the first by name wins a tie
    pub fn top_category(&self) -> Option<(&str, Money)> {
        let mut top: Option<(&str, Money)> = None;
        for (category, amount) in &self.by_category {
            if top.map_or(true, |(_, best)| *amount > best) {
                top = Some((category.as_str(), *amount));
            }
        }
        top
    }
}

/// A simple rule-based spending tip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "category", rename_all = "kebab-case")]
pub enum Recommendation {
    NoData,
    SetBudget(String),
    ReviewTrends,
    KeepGoing,
}

impl Recommendation {
    pub fn from_summary(summary: &SpendingSummary) -> Self {
        if !summary.total.is_positive() {
            return Self::NoData;
        }
        let Some((category, amount)) = summary.top_category() else {
            return Self::NoData;
        };

        let share = amount.cents() as f64 / summary.total.cents() as f64;
        let discretionary = DISCRETIONARY_CATEGORIES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category));

        if discretionary && share > 0.3 {
            Self::SetBudget(category.to_string())
        } else if summary.total > Money::from_units_cents(1000, 0) && summary.by_category.len() > 5 {
            Self::ReviewTrends
        } else {
            Self::KeepGoing
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str("No specific recommendations yet. Keep tracking your expenses!"),
            Self::SetBudget(category) => write!(
                f,
                "You spend a significant amount on '{}'. Consider setting a budget for this category or looking for alternatives to save money!",
                category
            ),
            Self::ReviewTrends => f.write_str(
                "You're tracking many categories! Review your spending trends with 'expense report charts' to find areas for savings.",
            ),
            Self::KeepGoing => f.write_str(
                "Great job tracking your expenses! Keep an eye on your spending in different categories.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, NewExpense};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    fn expense(days_ago: i64, category: &str, units: i64) -> Expense {
        NewExpense {
            date: today() - Duration::days(days_ago),
            payee: "Shop".into(),
            description: "stuff".into(),
            amount: Money::from_units_cents(units, 0),
            mode_of_payment: "Cash".into(),
            category: category.into(),
            tags: String::new(),
        }
        .into_expense(ExpenseId::new(1))
    }

    #[test]
    fn test_window_is_inclusive() {
        let expenses = vec![
            expense(0, "Food", 10),
            expense(30, "Food", 20),
            expense(31, "Food", 40),
        ];
        let summary = SpendingSummary::last_30_days(&expenses, today());
        assert_eq!(summary.total, Money::from_units_cents(30, 0));
        assert_eq!(summary.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_no_spending() {
        let summary = SpendingSummary::last_30_days(&[], today());
        let tip = Recommendation::from_summary(&summary);
        assert_eq!(tip, Recommendation::NoData);
        assert_eq!(
            tip.to_string(),
            "No specific recommendations yet. Keep tracking your expenses!"
        );
    }

    #[test]
    fn test_dominant_discretionary_category() {
        let expenses = vec![expense(1, "Shopping", 400), expense(2, "Rent", 300)];
        let summary = SpendingSummary::last_30_days(&expenses, today());
        assert_eq!(
            Recommendation::from_summary(&summary),
            Recommendation::SetBudget("Shopping".into())
        );
    }

    #[test]
    fn test_many_categories() {
        let expenses: Vec<_> = ["Rent", "Travel", "Health", "Utilities", "Education", "Gifts"]
            .iter()
            .map(|c| expense(3, c, 200))
            .collect();
        let summary = SpendingSummary::last_30_days(&expenses, today());
        assert_eq!(
            Recommendation::from_summary(&summary),
            Recommendation::ReviewTrends
        );
    }

    #[test]
    fn test_keep_going() {
        let expenses = vec![expense(1, "Rent", 500), expense(1, "Food", 100)];
        let summary = SpendingSummary::last_30_days(&expenses, today());
        assert_eq!(summary.top_category(), Some(("Rent", Money::from_units_cents(500, 0))));
        assert_eq!(
            Recommendation::from_summary(&summary),
            Recommendation::KeepGoing
        );
    }
}
