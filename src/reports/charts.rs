//! Chart data
//!
//! Aggregates a result set into the two series the dashboard draws: spending
//! by category and spending per month.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{Expense, Money};

/// Label used for expenses with an empty category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One category's share of spending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub amount: Money,
    pub count: usize,
    /// Share of the total, 0-100
    pub percentage: f64,
}

/// Spending in one `YYYY-MM` month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBar {
    pub month: String,
    pub amount: Money,
}

/// Aggregates for charting a set of expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Largest category first
    pub by_category: Vec<CategorySlice>,
    /// Oldest month first
    pub by_month: Vec<MonthlyBar>,
    pub total: Money,
}

impl ChartData {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut categories: HashMap<&str, (Money, usize)> = HashMap::new();
        let mut months: BTreeMap<String, Money> = BTreeMap::new();
        let mut total = Money::zero();

        for expense in expenses {
            let category = match expense.category.trim() {
                "" => UNCATEGORIZED,
                name => name,
            };
            let entry = categories.entry(category).or_insert((Money::zero(), 0));
            entry.0 += expense.amount;
            entry.1 += 1;

            *months.entry(expense.month_key()).or_insert_with(Money::zero) += expense.amount;
            total += expense.amount;
        }

        let mut by_category: Vec<CategorySlice> = categories
            .into_iter()
            .map(|(category, (amount, count))| CategorySlice {
                category: category.to_string(),
                amount,
                count,
                percentage: share(amount, total),
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });

        let by_month = months
            .into_iter()
            .map(|(month, amount)| MonthlyBar { month, amount })
            .collect();

        Self {
            by_category,
            by_month,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

fn share(part: Money, total: Money) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.cents() as f64 / total.cents() as f64 * 100.0
    }
}
