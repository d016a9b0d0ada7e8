//! JSON export with schema versioning

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, Money};
use crate::query::ExpenseQuery;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,

    /// Human-readable filter the expenses were selected with
    pub filter: String,
    /// Sort order of `expenses`
    pub sort: String,

    pub count: usize,
    pub total: Money,
    pub expenses: Vec<Expense>,
}

impl ExpenseExport {
    pub fn new(expenses: &[Expense], query: &ExpenseQuery) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            filter: query.filter.to_string(),
            sort: query.sort.to_string(),
            count: expenses.len(),
            total: expenses.iter().map(|e| e.amount).sum(),
            expenses: expenses.to_vec(),
        }
    }
}

pub fn export_expenses_json<W: Write>(
    expenses: &[Expense],
    query: &ExpenseQuery,
    writer: &mut W,
) -> ExpenseResult<()> {
    let export = ExpenseExport::new(expenses, query);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, NewExpense};
    use crate::query::SortSpec;
    use chrono::NaiveDate;

    #[test]
    fn test_json_export_round_trips() {
        let expense = NewExpense {
            date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            payee: "Cafe".into(),
            description: "Coffee".into(),
            amount: Money::from_cents(1250),
            mode_of_payment: "Cash".into(),
            category: "Food".into(),
            tags: String::new(),
        }
        .into_expense(ExpenseId::new(1));

        let mut buffer = Vec::new();
        export_expenses_json(&[expense.clone()], &ExpenseQuery::all(SortSpec::default()), &mut buffer)
            .unwrap();

        let parsed: ExpenseExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.count, 1);
        assert_eq!(parsed.total.cents(), 1250);
        assert_eq!(parsed.filter, "all expenses");
        assert_eq!(parsed.sort, "id asc");
        assert_eq!(parsed.expenses, vec![expense]);
    }
}
