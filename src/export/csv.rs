//! CSV export

use std::io::Write;

use serde::Serialize;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Payee")]
    payee: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "ModeOfPayment")]
    mode_of_payment: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Tags")]
    tags: &'a str,
}

impl<'a> From<&'a Expense> for CsvRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            id: expense.id.value(),
            date: expense.date_text(),
            payee: &expense.payee,
            description: &expense.description,
            amount: expense.amount.to_string(),
            mode_of_payment: &expense.mode_of_payment,
            category: &expense.category,
            tags: &expense.tags,
        }
    }
}

/// Write one header line and one row per expense, in the given order
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: &mut W) -> ExpenseResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    if expenses.is_empty() {
        csv_writer
            .write_record([
                "ID",
                "Date",
                "Payee",
                "Description",
                "Amount",
                "ModeOfPayment",
                "Category",
                "Tags",
            ])
            .map_err(|e| ExpenseError::Export(e.to_string()))?;
    }

    for expense in expenses {
        csv_writer
            .serialize(CsvRow::from(expense))
            .map_err(|e| ExpenseError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money, NewExpense};
    use chrono::NaiveDate;

    fn expense(id: u64, payee: &str, tags: &str) -> Expense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            payee: payee.into(),
            description: "Coffee".into(),
            amount: Money::from_cents(1250),
            mode_of_payment: "UPI".into(),
            category: "Food".into(),
            tags: tags.into(),
        }
        .into_expense(ExpenseId::new(id))
    }

    #[test]
    fn test_csv_rows() {
        let mut buffer = Vec::new();
        export_expenses_csv(&[expense(1, "Cafe", "morning")], &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "ID,Date,Payee,Description,Amount,ModeOfPayment,Category,Tags"
        );
        assert_eq!(lines[1], "1,2024-02-15,Cafe,Coffee,12.50,UPI,Food,morning");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let mut buffer = Vec::new();
        export_expenses_csv(&[expense(2, "Smith, J", "a,b")], &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"Smith, J\""));
        assert!(text.contains("\"a,b\""));
    }

    #[test]
    fn test_csv_empty_still_has_header() {
        let mut buffer = Vec::new();
        export_expenses_csv(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ID,Date,Payee,Description,Amount,ModeOfPayment,Category,Tags\n"
        );
    }
}
