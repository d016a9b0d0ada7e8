//! Expense display formatting
//!
//! Result sets render as a table with a total line; single expenses render
//! as a labelled detail block.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Expense, Money};

use super::report::truncate;

const TEXT_COLUMN_WIDTH: usize = 24;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Payee")]
    payee: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl ExpenseRow {
    fn new(expense: &Expense, symbol: &str) -> Self {
        Self {
            id: expense.id.value(),
            date: expense.date_text(),
            payee: truncate(&expense.payee, TEXT_COLUMN_WIDTH),
            description: truncate(&expense.description, TEXT_COLUMN_WIDTH),
            amount: expense.amount.format_with_symbol(symbol),
            mode: expense.mode_of_payment.clone(),
            category: expense.category.clone(),
            tags: truncate(&expense.tags, TEXT_COLUMN_WIDTH),
        }
    }
}

/// Render a result set as a table followed by its count and total.
///
/// `limit` caps the number of rows shown (0 shows all); the total always
/// covers the whole result set.
pub fn format_expense_table(expenses: &[Expense], symbol: &str, limit: usize) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let shown = if limit == 0 {
        expenses.len()
    } else {
        limit.min(expenses.len())
    };

    let rows: Vec<ExpenseRow> = expenses[..shown]
        .iter()
        .map(|e| ExpenseRow::new(e, symbol))
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::sharp())
        .modify(Columns::single(4), Alignment::right());

    let total: Money = expenses.iter().map(|e| e.amount).sum();

    let mut output = table.to_string();
    output.push('\n');
    if shown < expenses.len() {
        output.push_str(&format!("Showing {} of {} expenses\n", shown, expenses.len()));
    }
    output.push_str(&format!(
        "{} {}, total {}\n",
        expenses.len(),
        if expenses.len() == 1 { "expense" } else { "expenses" },
        total.format_with_symbol(symbol)
    ));
    output
}

/// Labelled detail view of one expense
pub fn format_expense_details(expense: &Expense, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     #{}\n", expense.id));
    output.push_str(&format!("Date:        {}\n", expense.date_text()));
    output.push_str(&format!("Payee:       {}\n", expense.payee));
    output.push_str(&format!("Description: {}\n", expense.description));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Mode:        {}\n", expense.mode_of_payment));
    output.push_str(&format!("Category:    {}\n", expense.category));

    if !expense.tags.is_empty() {
        output.push_str(&format!("Tags:        {}\n", expense.tag_list().join(", ")));
    }

    output.push_str(&format!(
        "Recorded:    {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M")
    ));
    if expense.updated_at != expense.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            expense.updated_at.format("%Y-%m-%d %H:%M")
        ));
    }

    output
}
