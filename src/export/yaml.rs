//! YAML export

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::query::ExpenseQuery;

use super::json::ExpenseExport;

pub fn export_expenses_yaml<W: Write>(
    expenses: &[Expense],
    query: &ExpenseQuery,
    writer: &mut W,
) -> ExpenseResult<()> {
    let export = ExpenseExport::new(expenses, query);

    let header = format!(
        "# Expense export\n# Generated: {}\n# Filter: {}\n\n",
        export.exported_at, export.filter
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| ExpenseError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| ExpenseError::Export(e.to_string()))?;
    Ok(())
}
