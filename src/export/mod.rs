//! Export of expense result sets
//!
//! - CSV: one row per expense (spreadsheet-compatible)
//! - JSON: expenses plus the query that selected them
//! - YAML: the same document as JSON, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;

use crate::error::ExpenseResult;
use crate::models::Expense;
use crate::query::ExpenseQuery;

pub use self::csv::export_expenses_csv;
pub use self::json::{export_expenses_json, ExpenseExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::export_expenses_yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write `expenses`, selected by `query`, in the given format
pub fn export_expenses<W: Write>(
    format: ExportFormat,
    expenses: &[Expense],
    query: &ExpenseQuery,
    writer: &mut W,
) -> ExpenseResult<()> {
    match format {
        ExportFormat::Csv => export_expenses_csv(expenses, writer),
        ExportFormat::Json => export_expenses_json(expenses, query, writer),
        ExportFormat::Yaml => export_expenses_yaml(expenses, query, writer),
    }
}
