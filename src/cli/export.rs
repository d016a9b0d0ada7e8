//! CLI command for exporting expenses

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::filter::FilterArgs;
use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{export_expenses, ExportFormat};
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Export arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> ExpenseResult<()> {
    let service =
        ExpenseService::new(storage, settings).with_query_builder(args.filter.query_builder()?);
    let query = service.query(&args.filter.criteria()?, args.filter.sort(settings))?;
    let expenses = storage.expenses.execute(&query)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                ExpenseError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_expenses(args.format, &expenses, &query, &mut writer)?;
            writer
                .flush()
                .map_err(|e| ExpenseError::Export(e.to_string()))?;

            info!(path = %path.display(), count = expenses.len(), "expenses exported");
            println!(
                "Exported {} expense(s) as {} to {}",
                expenses.len(),
                args.format,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export_expenses(args.format, &expenses, &query, &mut writer)?;
        }
    }

    Ok(())
}
