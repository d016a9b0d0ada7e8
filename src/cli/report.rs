//! Report CLI commands

use clap::Subcommand;

use super::filter::{parse_today, FilterArgs};
use crate::config::Settings;
use crate::display::{format_chart_data, format_summary};
use crate::error::ExpenseResult;
use crate::reports::{ChartData, Recommendation, SpendingSummary};
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Spending by category and by month for the filtered expenses
    Charts {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending over the last 30 days with a recommendation
    Summary {
        /// Day the 30-day window ends on (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD", env = "EXPENSE_TRACKER_TODAY", hide = true)]
        today: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> ExpenseResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Charts { filter } => {
            let service =
                ExpenseService::new(storage, settings).with_query_builder(filter.query_builder()?);
            let expenses = service.search(&filter.criteria()?, filter.sort(settings))?;

            let data = ChartData::from_expenses(&expenses);
            print!("{}", format_chart_data(&data, symbol));
        }

        ReportCommands::Summary { today } => {
            let today = parse_today(today.as_deref())?.today();
            let expenses = storage.expenses.get_all()?;

            let summary = SpendingSummary::last_30_days(&expenses, today);
            let tip = Recommendation::from_summary(&summary);
            print!("{}", format_summary(&summary, &tip, symbol));
        }
    }

    Ok(())
}
