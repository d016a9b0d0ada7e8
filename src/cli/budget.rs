//! Budget CLI commands
//!
//! Monthly budgets per category, or "Overall" for all spending.

use clap::Subcommand;

use super::expense::parse_amount;
use crate::config::Settings;
use crate::display::format_budget_overview;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::BudgetMonth;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set the budget for a category ("Overall" covers every category)
    Set {
        /// Category name
        category: String,
        /// Amount (e.g., "5000" or "5000.00")
        amount: String,
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// List every budget
    List,

    /// Show spending against the budgets of a month
    Status {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Remove a budget
    Delete {
        /// Category name
        category: String,
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> ExpenseResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let period = parse_month(month.as_deref())?;
            let budget = service.set_for(&category, period, parse_amount(&amount)?)?;
            println!(
                "Budget for {} in {} set to {}",
                budget.category,
                budget.period,
                budget.amount.format_with_symbol(symbol)
            );
        }

        BudgetCommands::List => {
            let budgets = service.list()?;
            if budgets.is_empty() {
                println!("No budgets set.");
                println!("Use 'expense budget set <category> <amount>' to create one.");
                return Ok(());
            }

            println!("{:<8} {:<24} {:>14}", "Month", "Category", "Amount");
            println!("{}", "-".repeat(48));
            for budget in budgets {
                println!(
                    "{:<8} {:<24} {:>14}",
                    budget.period.to_string(),
                    budget.category,
                    budget.amount.format_with_symbol(symbol)
                );
            }
        }

        BudgetCommands::Status { month } => {
            let period = parse_month(month.as_deref())?;
            let overview = service.status(period)?;
            print!("{}", format_budget_overview(&overview, symbol));

            let overspent: Vec<_> = overview.overspent().collect();
            if !overspent.is_empty() {
                println!();
                println!("{} budget(s) overspent:", overspent.len());
                for status in overspent {
                    println!(
                        "  {} by {}",
                        status.budget.category,
                        (-status.remaining).format_with_symbol(symbol)
                    );
                }
            }
        }

        BudgetCommands::Delete { category, month } => {
            let period = parse_month(month.as_deref())?;
            let budget = service.delete(&category, period)?;
            println!("Deleted budget for {} in {}", budget.category, budget.period);
        }
    }

    Ok(())
}

fn parse_month(month: Option<&str>) -> ExpenseResult<BudgetMonth> {
    match month {
        Some(text) => BudgetMonth::parse(text).map_err(|e| ExpenseError::Validation(e.to_string())),
        None => Ok(BudgetMonth::current()),
    }
}
