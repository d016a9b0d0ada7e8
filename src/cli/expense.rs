//! Expense CLI commands
//!
//! Recording, editing, deleting and listing expenses.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use super::filter::FilterArgs;
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{ExpensePatch, Money, NewExpense};
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "12.50" or "₹12.50")
        amount: String,
        /// Who was paid
        #[arg(short, long)]
        payee: String,
        /// What it was for
        #[arg(short, long)]
        description: String,
        /// Payment mode (Cash, UPI, Credit Card, ...)
        #[arg(short, long)]
        mode: String,
        /// Category
        #[arg(short, long)]
        category: String,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        /// Expense ID
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        payee: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        mode: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        tags: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },

    /// Delete every expense
    DeleteAll {
        /// Required confirmation
        #[arg(long)]
        force: bool,
    },

    /// Show one expense in detail
    Show {
        /// Expense ID
        id: String,
    },

    /// List expenses matching the filters
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print the built query before the results
        #[arg(long)]
        explain: bool,

        /// Maximum rows to show (overrides the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List known categories
    Categories,
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            payee,
            description,
            mode,
            category,
            tags,
            date,
        } => {
            let service = ExpenseService::new(storage, settings);
            let date = match date {
                Some(text) => parse_date(&text)?,
                None => Local::now().date_naive(),
            };

            let expense = service.add(NewExpense {
                date,
                payee,
                description,
                amount: parse_amount(&amount)?,
                mode_of_payment: mode,
                category,
                tags,
            })?;

            println!("Added expense #{}", expense.id);
            println!("{}", service.describe(&expense));
        }

        ExpenseCommands::Edit {
            id,
            amount,
            payee,
            description,
            mode,
            category,
            tags,
            date,
        } => {
            let service = ExpenseService::new(storage, settings);
            let existing = service.find(&id)?;

            let patch = ExpensePatch {
                date: date.as_deref().map(parse_date).transpose()?,
                payee,
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                mode_of_payment: mode,
                category,
                tags,
            };

            let expense = service.edit(existing.id, patch)?;
            println!("Updated expense #{}", expense.id);
            println!("{}", service.describe(&expense));
        }

        ExpenseCommands::Delete { id } => {
            let service = ExpenseService::new(storage, settings);
            let existing = service.find(&id)?;
            let removed = service.delete(existing.id)?;
            println!(
                "Deleted expense #{} ({} to {})",
                removed.id,
                removed.amount.format_with_symbol(symbol),
                removed.payee
            );
        }

        ExpenseCommands::DeleteAll { force } => {
            if !force {
                return Err(ExpenseError::Validation(
                    "Deleting every expense cannot be undone; pass --force to confirm".into(),
                ));
            }
            let removed = ExpenseService::new(storage, settings).delete_all()?;
            println!("Deleted {} expense(s)", removed);
        }

        ExpenseCommands::Show { id } => {
            let service = ExpenseService::new(storage, settings);
            let expense = service.find(&id)?;
            print!("{}", format_expense_details(&expense, symbol));
            println!();
            println!("{}", service.describe(&expense));
        }

        ExpenseCommands::List {
            filter,
            explain,
            limit,
        } => {
            let service =
                ExpenseService::new(storage, settings).with_query_builder(filter.query_builder()?);
            let criteria = filter.criteria()?;
            let query = service.query(&criteria, filter.sort(settings))?;

            if explain {
                println!("{}", query.explain());
                println!();
            }

            let expenses = storage.expenses.execute(&query)?;
            print!(
                "{}",
                format_expense_table(
                    &expenses,
                    symbol,
                    limit.unwrap_or(settings.table_row_limit)
                )
            );
        }

        ExpenseCommands::Categories => {
            let service = ExpenseService::new(storage, settings);
            for category in service.categories()? {
                println!("{}", category);
            }
        }
    }

    Ok(())
}

pub(crate) fn parse_amount(text: &str) -> ExpenseResult<Money> {
    Money::parse(text).map_err(|e| ExpenseError::Validation(e.to_string()))
}

pub(crate) fn parse_date(text: &str) -> ExpenseResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ExpenseError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("₹12.50").unwrap().cents(), 1250);
        assert!(parse_amount("twelve").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-02-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
        assert!(parse_date("2024-02-30").is_err());
    }
}
