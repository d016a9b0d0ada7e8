//! Expense tracker - record, search and budget personal spending
//!
//! This library provides the core functionality for the `expense` command:
//! a JSON-backed expense store, a small search language
//! (`category:food AND amount:<50`), monthly budgets and reports.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, budgets, money)
//! - `query`: Search parsing, filter criteria and query building
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Activity logging
//! - `reports`: Chart data and spending summaries
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense::query::{FilterCriteria, QueryBuilder, SortSpec};
//!
//! let criteria = FilterCriteria::new().search("category:food AND amount:<50");
//! let query = QueryBuilder::new().build(&criteria, SortSpec::default())?;
//! let matches = storage.expenses.execute(&query)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
