//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json and executes
//! [`ExpenseQuery`] values against the loaded records.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExpenseError;
use crate::models::{Expense, ExpenseId, NewExpense};
use crate::query::ExpenseQuery;

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of expenses.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExpenseData {
    /// Next id to hand out; ids are never reused, even after deletes
    #[serde(default)]
    next_id: u64,
    expenses: Vec<Expense>,
}

struct ExpenseTable {
    rows: HashMap<ExpenseId, Expense>,
    next_id: ExpenseId,
}

impl ExpenseTable {
    fn empty() -> Self {
        Self {
            rows: HashMap::new(),
            next_id: ExpenseId::new(1),
        }
    }
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    table: RwLock<ExpenseTable>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(ExpenseTable::empty()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut table = self
            .table
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        table.rows.clear();
        let highest = file_data
            .expenses
            .iter()
            .map(|e| e.id.value())
            .max()
            .unwrap_or(0);
        table.next_id = ExpenseId::new(file_data.next_id.max(highest + 1));

        for expense in file_data.expenses {
            table.rows.insert(expense.id, expense);
        }

        debug!(count = table.rows.len(), path = %self.path.display(), "loaded expenses");
        Ok(())
    }

    /// Save expenses to disk, ordered by id
    pub fn save(&self) -> Result<(), ExpenseError> {
        let table = self
            .table
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = table.rows.values().cloned().collect();
        expenses.sort_by_key(|e| e.id);

        let file_data = ExpenseData {
            next_id: table.next_id.value(),
            expenses,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Run a query: filter by its predicate tree, then order by its sort spec
    pub fn execute(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, ExpenseError> {
        let table = self
            .table
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let results = query.apply(table.rows.values());
        debug!(
            matched = results.len(),
            total = table.rows.len(),
            "executed expense query"
        );
        Ok(results)
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        let table = self
            .table
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(table.rows.get(&id).cloned())
    }

    /// All expenses, ordered by id
    pub fn get_all(&self) -> Result<Vec<Expense>, ExpenseError> {
        let table = self
            .table
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = table.rows.values().cloned().collect();
        expenses.sort_by_key(|e| e.id);
        Ok(expenses)
    }

    /// Store a new expense under the next free id
    pub fn insert(&self, input: NewExpense) -> Result<Expense, ExpenseError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = table.next_id;
        table.next_id = id.next();

        let expense = input.into_expense(id);
        table.rows.insert(id, expense.clone());
        Ok(expense)
    }

    /// Replace an existing expense
    pub fn update(&self, expense: Expense) -> Result<(), ExpenseError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match table.rows.get_mut(&expense.id) {
            Some(slot) => {
                *slot = expense;
                Ok(())
            }
            None => Err(ExpenseError::expense_not_found(expense.id.to_string())),
        }
    }

    /// Delete one expense; returns whether it existed
    pub fn delete(&self, id: ExpenseId) -> Result<bool, ExpenseError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(table.rows.remove(&id).is_some())
    }

    /// Delete every expense; returns how many were removed
    pub fn delete_all(&self) -> Result<usize, ExpenseError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = table.rows.len();
        table.rows.clear();
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        let table = self
            .table
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(table.rows.len())
    }

    /// Non-empty categories in use, sorted
    pub fn distinct_categories(&self) -> Result<Vec<String>, ExpenseError> {
        let table = self
            .table
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let categories: BTreeSet<String> = table
            .rows
            .values()
            .map(|e| e.category.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(categories.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::query::{FilterCriteria, QueryBuilder, SortColumn, SortDirection, SortSpec};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let repo = ExpenseRepository::new(path);
        (temp_dir, repo)
    }

    fn input(payee: &str, cents: i64, category: &str) -> NewExpense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            payee: payee.into(),
            description: "test".into(),
            amount: Money::from_cents(cents),
            mode_of_payment: "Cash".into(),
            category: category.into(),
            tags: String::new(),
        }
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let (_temp_dir, repo) = create_test_repo();
        let first = repo.insert(input("A", 100, "Food")).unwrap();
        let second = repo.insert(input("B", 200, "Food")).unwrap();
        assert_eq!(first.id.value(), 1);
        assert_eq!(second.id.value(), 2);
    }

    #[test]
    fn test_save_and_load_keeps_id_sequence() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(input("A", 100, "Food")).unwrap();
        let second = repo.insert(input("B", 200, "Food")).unwrap();
        repo.delete(second.id).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);

        let third = reloaded.insert(input("C", 300, "Food")).unwrap();
        assert_eq!(third.id.value(), 3);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        let ghost = input("Ghost", 1, "Food").into_expense(ExpenseId::new(99));
        let err = repo.update(ghost).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_replaces_record() {
        let (_temp_dir, repo) = create_test_repo();
        let mut expense = repo.insert(input("A", 100, "Food")).unwrap();
        expense.payee = "Renamed".into();
        repo.update(expense.clone()).unwrap();
        assert_eq!(repo.get(expense.id).unwrap().unwrap().payee, "Renamed");
    }

    #[test]
    fn test_delete_and_delete_all() {
        let (_temp_dir, repo) = create_test_repo();
        let a = repo.insert(input("A", 100, "Food")).unwrap();
        repo.insert(input("B", 200, "Travel")).unwrap();
        repo.insert(input("C", 300, "Travel")).unwrap();

        assert!(repo.delete(a.id).unwrap());
        assert!(!repo.delete(a.id).unwrap());
        assert_eq!(repo.delete_all().unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_distinct_categories() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(input("A", 100, "Travel")).unwrap();
        repo.insert(input("B", 200, "Food")).unwrap();
        repo.insert(input("C", 300, "Travel")).unwrap();
        assert_eq!(repo.distinct_categories().unwrap(), vec!["Food", "Travel"]);
    }

    #[test]
    fn test_execute_filters_and_orders() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(input("A", 100, "Food")).unwrap();
        repo.insert(input("B", 900, "Travel")).unwrap();
        repo.insert(input("C", 500, "Food")).unwrap();

        let query = QueryBuilder::pinned(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap())
            .build(
                &FilterCriteria::new().category("Food"),
                SortSpec::new(SortColumn::Amount, SortDirection::Desc),
            )
            .unwrap();

        let payees: Vec<_> = repo
            .execute(&query)
            .unwrap()
            .into_iter()
            .map(|e| e.payee)
            .collect();
        assert_eq!(payees, vec!["C", "A"]);
    }
}
