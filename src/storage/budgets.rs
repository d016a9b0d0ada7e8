//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly budgets to budgets.json. A budget is
//! unique per (category, month); category comparison ignores case.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{Budget, BudgetMonth};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Composite key for budgets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BudgetKey {
    pub category: String,
    pub period: BudgetMonth,
}

impl BudgetKey {
    pub fn new(category: &str, period: BudgetMonth) -> Self {
        Self {
            category: category.trim().to_lowercase(),
            period,
        }
    }

    fn of(budget: &Budget) -> Self {
        Self::new(&budget.category, budget.period)
    }
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetKey, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(BudgetKey::of(&budget), budget);
        }

        Ok(())
    }

    /// Save budgets to disk, ordered by month then category
    pub fn save(&self) -> Result<(), ExpenseError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = BudgetData {
            budgets: sorted(budgets.values().cloned().collect()),
        };

        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, category: &str, period: BudgetMonth) -> Result<Option<Budget>, ExpenseError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets.get(&BudgetKey::new(category, period)).cloned())
    }

    /// All budgets, ordered by month then category
    pub fn get_all(&self) -> Result<Vec<Budget>, ExpenseError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(sorted(budgets.values().cloned().collect()))
    }

    /// Budgets for one month, ordered by category
    pub fn get_for_period(&self, period: BudgetMonth) -> Result<Vec<Budget>, ExpenseError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.period == period)
            .collect())
    }

    /// Insert a budget, replacing any existing one for the same key.
    /// Returns the budget that was replaced.
    pub fn upsert(&self, budget: Budget) -> Result<Option<Budget>, ExpenseError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(budgets.insert(BudgetKey::of(&budget), budget))
    }

    pub fn delete(&self, category: &str, period: BudgetMonth) -> Result<Option<Budget>, ExpenseError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(budgets.remove(&BudgetKey::new(category, period)))
    }
}

fn sorted(mut list: Vec<Budget>) -> Vec<Budget> {
    list.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.category.to_lowercase().cmp(&b.category.to_lowercase()))
    });
    list
}
