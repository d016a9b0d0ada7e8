//! Budget service
//!
//! Monthly budgets per category (or "Overall") and how much of each has
//! been spent.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Budget, BudgetMonth, BudgetStatus, Expense, Money};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// All budgets of one month measured against that month's spending
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub period: BudgetMonth,
    pub statuses: Vec<BudgetStatus>,
    /// Everything spent in the month, budgeted or not
    pub total_spent: Money,
}

impl BudgetOverview {
    pub fn overspent(&self) -> impl Iterator<Item = &BudgetStatus> {
        self.statuses.iter().filter(|s| s.is_overspent())
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the budget for a category and `YYYY-MM` month, replacing any
    /// existing amount
    pub fn set(&self, category: &str, period: &str, amount: Money) -> ExpenseResult<Budget> {
        let period = parse_period(period)?;
        self.set_for(category, period, amount)
    }

    pub fn set_for(&self, category: &str, period: BudgetMonth, amount: Money) -> ExpenseResult<Budget> {
        let existing = self.storage.budgets.get(category, period)?;

        let budget = match &existing {
            Some(current) => {
                let mut updated = current.clone();
                updated.set_amount(amount);
                updated
            }
            None => Budget::new(category, period, amount),
        };
        budget
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        let entity_id = budget_id(&budget);
        match &existing {
            Some(before) => self.storage.log_update(
                EntityType::Budget,
                entity_id,
                Some(budget.category.clone()),
                before,
                &budget,
            )?,
            None => self.storage.log_create(
                EntityType::Budget,
                entity_id,
                Some(budget.category.clone()),
                &budget,
            )?,
        }

        info!(category = %budget.category, period = %budget.period, amount = %budget.amount, "budget set");
        Ok(budget)
    }

    pub fn get(&self, category: &str, period: BudgetMonth) -> ExpenseResult<Option<Budget>> {
        self.storage.budgets.get(category, period)
    }

    /// Every budget, ordered by month then category
    pub fn list(&self) -> ExpenseResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    pub fn delete(&self, category: &str, period: BudgetMonth) -> ExpenseResult<Budget> {
        let budget = self
            .storage
            .budgets
            .delete(category, period)?
            .ok_or_else(|| ExpenseError::budget_not_found(format!("{} {}", category, period)))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget_id(&budget),
            Some(budget.category.clone()),
            &budget,
        )?;
        Ok(budget)
    }

    /// Spending against each budget of the month
    pub fn status(&self, period: BudgetMonth) -> ExpenseResult<BudgetOverview> {
        let in_month: Vec<Expense> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| period.contains(e.date))
            .collect();

        let statuses = self
            .storage
            .budgets
            .get_for_period(period)?
            .into_iter()
            .map(|budget| {
                let spent = spent_against(&budget, &in_month);
                BudgetStatus::new(budget, spent)
            })
            .collect();

        Ok(BudgetOverview {
            period,
            statuses,
            total_spent: in_month.iter().map(|e| e.amount).sum(),
        })
    }
}

/// Sum of the expenses a budget covers; `in_month` is already limited to its month
fn spent_against(budget: &Budget, in_month: &[Expense]) -> Money {
    in_month
        .iter()
        .filter(|e| budget.is_overall() || e.category.eq_ignore_ascii_case(&budget.category))
        .map(|e| e.amount)
        .sum()
}

fn budget_id(budget: &Budget) -> String {
    format!("{}@{}", budget.category.to_lowercase(), budget.period)
}

fn parse_period(period: &str) -> ExpenseResult<BudgetMonth> {
    BudgetMonth::parse(period).map_err(|_| {
        ExpenseError::Validation(format!(
            "Invalid budget month '{}'. Expected YYYY-MM",
            period.trim()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::ExpensePaths;
    use crate::models::NewExpense;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn spend(storage: &Storage, category: &str, cents: i64, month: u32, day: u32) {
        storage
            .expenses
            .insert(NewExpense {
                date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
                payee: "Shop".into(),
                description: "stuff".into(),
                amount: Money::from_cents(cents),
                mode_of_payment: "Cash".into(),
                category: category.into(),
                tags: String::new(),
            })
            .unwrap();
    }

    fn feb() -> BudgetMonth {
        BudgetMonth::new(2024, 2).unwrap()
    }

    #[test]
    fn test_set_creates_then_replaces() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service.set("Food", "2024-02", Money::from_cents(5000)).unwrap();
        service.set("food", "2024-02", Money::from_cents(7500)).unwrap();

        let budgets = service.list().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount.cents(), 7500);
        assert_eq!(budgets[0].category, "Food");

        let log = storage.audit().read_all().unwrap();
        assert_eq!(log[0].operation, Operation::Create);
        assert_eq!(log[1].operation, Operation::Update);
        assert_eq!(log[1].entity_id, "food@2024-02");
    }

    #[test]
    fn test_set_validates_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        assert!(service
            .set("Food", "Feb 2024", Money::from_cents(100))
            .unwrap_err()
            .is_validation());
        assert!(service
            .set("Food", "2024-02", Money::from_cents(-100))
            .unwrap_err()
            .is_validation());
        assert!(service
            .set("  ", "2024-02", Money::from_cents(100))
            .unwrap_err()
            .is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_status_sums_month_spending() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        spend(&storage, "Food", 3000, 2, 3);
        spend(&storage, "food", 4000, 2, 20);
        spend(&storage, "Food", 9999, 3, 1);
        spend(&storage, "Travel", 1000, 2, 5);

        service.set("Food", "2024-02", Money::from_cents(5000)).unwrap();
        service.set("Overall", "2024-02", Money::from_cents(10000)).unwrap();

        let overview = service.status(feb()).unwrap();
        assert_eq!(overview.total_spent.cents(), 8000);

        let food = overview
            .statuses
            .iter()
            .find(|s| s.budget.category == "Food")
            .unwrap();
        assert_eq!(food.spent.cents(), 7000);
        assert_eq!(food.remaining.cents(), -2000);
        assert!(food.is_overspent());

        let overall = overview
            .statuses
            .iter()
            .find(|s| s.budget.is_overall())
            .unwrap();
        assert_eq!(overall.spent.cents(), 8000);
        assert!((overall.percent_used() - 80.0).abs() < 1e-9);
        assert_eq!(overview.overspent().count(), 1);
    }

    #[test]
    fn test_delete_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.set("Food", "2024-02", Money::from_cents(5000)).unwrap();

        service.delete("FOOD", feb()).unwrap();
        assert!(service.get("Food", feb()).unwrap().is_none());
        assert!(service.delete("Food", feb()).unwrap_err().is_not_found());
    }
}
