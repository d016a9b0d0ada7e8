//! Expense service
//!
//! Business logic for recording, editing, deleting and searching expenses.
//! Every change is persisted immediately and written to the activity log.

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, ExpensePatch, NewExpense};
use crate::query::{ExpenseQuery, FilterCriteria, QueryBuilder, SortSpec};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    builder: QueryBuilder,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self {
            storage,
            settings,
            builder: QueryBuilder::new(),
        }
    }

    /// Use a specific query builder (e.g. one pinned to a fixed "today")
    pub fn with_query_builder(mut self, builder: QueryBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Record a new expense
    pub fn add(&self, input: NewExpense) -> ExpenseResult<Expense> {
        let mut input = input.normalized();
        input
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;
        input.mode_of_payment = self.canonical_payment_mode(&input.mode_of_payment)?;

        let expense = self.storage.expenses.insert(input)?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.payee.clone()),
            &expense,
        )?;

        info!(id = %expense.id, amount = %expense.amount, "expense added");
        Ok(expense)
    }

    /// Apply a partial update to an existing expense
    pub fn edit(&self, id: ExpenseId, patch: ExpensePatch) -> ExpenseResult<Expense> {
        if patch.is_empty() {
            return Err(ExpenseError::Validation(
                "No changes specified for the expense".into(),
            ));
        }

        let before = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;

        let mut expense = before.clone();
        expense.apply(patch);
        expense
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;
        expense.mode_of_payment = self.canonical_payment_mode(&expense.mode_of_payment)?;

        self.storage.expenses.update(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.payee.clone()),
            &before,
            &expense,
        )?;

        info!(id = %expense.id, "expense updated");
        Ok(expense)
    }

    /// Delete one expense, returning the removed record
    pub fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.payee.clone()),
            &expense,
        )?;

        info!(id = %id, "expense deleted");
        Ok(expense)
    }

    /// Delete every expense; returns how many were removed
    pub fn delete_all(&self) -> ExpenseResult<usize> {
        let existing = self.storage.expenses.get_all()?;
        let removed = self.storage.expenses.delete_all()?;
        self.storage.expenses.save()?;

        for expense in &existing {
            self.storage.log_delete(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.payee.clone()),
                expense,
            )?;
        }

        info!(removed, "all expenses deleted");
        Ok(removed)
    }

    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Look up an expense by its id text ("7" or "#7")
    pub fn find(&self, identifier: &str) -> ExpenseResult<Expense> {
        let id: ExpenseId = identifier
            .parse()
            .map_err(|_| ExpenseError::expense_not_found(identifier))?;
        self.get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))
    }

    /// Build the query for the given criteria without running it
    pub fn query(&self, criteria: &FilterCriteria, sort: SortSpec) -> ExpenseResult<ExpenseQuery> {
        self.builder.build(criteria, sort)
    }

    /// Build and run a query
    pub fn search(&self, criteria: &FilterCriteria, sort: SortSpec) -> ExpenseResult<Vec<Expense>> {
        let query = self.query(criteria, sort)?;
        self.storage.expenses.execute(&query)
    }

    /// Suggested categories merged with those already in use, sorted and
    /// de-duplicated ignoring case
    pub fn categories(&self) -> ExpenseResult<Vec<String>> {
        let mut categories: Vec<String> = self.settings.categories.clone();
        for category in self.storage.expenses.distinct_categories()? {
            if !categories.iter().any(|c| c.eq_ignore_ascii_case(&category)) {
                categories.push(category);
            }
        }
        categories.sort_by_key(|c| c.to_lowercase());
        Ok(categories)
    }

    /// One-sentence summary of an expense
    pub fn describe(&self, expense: &Expense) -> String {
        let tags = if expense.tags.is_empty() {
            "none"
        } else {
            expense.tags.as_str()
        };
        format!(
            "Paid {} to {} for \"{}\" on {} via {}. Category: {}, Tags: {}.",
            expense.amount.format_with_symbol(&self.settings.currency_symbol),
            expense.payee,
            expense.description,
            expense.date_text(),
            expense.mode_of_payment,
            expense.category,
            tags
        )
    }

    /// Map a payment mode onto the configured spelling, rejecting unknown modes
    fn canonical_payment_mode(&self, mode: &str) -> ExpenseResult<String> {
        let mode = mode.trim();
        match self
            .settings
            .payment_modes
            .iter()
            .find(|m| m.eq_ignore_ascii_case(mode))
        {
            Some(known) => Ok(known.clone()),
            None => {
                debug!(mode, "rejecting unknown payment mode");
                Err(ExpenseError::Validation(format!(
                    "Unknown payment mode '{}'. Expected one of: {}",
                    mode,
                    self.settings.payment_modes.join(", ")
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::ExpensePaths;
    use crate::models::Money;
    use crate::query::{DateRange, SortColumn, SortDirection};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(payee: &str, cents: i64, mode: &str, category: &str, day: u32) -> NewExpense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            payee: payee.into(),
            description: "Coffee".into(),
            amount: Money::from_cents(cents),
            mode_of_payment: mode.into(),
            category: category.into(),
            tags: "morning".into(),
        }
    }

    #[test]
    fn test_add_persists_and_logs() {
        let (temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let expense = service.add(input("Cafe", 1250, "cash", "Food", 15)).unwrap();
        assert_eq!(expense.id.value(), 1);
        assert_eq!(expense.mode_of_payment, "Cash");
        assert!(temp_dir.path().join("data").join("expenses.json").exists());

        let log = storage.audit().read_all().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].operation, Operation::Create);
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let err = service.add(input("Cafe", -1, "Cash", "Food", 15)).unwrap_err();
        assert!(err.is_validation());

        let err = service.add(input("Cafe", 100, "Barter", "Food", 15)).unwrap_err();
        assert!(err.is_validation());

        let err = service.add(input("", 100, "Cash", "Food", 15)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_edit_updates_fields_and_logs_diff() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        let expense = service.add(input("Cafe", 1250, "Cash", "Food", 15)).unwrap();

        let updated = service
            .edit(
                expense.id,
                ExpensePatch {
                    amount: Some(Money::from_cents(900)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount.cents(), 900);

        let log = storage.audit().read_all().unwrap();
        assert_eq!(log[1].operation, Operation::Update);
        assert_eq!(log[1].diff_summary.as_deref(), Some("amount: 1250 -> 900"));
    }

    #[test]
    fn test_edit_unknown_and_empty() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);

        let err = service
            .edit(
                ExpenseId::new(42),
                ExpensePatch {
                    payee: Some("X".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());

        let expense = service.add(input("Cafe", 1250, "Cash", "Food", 15)).unwrap();
        let err = service.edit(expense.id, ExpensePatch::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_and_delete_all() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        let first = service.add(input("A", 100, "Cash", "Food", 1)).unwrap();
        service.add(input("B", 200, "UPI", "Food", 2)).unwrap();
        service.add(input("C", 300, "UPI", "Travel", 3)).unwrap();

        let removed = service.delete(first.id).unwrap();
        assert_eq!(removed.payee, "A");
        assert!(service.delete(first.id).unwrap_err().is_not_found());

        assert_eq!(service.delete_all().unwrap(), 2);
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_search_with_pinned_today() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings)
            .with_query_builder(QueryBuilder::pinned(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()));
        service.add(input("Cafe", 1250, "Cash", "Food", 15)).unwrap();
        service.add(input("Metro", 4000, "UPI", "Travel", 10)).unwrap();
        service.add(input("Grocer", 9000, "UPI", "Food", 14)).unwrap();

        let criteria = FilterCriteria::new()
            .search("category:food")
            .date_range(DateRange::ThisWeek);
        let results = service
            .search(&criteria, SortSpec::new(SortColumn::Amount, SortDirection::Desc))
            .unwrap();
        let payees: Vec<_> = results.iter().map(|e| e.payee.as_str()).collect();
        assert_eq!(payees, vec!["Grocer", "Cafe"]);

        let err = service
            .search(&FilterCriteria::new().search("amount:lots"), SortSpec::default())
            .unwrap_err();
        assert!(err.is_query_error());
    }

    #[test]
    fn test_categories_merge_defaults_and_store() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        service.add(input("Vet", 5000, "Cash", "Pets", 1)).unwrap();
        service.add(input("Cafe", 500, "Cash", "food", 1)).unwrap();

        let categories = service.categories().unwrap();
        assert!(categories.contains(&"Pets".to_string()));
        assert_eq!(
            categories.iter().filter(|c| c.eq_ignore_ascii_case("food")).count(),
            1
        );
        let mut sorted = categories.clone();
        sorted.sort_by_key(|c| c.to_lowercase());
        assert_eq!(categories, sorted);
    }

    #[test]
    fn test_describe() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        let expense = service.add(input("Cafe", 1250, "Cash", "Food", 15)).unwrap();

        assert_eq!(
            service.describe(&expense),
            "Paid ₹12.50 to Cafe for \"Coffee\" on 2024-02-15 via Cash. Category: Food, Tags: morning."
        );
    }

    #[test]
    fn test_find_accepts_hash_prefix() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = ExpenseService::new(&storage, &settings);
        service.add(input("Cafe", 1250, "Cash", "Food", 15)).unwrap();

        assert_eq!(service.find("#1").unwrap().payee, "Cafe");
        assert!(service.find("abc").unwrap_err().is_not_found());
    }
}
