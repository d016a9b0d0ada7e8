//! In-memory evaluation of queries against expense records

use chrono::NaiveTime;

use crate::models::Expense;

use super::builder::{ExpenseQuery, FilterExpr};
use super::field::Predicate;

impl Predicate {
    /// Test one record
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Self::Contains { field, needle } => field
                .value(expense)
                .to_lowercase()
                .contains(needle.as_str()),
            Self::Amount { op, value } => op.holds(&expense.amount.as_f64(), value),
            Self::Date { op, value } => op.holds(expense.date_text().as_str(), value.as_str()),
            Self::Equals { field, value } => field.value(expense) == value.as_str(),
            Self::DateBetween { start, end } => {
                let at = expense.date.and_time(NaiveTime::MIN);
                at >= *start && at <= *end
            }
        }
    }
}

impl FilterExpr {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Self::And(children) => children.iter().all(|c| c.matches(expense)),
            Self::Or(children) => children.iter().any(|c| c.matches(expense)),
            Self::Pred(predicate) => predicate.matches(expense),
        }
    }
}

impl ExpenseQuery {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.filter.matches(expense)
    }

    /// Filter and order a set of records
    pub fn apply<'a, I>(&self, records: I) -> Vec<Expense>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut selected: Vec<Expense> = records
            .into_iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money, NewExpense};
    use crate::query::{
        DateRange, FilterCriteria, QueryBuilder, SortColumn, SortDirection, SortSpec,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: u64, day: NaiveDate, payee: &str, cents: i64, mode: &str, category: &str) -> Expense {
        NewExpense {
            date: day,
            payee: payee.into(),
            description: format!("{} purchase", payee),
            amount: Money::from_cents(cents),
            mode_of_payment: mode.into(),
            category: category.into(),
            tags: "weekly".into(),
        }
        .into_expense(ExpenseId::new(id))
    }

    fn fixture() -> Vec<Expense> {
        vec![
            record(1, date(2024, 2, 1), "Corner Cafe", 1250, "Cash", "Food"),
            record(2, date(2024, 2, 10), "Metro", 4000, "UPI", "Travel"),
            record(3, date(2024, 2, 15), "FreshMart", 10000, "UPI", "Food"),
            record(4, date(2024, 1, 31), "Bookshop", 4999, "Credit Card", "Education"),
            record(5, date(2023, 12, 31), "Cinema", 30000, "Cash", "Entertainment"),
        ]
    }

    fn ids(records: &[Expense]) -> Vec<u64> {
        records.iter().map(|e| e.id.value()).collect()
    }

    fn run(search: &str) -> Vec<u64> {
        let query = QueryBuilder::pinned(date(2024, 2, 15))
            .build(&FilterCriteria::new().search(search), SortSpec::default())
            .unwrap();
        ids(&query.apply(&fixture()))
    }

    #[test]
    fn test_unfiltered_query_returns_everything_in_order() {
        let records = fixture();
        let sort = SortSpec::new(SortColumn::Amount, SortDirection::Desc);
        let query = QueryBuilder::pinned(date(2024, 2, 15))
            .build(&FilterCriteria::new().category("All"), sort)
            .unwrap();
        assert_eq!(ids(&query.apply(&records)), vec![5, 3, 4, 2, 1]);
    }

    #[test]
    fn test_bare_text_matches_any_field_ignoring_case() {
        assert_eq!(run("cafe"), vec![1]);
        assert_eq!(run("UPI"), vec![2, 3]);
        assert_eq!(run("FOOD"), vec![1, 3]);
    }

    #[test]
    fn test_bare_text_matches_amount_text() {
        assert_eq!(run("12.50"), vec![1]);
        assert_eq!(run("49.99"), vec![4]);
    }

    #[test]
    fn test_amount_comparisons() {
        assert_eq!(run("amount:>=100"), vec![3, 5]);
        assert_eq!(run("amount:>100"), vec![5]);
        assert_eq!(run("amount:100"), vec![3]);
        assert_eq!(run("amount:<=40"), vec![1, 2]);
    }

    #[test]
    fn test_combined_clauses() {
        assert_eq!(run("category:food AND amount:<50"), vec![1]);
        assert_eq!(run("mode:upi AND payee:metro"), vec![2]);
    }

    #[test]
    fn test_date_comparison_is_lexicographic() {
        assert_eq!(run("date:>=2024-02-10"), vec![2, 3]);
        assert_eq!(run("date:<2024"), vec![5]);
        assert_eq!(run("date:2024-01-31"), vec![4]);
    }

    #[test]
    fn test_unknown_field_is_dropped() {
        assert_eq!(run("colour:red"), vec![1, 2, 3, 4, 5]);
        assert_eq!(run("colour:red AND category:travel"), vec![2]);
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let records = fixture();
        let builder = QueryBuilder::pinned(date(2024, 2, 15));

        let month = builder
            .build(
                &FilterCriteria::new().date_range(DateRange::ThisMonth),
                SortSpec::default(),
            )
            .unwrap();
        assert_eq!(ids(&month.apply(&records)), vec![1, 2, 3]);

        let today = builder
            .build(
                &FilterCriteria::new().date_range(DateRange::Today),
                SortSpec::default(),
            )
            .unwrap();
        assert_eq!(ids(&today.apply(&records)), vec![3]);

        let custom = builder
            .build(
                &FilterCriteria::new()
                    .date_range(DateRange::custom(date(2024, 1, 31), date(2024, 2, 1))),
                SortSpec::default(),
            )
            .unwrap();
        assert_eq!(ids(&custom.apply(&records)), vec![1, 4]);
    }

    #[test]
    fn test_choice_filters_are_exact() {
        let records = fixture();
        let builder = QueryBuilder::pinned(date(2024, 2, 15));

        let cash = builder
            .build(&FilterCriteria::new().mode_of_payment("Cash"), SortSpec::default())
            .unwrap();
        assert_eq!(ids(&cash.apply(&records)), vec![1, 5]);

        let partial = builder
            .build(&FilterCriteria::new().category("Foo"), SortSpec::default())
            .unwrap();
        assert!(partial.apply(&records).is_empty());
    }
}
