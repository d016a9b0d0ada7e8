//! Filter flags shared by listing, reporting and export commands

use chrono::NaiveDate;
use clap::Args;

use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::query::{DateRange, FilterCriteria, QueryBuilder, SortSpec};

/// Search, range, choice and ordering flags
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Search text, e.g. "coffee" or "category:food AND amount:<50"
    #[arg(short, long)]
    pub search: Option<String>,

    /// Date range: all, today, week, month, year or custom
    #[arg(short, long, default_value = "all")]
    pub range: String,

    /// Start of a custom range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End of a custom range (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Payment mode, or "All"
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Category, or "All"
    #[arg(short, long)]
    pub category: Option<String>,

    /// Sort column (id, date, payee, description, amount, mode, category, tags)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    pub direction: Option<String>,

    /// Resolve relative ranges against this day instead of the local date
    #[arg(long, value_name = "YYYY-MM-DD", env = "EXPENSE_TRACKER_TODAY", hide = true)]
    pub today: Option<String>,
}

impl FilterArgs {
    /// Turn the flags into filter criteria.
    ///
    /// `--from`/`--to` imply a custom range.
    pub fn criteria(&self) -> ExpenseResult<FilterCriteria> {
        let mut range: DateRange = self.range.parse()?;
        if self.from.is_some() || self.to.is_some() || matches!(range, DateRange::Custom { .. }) {
            range = DateRange::custom_from_strs(self.from.as_deref(), self.to.as_deref())?;
        }

        let mut criteria = FilterCriteria::new().date_range(range);
        if let Some(search) = &self.search {
            criteria = criteria.search(search.clone());
        }
        if let Some(mode) = &self.mode {
            criteria = criteria.mode_of_payment(mode);
        }
        if let Some(category) = &self.category {
            criteria = criteria.category(category);
        }
        Ok(criteria)
    }

    /// Requested ordering; unspecified or unknown parts fall back to the
    /// configured default
    pub fn sort(&self, settings: &Settings) -> SortSpec {
        SortSpec::parse_lenient(
            self.sort.as_deref().unwrap_or(&settings.default_sort_column),
            self.direction
                .as_deref()
                .unwrap_or(&settings.default_sort_direction),
        )
    }

    pub fn query_builder(&self) -> ExpenseResult<QueryBuilder> {
        parse_today(self.today.as_deref())
    }
}

/// A query builder pinned to `today` when given
pub fn parse_today(today: Option<&str>) -> ExpenseResult<QueryBuilder> {
    match today {
        Some(text) => {
            let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
                ExpenseError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", text))
            })?;
            Ok(QueryBuilder::pinned(date))
        }
        None => Ok(QueryBuilder::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ChoiceFilter, SortColumn, SortDirection};

    fn args() -> FilterArgs {
        FilterArgs {
            range: "all".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_are_unfiltered() {
        let criteria = args().criteria().unwrap();
        assert!(criteria.is_unfiltered());
    }

    #[test]
    fn test_from_to_imply_custom_range() {
        let mut args = args();
        args.from = Some("2024-01-01".into());
        args.to = Some("2024-01-31".into());

        let criteria = args.criteria().unwrap();
        assert_eq!(
            criteria.date_range,
            DateRange::custom(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
            )
        );
    }

    #[test]
    fn test_malformed_bound_is_rejected() {
        let mut args = args();
        args.from = Some("January".into());
        assert!(matches!(
            args.criteria(),
            Err(ExpenseError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_choice_flags() {
        let mut args = args();
        args.mode = Some("UPI".into());
        args.category = Some("All".into());

        let criteria = args.criteria().unwrap();
        assert_eq!(criteria.mode_of_payment, ChoiceFilter::Only("UPI".into()));
        assert!(criteria.category.is_all());
    }

    #[test]
    fn test_sort_falls_back_to_settings() {
        let mut settings = Settings::default();
        settings.default_sort_column = "date".into();
        settings.default_sort_direction = "desc".into();

        let mut args = args();
        assert_eq!(
            args.sort(&settings),
            SortSpec::new(SortColumn::Date, SortDirection::Desc)
        );

        args.sort = Some("amount".into());
        args.direction = Some("sideways".into());
        assert_eq!(
            args.sort(&settings),
            SortSpec::new(SortColumn::Amount, SortDirection::Asc)
        );
    }

    #[test]
    fn test_parse_today() {
        let builder = parse_today(Some("2024-02-15")).unwrap();
        assert_eq!(builder.today(), NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert!(parse_today(Some("15/02/2024")).is_err());
    }
}
