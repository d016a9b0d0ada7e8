//! Query builder
//!
//! Combines parsed search text, structured filters and a sort spec into an
//! [`ExpenseQuery`]: a storage-agnostic predicate tree plus ordering. Building
//! performs no I/O; the store executes the result.

use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::error::ExpenseResult;

use super::criteria::FilterCriteria;
use super::field::{Predicate, PredicateGroup, TextField, GENERAL_SEARCH_FIELDS};
use super::parser::parse_search;
use super::range::resolve_date_range;
use super::sort::SortSpec;

/// Boolean tree of predicates
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Every child must match; an empty list matches everything
    And(Vec<FilterExpr>),
    /// At least one child must match
    Or(Vec<FilterExpr>),
    Pred(Predicate),
}

impl FilterExpr {
    /// The filter that lets every record through
    pub fn everything() -> Self {
        Self::And(Vec::new())
    }

    pub fn is_everything(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }

    /// Number of leaf predicates in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().map(FilterExpr::leaf_count).sum()
            }
            Self::Pred(_) => 1,
        }
    }
}

impl From<Predicate> for FilterExpr {
    fn from(predicate: Predicate) -> Self {
        Self::Pred(predicate)
    }
}

impl From<PredicateGroup> for FilterExpr {
    fn from(group: PredicateGroup) -> Self {
        match group {
            PredicateGroup::Field(predicate) => Self::Pred(predicate),
            PredicateGroup::AnyField(needle) => Self::Or(
                GENERAL_SEARCH_FIELDS
                    .iter()
                    .map(|field| {
                        Self::Pred(Predicate::Contains {
                            field: *field,
                            needle: needle.clone(),
                        })
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(
            f: &mut fmt::Formatter<'_>,
            children: &[FilterExpr],
            separator: &str,
        ) -> fmt::Result {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(separator)?;
                }
                match child {
                    FilterExpr::Pred(_) => write!(f, "{}", child)?,
                    _ => write!(f, "({})", child)?,
                }
            }
            Ok(())
        }

        match self {
            Self::And(children) if children.is_empty() => f.write_str("all expenses"),
            Self::And(children) => join(f, children, " AND "),
            Self::Or(children) => join(f, children, " OR "),
            Self::Pred(predicate) => write!(f, "{}", predicate),
        }
    }
}

/// An executable query description
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseQuery {
    pub filter: FilterExpr,
    pub sort: SortSpec,
}

impl ExpenseQuery {
    /// A query returning every record in the given order
    pub fn all(sort: SortSpec) -> Self {
        Self {
            filter: FilterExpr::everything(),
            sort,
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.filter.is_everything()
    }

    /// Multi-line description for `--explain`
    pub fn explain(&self) -> String {
        format!("where: {}\norder by: {}", self.filter, self.sort)
    }
}

impl fmt::Display for ExpenseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ORDER BY {}", self.filter, self.sort)
    }
}

/// Builds [`ExpenseQuery`] values.
///
/// Relative date ranges resolve against the local date unless the builder
/// was pinned to a fixed day.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder {
    fixed_today: Option<NaiveDate>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose "today" is always `today`
    pub fn pinned(today: NaiveDate) -> Self {
        Self {
            fixed_today: Some(today),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Build a query, or fail without producing one.
    ///
    /// Search clauses, the date range and the choice filters are AND-ed.
    /// A malformed `amount:` literal or a bad custom range aborts the build.
    pub fn build(&self, criteria: &FilterCriteria, sort: SortSpec) -> ExpenseResult<ExpenseQuery> {
        let mut clauses: Vec<FilterExpr> = Vec::new();

        if let Some(text) = criteria.search_text() {
            clauses.extend(parse_search(text)?.into_iter().map(FilterExpr::from));
        }

        if let Some(bounds) = resolve_date_range(&criteria.date_range, self.today())? {
            clauses.push(FilterExpr::Pred(Predicate::DateBetween {
                start: bounds.start_of_range(),
                end: bounds.end_of_range(),
            }));
        }

        if let Some(mode) = criteria.mode_of_payment.value() {
            clauses.push(FilterExpr::Pred(Predicate::Equals {
                field: TextField::ModeOfPayment,
                value: mode.to_string(),
            }));
        }

        if let Some(category) = criteria.category.value() {
            clauses.push(FilterExpr::Pred(Predicate::Equals {
                field: TextField::Category,
                value: category.to_string(),
            }));
        }

        let query = ExpenseQuery {
            filter: FilterExpr::And(clauses),
            sort,
        };
        debug!(query = %query, "built expense query");
        Ok(query)
    }

    /// Like [`build`](Self::build), taking the sort as raw column and
    /// direction names that fall back to the default when unrecognized.
    pub fn build_with_sort_names(
        &self,
        criteria: &FilterCriteria,
        column: &str,
        direction: &str,
    ) -> ExpenseResult<ExpenseQuery> {
        self.build(criteria, SortSpec::parse_lenient(column, direction))
    }
}
