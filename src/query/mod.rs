//! Expense search and filtering
//!
//! Search text is parsed into predicate groups, combined with structured
//! criteria by the [`QueryBuilder`], and the resulting [`ExpenseQuery`] is
//! handed to the store for execution.

pub mod builder;
pub mod criteria;
pub mod eval;
pub mod field;
pub mod parser;
pub mod range;
pub mod sort;

pub use builder::{ExpenseQuery, FilterExpr, QueryBuilder};
pub use criteria::{ChoiceFilter, DateRange, FilterCriteria, ALL_SENTINEL};
pub use field::{Comparison, Predicate, PredicateGroup, SearchField, TextField};
pub use parser::parse_search;
pub use range::{resolve_date_range, DateBounds};
pub use sort::{SortColumn, SortDirection, SortSpec};
