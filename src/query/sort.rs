//! Sort specification
//!
//! Column and direction come from untrusted input (table header clicks,
//! command-line flags, settings) and are parsed leniently: anything
//! unrecognized falls back to id / ascending instead of failing.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::models::Expense;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortColumn {
    #[default]
    Id,
    Date,
    Payee,
    Description,
    Amount,
    ModeOfPayment,
    Category,
    Tags,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        Self::Id,
        Self::Date,
        Self::Payee,
        Self::Description,
        Self::Amount,
        Self::ModeOfPayment,
        Self::Category,
        Self::Tags,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "id" => Some(Self::Id),
            "date" => Some(Self::Date),
            "payee" => Some(Self::Payee),
            "description" => Some(Self::Description),
            "amount" => Some(Self::Amount),
            "modeofpayment" | "mode" | "mop" => Some(Self::ModeOfPayment),
            "category" => Some(Self::Category),
            "tags" => Some(Self::Tags),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Date => "date",
            Self::Payee => "payee",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::ModeOfPayment => "mode-of-payment",
            Self::Category => "category",
            Self::Tags => "tags",
        }
    }

    /// Compare two records on this column alone. Text compares case-insensitively.
    pub fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        fn text(a: &str, b: &str) -> Ordering {
            a.to_lowercase().cmp(&b.to_lowercase())
        }

        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Date => a.date.cmp(&b.date),
            Self::Payee => text(&a.payee, &b.payee),
            Self::Description => text(&a.description, &b.description),
            Self::Amount => a.amount.cmp(&b.amount),
            Self::ModeOfPayment => text(&a.mode_of_payment, &b.mode_of_payment),
            Self::Category => text(&a.category, &b.category),
            Self::Tags => text(&a.tags, &b.tags),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Column plus direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Parse column and direction, substituting the default for whichever
    /// part is unrecognized.
    pub fn parse_lenient(column: &str, direction: &str) -> Self {
        let parsed_column = SortColumn::from_name(column).unwrap_or_else(|| {
            debug!(column, "unsupported sort column, using id");
            SortColumn::default()
        });
        let parsed_direction = SortDirection::from_name(direction).unwrap_or_else(|| {
            debug!(direction, "unsupported sort direction, using asc");
            SortDirection::default()
        });
        Self::new(parsed_column, parsed_direction)
    }

    /// Order two records; ties are broken by ascending id so output is stable
    pub fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        self.direction
            .apply(self.column.compare(a, b))
            .then_with(|| a.id.cmp(&b.id))
    }

}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}
