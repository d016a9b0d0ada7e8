//! Searchable fields, comparison operators and predicates
//!
//! Field dispatch is closed: a search clause either names one of the
//! [`SearchField`] variants or it is dropped.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;

use crate::models::Expense;

/// Text-valued columns of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Payee,
    Description,
    /// The amount rendered as decimal text ("12.50")
    Amount,
    Category,
    Tags,
    ModeOfPayment,
}

/// Columns a free-text clause (no `field:` prefix) is matched against
pub const GENERAL_SEARCH_FIELDS: [TextField; 6] = [
    TextField::Payee,
    TextField::Description,
    TextField::Amount,
    TextField::Category,
    TextField::Tags,
    TextField::ModeOfPayment,
];

impl TextField {
    /// The field's text on a record
    pub fn value<'a>(&self, expense: &'a Expense) -> Cow<'a, str> {
        match self {
            Self::Payee => Cow::Borrowed(&expense.payee),
            Self::Description => Cow::Borrowed(&expense.description),
            Self::Amount => Cow::Owned(expense.amount.to_string()),
            Self::Category => Cow::Borrowed(&expense.category),
            Self::Tags => Cow::Borrowed(&expense.tags),
            Self::ModeOfPayment => Cow::Borrowed(&expense.mode_of_payment),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Payee => "payee",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Tags => "tags",
            Self::ModeOfPayment => "modeofpayment",
        }
    }
}

/// A field that may appear before the colon of a search clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Case-insensitive substring match
    Text(TextField),
    /// Numeric comparison
    Amount,
    /// Lexicographic comparison of ISO dates
    Date,
}

impl SearchField {
    /// Look up a field by name, case-insensitively. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "payee" => Some(Self::Text(TextField::Payee)),
            "description" => Some(Self::Text(TextField::Description)),
            "category" => Some(Self::Text(TextField::Category)),
            "tags" => Some(Self::Text(TextField::Tags)),
            "modeofpayment" | "mode-of-payment" | "mode_of_payment" | "mode" | "mop" => {
                Some(Self::Text(TextField::ModeOfPayment))
            }
            "amount" => Some(Self::Amount),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// Ordering comparison between a record value and a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    /// Split a leading operator off `value`.
    ///
    /// Two-character operators are tried before their one-character
    /// prefixes so `>=` is never read as `>`. No operator means equality.
    pub fn split_prefix(value: &str) -> (Self, &str) {
        const PREFIXES: [(&str, Comparison); 5] = [
            (">=", Comparison::Ge),
            (">", Comparison::Gt),
            ("<=", Comparison::Le),
            ("<", Comparison::Lt),
            ("=", Comparison::Eq),
        ];

        PREFIXES
            .iter()
            .find_map(|(prefix, op)| value.strip_prefix(*prefix).map(|rest| (*op, rest)))
            .unwrap_or((Comparison::Eq, value))
    }

    /// Evaluate `lhs <op> rhs`
    pub fn holds<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An atomic test against one expense
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field contains `needle` (already lower-cased), ignoring case
    Contains { field: TextField, needle: String },
    /// Amount compared numerically
    Amount { op: Comparison, value: f64 },
    /// ISO date text compared lexicographically
    Date { op: Comparison, value: String },
    /// Field equals `value` exactly
    Equals { field: TextField, value: String },
    /// Date within an inclusive timestamp window
    DateBetween {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains { field, needle } => {
                write!(f, "{} contains \"{}\"", field.name(), needle)
            }
            Self::Amount { op, value } => write!(f, "amount {} {}", op, value),
            Self::Date { op, value } => write!(f, "date {} \"{}\"", op, value),
            Self::Equals { field, value } => write!(f, "{} = \"{}\"", field.name(), value),
            Self::DateBetween { start, end } => write!(
                f,
                "date between {} and {}",
                start.format("%Y-%m-%d %H:%M:%S"),
                end.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }
}

/// One parsed clause of the search text
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateGroup {
    /// A `field:value` clause
    Field(Predicate),
    /// A bare clause matched against every field in [`GENERAL_SEARCH_FIELDS`]
    AnyField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_is_case_insensitive() {
        assert_eq!(
            SearchField::from_name("Category"),
            Some(SearchField::Text(TextField::Category))
        );
        assert_eq!(
            SearchField::from_name("ModeOfPayment"),
            Some(SearchField::Text(TextField::ModeOfPayment))
        );
        assert_eq!(SearchField::from_name(" AMOUNT "), Some(SearchField::Amount));
        assert_eq!(SearchField::from_name("date"), Some(SearchField::Date));
        assert_eq!(SearchField::from_name("colour"), None);
    }

    #[test]
    fn test_prefix_priority() {
        assert_eq!(Comparison::split_prefix(">=100"), (Comparison::Ge, "100"));
        assert_eq!(Comparison::split_prefix(">100"), (Comparison::Gt, "100"));
        assert_eq!(Comparison::split_prefix("<=5"), (Comparison::Le, "5"));
        assert_eq!(Comparison::split_prefix("<5"), (Comparison::Lt, "5"));
        assert_eq!(Comparison::split_prefix("=5"), (Comparison::Eq, "5"));
        assert_eq!(Comparison::split_prefix("5"), (Comparison::Eq, "5"));
    }

    #[test]
    fn test_holds() {
        assert!(Comparison::Ge.holds(&100.0, &100.0));
        assert!(!Comparison::Gt.holds(&100.0, &100.0));
        assert!(Comparison::Lt.holds("2024-01-31", "2024-02-01"));
        assert!(Comparison::Eq.holds("2024-02-01", "2024-02-01"));
    }

    #[test]
    fn test_predicate_display() {
        let p = Predicate::Amount {
            op: Comparison::Lt,
            value: 50.0,
        };
        assert_eq!(p.to_string(), "amount < 50");

        let p = Predicate::Contains {
            field: TextField::Category,
            needle: "food".into(),
        };
        assert_eq!(p.to_string(), "category contains \"food\"");
    }
}
