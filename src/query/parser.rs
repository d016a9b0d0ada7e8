//! Search text parser
//!
//! Grammar, informally:
//!
//! ```text
//! search  := clause (" AND " clause)*
//! clause  := field ":" value | text
//! value   := [">=" | ">" | "<=" | "<" | "="] literal      (amount, date)
//!          | literal                                       (text fields)
//! ```
//!
//! Field names are case-insensitive. Clauses naming an unknown field are
//! dropped rather than rejected so that a typo widens the result set instead
//! of failing the whole search.

use tracing::debug;

use crate::error::{ExpenseError, ExpenseResult};

use super::field::{Comparison, Predicate, PredicateGroup, SearchField};

/// Separator between clauses. Case-sensitive, like the rest of the syntax.
pub const CLAUSE_SEPARATOR: &str = " AND ";

/// Parse free-text search into predicate groups.
///
/// Returns an empty vector for empty input. Fails only when an `amount:`
/// clause carries a literal that is not a number.
pub fn parse_search(input: &str) -> ExpenseResult<Vec<PredicateGroup>> {
    let mut groups = Vec::new();

    for clause in input.split(CLAUSE_SEPARATOR).map(str::trim) {
        if clause.is_empty() {
            continue;
        }

        match clause.split_once(':') {
            Some((field, value)) => {
                if let Some(group) = parse_field_clause(field, value)? {
                    groups.push(group);
                }
            }
            None => groups.push(PredicateGroup::AnyField(clause.to_lowercase())),
        }
    }

    Ok(groups)
}

fn parse_field_clause(field: &str, value: &str) -> ExpenseResult<Option<PredicateGroup>> {
    let value = value.trim().to_lowercase();

    let Some(search_field) = SearchField::from_name(field) else {
        debug!(field = field.trim(), "dropping search clause with unknown field");
        return Ok(None);
    };

    let predicate = match search_field {
        SearchField::Text(field) => Predicate::Contains {
            field,
            needle: value,
        },
        SearchField::Amount => {
            let (op, literal) = Comparison::split_prefix(&value);
            let amount = literal.trim().parse::<f64>().map_err(|_| {
                ExpenseError::InvalidFilterValue {
                    field: "amount",
                    value: value.clone(),
                }
            })?;
            Predicate::Amount { op, value: amount }
        }
        SearchField::Date => {
            let (op, literal) = Comparison::split_prefix(&value);
            Predicate::Date {
                op,
                value: literal.trim().to_string(),
            }
        }
    };

    Ok(Some(PredicateGroup::Field(predicate)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::field::TextField;

    #[test]
    fn test_empty_input() {
        assert!(parse_search("").unwrap().is_empty());
        assert!(parse_search("   ").unwrap().is_empty());
    }

    #[test]
    fn test_bare_clause_is_lowercased() {
        let groups = parse_search("  Coffee ").unwrap();
        assert_eq!(groups, vec![PredicateGroup::AnyField("coffee".into())]);
    }

    #[test]
    fn test_amount_operators() {
        let groups = parse_search("amount:>=100").unwrap();
        assert_eq!(
            groups,
            vec![PredicateGroup::Field(Predicate::Amount {
                op: Comparison::Ge,
                value: 100.0
            })]
        );

        let groups = parse_search("amount:100").unwrap();
        assert_eq!(
            groups,
            vec![PredicateGroup::Field(Predicate::Amount {
                op: Comparison::Eq,
                value: 100.0
            })]
        );

        let groups = parse_search("amount:=12.5").unwrap();
        assert_eq!(
            groups,
            vec![PredicateGroup::Field(Predicate::Amount {
                op: Comparison::Eq,
                value: 12.5
            })]
        );
    }

    #[test]
    fn test_amount_non_numeric_fails() {
        let err = parse_search("amount:abc").unwrap_err();
        assert!(matches!(
            err,
            ExpenseError::InvalidFilterValue { field: "amount", .. }
        ));

        assert!(parse_search("amount:>").is_err());
        assert!(parse_search("payee:cafe AND amount:<=x").is_err());
    }

    #[test]
    fn test_and_joined_clauses() {
        let groups = parse_search("category:food AND amount:<50").unwrap();
        assert_eq!(
            groups,
            vec![
                PredicateGroup::Field(Predicate::Contains {
                    field: TextField::Category,
                    needle: "food".into()
                }),
                PredicateGroup::Field(Predicate::Amount {
                    op: Comparison::Lt,
                    value: 50.0
                }),
            ]
        );
    }

    #[test]
    fn test_field_name_case_and_value_case() {
        let groups = parse_search("Payee: Starbucks").unwrap();
        assert_eq!(
            groups,
            vec![PredicateGroup::Field(Predicate::Contains {
                field: TextField::Payee,
                needle: "starbucks".into()
            })]
        );
    }

    #[test]
    fn test_date_keeps_literal() {
        let groups = parse_search("date:>=2024-01-01").unwrap();
        assert_eq!(
            groups,
            vec![PredicateGroup::Field(Predicate::Date {
                op: Comparison::Ge,
                value: "2024-01-01".into()
            })]
        );

        // not validated as a date; compared as text
        assert!(parse_search("date:yesterday").is_ok());
    }

    #[test]
    fn test_unknown_field_dropped() {
        let groups = parse_search("colour:red AND coffee").unwrap();
        assert_eq!(groups, vec![PredicateGroup::AnyField("coffee".into())]);
    }

    #[test]
    fn test_value_may_contain_colons() {
        let groups = parse_search("description:meeting at 10:30").unwrap();
        assert_eq!(
            groups,
            vec![PredicateGroup::Field(Predicate::Contains {
                field: TextField::Description,
                needle: "meeting at 10:30".into()
            })]
        );
    }

    #[test]
    fn test_lowercase_and_is_not_a_separator() {
        let groups = parse_search("salt and pepper").unwrap();
        assert_eq!(groups, vec![PredicateGroup::AnyField("salt and pepper".into())]);
    }
}
