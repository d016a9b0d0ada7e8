//! Structured filter criteria
//!
//! The value object a caller fills from filter widgets or command-line flags:
//! search text, a date-range selector, and payment-mode / category choices.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};

/// Sentinel meaning "no filter" for choice filters
pub const ALL_SENTINEL: &str = "All";

/// A dropdown-style filter: either everything, or one exact value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ChoiceFilter {
    #[default]
    All,
    Only(String),
}

impl ChoiceFilter {
    /// Build from user input; empty text and "All" (any case) select everything
    pub fn from_input(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::from_input).unwrap_or_default()
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<String> for ChoiceFilter {
    fn from(value: String) -> Self {
        Self::from_input(&value)
    }
}

impl From<ChoiceFilter> for String {
    fn from(filter: ChoiceFilter) -> Self {
        match filter {
            ChoiceFilter::All => ALL_SENTINEL.to_string(),
            ChoiceFilter::Only(v) => v,
        }
    }
}

impl fmt::Display for ChoiceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_SENTINEL),
            Self::Only(v) => f.write_str(v),
        }
    }
}

/// Date-range selector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    #[default]
    AllTime,
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    /// Explicit bounds; both must be present and ordered when the query is built
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateRange {
    /// Custom range from `YYYY-MM-DD` strings.
    ///
    /// Malformed dates fail with `InvalidDateRange`. Missing bounds are kept
    /// as `None` and rejected when the query is built.
    pub fn custom_from_strs(start: Option<&str>, end: Option<&str>) -> ExpenseResult<Self> {
        Ok(Self::Custom {
            start: start.map(|s| parse_bound("start", s)).transpose()?,
            end: end.map(|s| parse_bound("end", s)).transpose()?,
        })
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Custom {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_all_time(&self) -> bool {
        matches!(self, Self::AllTime)
    }

    /// Human label, matching the preset names accepted by `FromStr`
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllTime => "All Time",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::ThisYear => "This Year",
            Self::Custom { .. } => "Custom Range",
        }
    }
}

fn parse_bound(which: &str, value: &str) -> ExpenseResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ExpenseError::InvalidDateRange(format!(
            "{} date '{}' is not a valid YYYY-MM-DD date",
            which, value
        ))
    })
}

impl FromStr for DateRange {
    type Err = ExpenseError;

    /// Parse a preset name. "custom" yields a range with no bounds yet.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "" | "all" | "alltime" => Ok(Self::AllTime),
            "today" => Ok(Self::Today),
            "week" | "thisweek" => Ok(Self::ThisWeek),
            "month" | "thismonth" => Ok(Self::ThisMonth),
            "year" | "thisyear" => Ok(Self::ThisYear),
            "custom" | "customrange" => Ok(Self::Custom {
                start: None,
                end: None,
            }),
            _ => Err(ExpenseError::InvalidDateRange(format!(
                "unknown date range '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { start, end } => {
                let show = |d: &Option<NaiveDate>| {
                    d.map(|d| d.to_string()).unwrap_or_else(|| "?".to_string())
                };
                write!(f, "{} ({} to {})", self.label(), show(start), show(end))
            }
            _ => f.write_str(self.label()),
        }
    }
}

/// Everything that narrows an expense listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text search in the `field:value AND ...` syntax
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub date_range: DateRange,

    #[serde(default)]
    pub mode_of_payment: ChoiceFilter,

    #[serde(default)]
    pub category: ChoiceFilter,
}

impl FilterCriteria {
    /// Criteria that match everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn mode_of_payment(mut self, mode: impl AsRef<str>) -> Self {
        self.mode_of_payment = ChoiceFilter::from_input(mode.as_ref());
        self
    }

    pub fn category(mut self, category: impl AsRef<str>) -> Self {
        self.category = ChoiceFilter::from_input(category.as_ref());
        self
    }

    /// Search text with surrounding whitespace removed, if any is left
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// True when no filter narrows the result set
    pub fn is_unfiltered(&self) -> bool {
        self.search_text().is_none()
            && self.date_range.is_all_time()
            && self.mode_of_payment.is_all()
            && self.category.is_all()
    }
}
