//! Date-range resolution
//!
//! Turns a [`DateRange`] selector into concrete calendar bounds relative to
//! a given "today".

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::BudgetMonth;

use super::criteria::DateRange;

/// Inclusive calendar bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateBounds {
    /// Midnight at the start of the first day
    pub fn start_of_range(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last second of the final day, so timestamps on `end` are included
    pub fn end_of_range(&self) -> NaiveDateTime {
        self.end.and_time(end_of_day())
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Resolve a selector to bounds.
///
/// `AllTime` resolves to `None`. A custom range with a missing bound, or
/// with its start after its end, fails with `InvalidDateRange`.
pub fn resolve_date_range(range: &DateRange, today: NaiveDate) -> ExpenseResult<Option<DateBounds>> {
    let bounds = match range {
        DateRange::AllTime => return Ok(None),
        DateRange::Today => DateBounds {
            start: today,
            end: today,
        },
        DateRange::ThisWeek => {
            let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            DateBounds {
                start: monday,
                end: monday + Duration::days(6),
            }
        }
        DateRange::ThisMonth => {
            let month = BudgetMonth::containing(today);
            DateBounds {
                start: month.start_date(),
                end: month.end_date(),
            }
        }
        DateRange::ThisYear => DateBounds {
            start: today.with_ordinal(1).unwrap_or(today),
            end: NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
        },
        DateRange::Custom { start, end } => {
            let (Some(start), Some(end)) = (start, end) else {
                return Err(ExpenseError::InvalidDateRange(
                    "custom range needs both a start and an end date".into(),
                ));
            };
            if start > end {
                return Err(ExpenseError::InvalidDateRange(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
            DateBounds {
                start: *start,
                end: *end,
            }
        }
    };

    Ok(Some(bounds))
}
