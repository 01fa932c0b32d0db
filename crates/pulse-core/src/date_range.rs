//! Inclusive calendar date ranges used by the date filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PulseError, Result};
use crate::models::Tables;
use crate::time_utils::month_start;

/// An inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; fails when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(PulseError::InvalidDateRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether `date` lies inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The range with both endpoints truncated to the first of their month.
    ///
    /// Revenue rows are month-keyed, so they are matched against this.
    pub fn month_bounds(&self) -> (NaiveDate, NaiveDate) {
        (month_start(self.start), month_start(self.end))
    }

    /// Number of calendar days covered, both endpoints included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The smallest range covering every date found in `tables`: signup
    /// dates, subscription start and end dates, event dates and revenue
    /// months. `None` when the tables hold no dates at all.
    pub fn observed(tables: &Tables) -> Option<Self> {
        let dates = tables
            .users
            .iter()
            .map(|u| u.signup_date)
            .chain(tables.subscriptions.iter().flat_map(|s| {
                std::iter::once(s.subscription_start_date).chain(s.subscription_end_date)
            }))
            .chain(tables.events.iter().map(|e| e.date()))
            .chain(tables.revenue.iter().map(|r| r.month));

        let (start, end) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| {
            Some(match acc {
                None => (d, d),
                Some((lo, hi)) => (lo.min(d), hi.max(d)),
            })
        })?;
        Some(Self { start, end })
    }

    /// Span of event dates only, the default selection of the date picker.
    pub fn event_span(tables: &Tables) -> Option<Self> {
        let start = tables.events.iter().map(|e| e.date()).min()?;
        let end = tables.events.iter().map(|e| e.date()).max()?;
        Some(Self { start, end })
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
