//! Signup cohorts and the cohort retention matrix.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use pulse_core::models::{Event, User};
use pulse_core::time_utils::{month_start, months_between};
use serde::Serialize;
use tracing::debug;

/// Users who signed up in the same calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupCohort {
    /// First day of the signup month.
    pub cohort_month: NaiveDate,
    /// Distinct users in the cohort.
    pub num_users: u64,
}

/// Group users by signup month, ascending.
pub fn build_signup_cohorts(users: &[User]) -> Vec<SignupCohort> {
    cohort_members(users)
        .into_iter()
        .map(|(cohort_month, members)| SignupCohort {
            cohort_month,
            num_users: members.len() as u64,
        })
        .collect()
}

fn cohort_members(users: &[User]) -> BTreeMap<NaiveDate, HashSet<&str>> {
    let mut cohorts: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
    for user in users {
        cohorts
            .entry(month_start(user.signup_date))
            .or_default()
            .insert(user.user_id.as_str());
    }
    cohorts
}

// ── RetentionMatrix ───────────────────────────────────────────────────────────

/// One cohort's retention fractions, aligned with [`RetentionMatrix::offsets`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionRow {
    pub signup_month: NaiveDate,
    pub values: Vec<f64>,
}

/// Share of each signup cohort active N months after signup.
///
/// Rows are the cohorts with at least one qualifying event, in chronological
/// order. Columns are the month offsets observed in any cohort, ascending,
/// labelled `m+N`. A cell with no active users holds `0.0`; there is no
/// separate marker for offsets a cohort has not reached yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetentionMatrix {
    pub offsets: Vec<u32>,
    pub columns: Vec<String>,
    pub rows: Vec<RetentionRow>,
}

impl RetentionMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Retention of `signup_month` at `offset`, or `None` when the matrix has
    /// no such row or column.
    pub fn get(&self, signup_month: NaiveDate, offset: u32) -> Option<f64> {
        let col = self.offsets.iter().position(|o| *o == offset)?;
        self.rows
            .iter()
            .find(|r| r.signup_month == signup_month)
            .map(|r| r.values[col])
    }

    /// Look a cell up by its column label, e.g. `"m+2"`.
    pub fn get_by_label(&self, signup_month: NaiveDate, label: &str) -> Option<f64> {
        let offset = label.strip_prefix("m+")?.parse().ok()?;
        self.get(signup_month, offset)
    }
}

/// Build the cohort retention matrix.
///
/// For every event, the offset is the number of calendar months between the
/// user's signup month and the event's month. Events before signup and
/// events of users missing from `users` are ignored. Each cell is the number
/// of distinct active users at that offset divided by the cohort size.
pub fn cohort_retention_matrix(users: &[User], events: &[Event]) -> RetentionMatrix {
    let mut signup_month: HashMap<&str, NaiveDate> = HashMap::new();
    for user in users {
        signup_month
            .entry(user.user_id.as_str())
            .or_insert_with(|| month_start(user.signup_date));
    }
    let cohort_sizes: HashMap<NaiveDate, usize> = cohort_members(users)
        .into_iter()
        .map(|(month, members)| (month, members.len()))
        .collect();

    let mut active: BTreeMap<(NaiveDate, u32), HashSet<&str>> = BTreeMap::new();
    let mut skipped = 0usize;
    for event in events {
        let Some(&cohort) = signup_month.get(event.user_id.as_str()) else {
            skipped += 1;
            continue;
        };
        let offset = months_between(cohort, event.date());
        if offset < 0 {
            skipped += 1;
            continue;
        }
        active
            .entry((cohort, offset as u32))
            .or_default()
            .insert(event.user_id.as_str());
    }
    if skipped > 0 {
        debug!("Retention matrix ignored {} events (unknown user or before signup)", skipped);
    }

    let offsets: Vec<u32> = active
        .keys()
        .map(|(_, offset)| *offset)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let cohorts: BTreeSet<NaiveDate> = active.keys().map(|(cohort, _)| *cohort).collect();

    let rows = cohorts
        .into_iter()
        .map(|cohort| {
            let size = cohort_sizes.get(&cohort).copied().unwrap_or(0);
            let values = offsets
                .iter()
                .map(|offset| match active.get(&(cohort, *offset)) {
                    Some(retained) if size > 0 => retained.len() as f64 / size as f64,
                    _ => 0.0,
                })
                .collect();
            RetentionRow {
                signup_month: cohort,
                values,
            }
        })
        .collect();

    RetentionMatrix {
        columns: offsets.iter().map(|o| format!("m+{}", o)).collect(),
        offsets,
        rows,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
