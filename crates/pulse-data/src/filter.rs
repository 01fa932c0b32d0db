//! Dashboard filters over the four tables.
//!
//! Filtering never touches the input tables; [`apply_filters`] returns fresh
//! copies of the surviving rows.

use std::collections::{BTreeSet, HashSet};

use pulse_core::date_range::DateRange;
use pulse_core::models::Tables;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── FilterSelection ───────────────────────────────────────────────────────────

/// The user's filter choices. An empty list places no constraint on its
/// dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Countries kept in the users table.
    pub countries: Vec<String>,
    /// Plans kept in the subscriptions table.
    pub plans: Vec<String>,
    /// Acquisition channels kept in the users table.
    pub channels: Vec<String>,
    /// Optional inclusive date window.
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    /// A selection that lets everything through.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plans<I, S>(mut self, plans: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plans = plans.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// True when no dimension is constrained.
    pub fn is_pass_through(&self) -> bool {
        self.countries.is_empty()
            && self.plans.is_empty()
            && self.channels.is_empty()
            && self.date_range.is_none()
    }
}

// ── FilterOptions ─────────────────────────────────────────────────────────────

/// Values offered by the filter controls for a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct user countries, sorted.
    pub countries: Vec<String>,
    /// Distinct subscription plans, sorted.
    pub plans: Vec<String>,
    /// Distinct acquisition channels, sorted.
    pub channels: Vec<String>,
    /// First to last event date; the date picker's default window.
    pub date_range: Option<DateRange>,
}

impl FilterOptions {
    pub fn from_tables(tables: &Tables) -> Self {
        Self {
            countries: sorted_distinct(tables.users.iter().map(|u| u.country.as_str())),
            plans: sorted_distinct(tables.subscriptions.iter().map(|s| s.plan_type.as_str())),
            channels: sorted_distinct(
                tables
                    .users
                    .iter()
                    .map(|u| u.acquisition_channel.as_str()),
            ),
            date_range: DateRange::event_span(tables),
        }
    }

    /// The selection the dashboard starts with: every option picked and
    /// the event date span as the window.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection {
            countries: self.countries.clone(),
            plans: self.plans.clone(),
            channels: self.channels.clone(),
            date_range: self.date_range,
        }
    }
}

// ── apply_filters ─────────────────────────────────────────────────────────────

/// Apply `selection` to `tables`.
///
/// 1. Users are kept by country and acquisition channel.
/// 2. Subscriptions are kept by plan.
/// 3. With a date range, events are kept when their date falls inside it,
///    subscriptions when they overlap it and revenue rows when their month
///    lies between the months of the range endpoints.
/// 4. Subscriptions and events are finally restricted to the surviving
///    users.
pub fn apply_filters(tables: &Tables, selection: &FilterSelection) -> Tables {
    let countries = to_set(&selection.countries);
    let channels = to_set(&selection.channels);
    let plans = to_set(&selection.plans);

    let users: Vec<_> = tables
        .users
        .iter()
        .filter(|u| selected(&countries, &u.country))
        .filter(|u| selected(&channels, &u.acquisition_channel))
        .cloned()
        .collect();

    let user_ids: HashSet<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
    let range = selection.date_range;
    let month_bounds = range.map(|r| r.month_bounds());

    let subscriptions: Vec<_> = tables
        .subscriptions
        .iter()
        .filter(|s| selected(&plans, &s.plan_type))
        .filter(|s| range.map_or(true, |r| s.overlaps(r.start, r.end)))
        .filter(|s| user_ids.contains(s.user_id.as_str()))
        .cloned()
        .collect();

    let events: Vec<_> = tables
        .events
        .iter()
        .filter(|e| range.map_or(true, |r| r.contains(e.date())))
        .filter(|e| user_ids.contains(e.user_id.as_str()))
        .cloned()
        .collect();

    let revenue: Vec<_> = tables
        .revenue
        .iter()
        .filter(|r| month_bounds.map_or(true, |(lo, hi)| lo <= r.month && r.month <= hi))
        .cloned()
        .collect();

    let filtered = Tables::new(users, subscriptions, events, revenue);
    let before = tables.row_counts();
    let after = filtered.row_counts();
    debug!(
        "Filter kept users {}/{}, subscriptions {}/{}, events {}/{}, revenue {}/{}",
        after.users,
        before.users,
        after.subscriptions,
        before.subscriptions,
        after.events,
        before.events,
        after.revenue,
        before.revenue
    );

    filtered
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// `None` means "no constraint".
fn to_set(values: &[String]) -> Option<HashSet<&str>> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(String::as_str).collect())
    }
}

fn selected(set: &Option<HashSet<&str>>, value: &str) -> bool {
    set.as_ref().map_or(true, |s| s.contains(value))
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
