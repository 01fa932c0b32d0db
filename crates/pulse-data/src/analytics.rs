//! Activity, churn, activation and conversion-funnel metrics.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use pulse_core::models::{Event, Subscription, User};
use pulse_core::time_utils::month_start;
use serde::Serialize;

// ── Active users ──────────────────────────────────────────────────────────────

/// Distinct active users on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActiveUsers {
    pub date: NaiveDate,
    pub dau: u64,
}

/// Distinct active users in one calendar month, keyed by its first day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyActiveUsers {
    pub month: NaiveDate,
    pub mau: u64,
}

/// One row per date with at least one event, ascending by date.
pub fn daily_active_users(events: &[Event]) -> Vec<DailyActiveUsers> {
    distinct_users_by_period(events, |e| e.date())
        .into_iter()
        .map(|(date, users)| DailyActiveUsers {
            date,
            dau: users.len() as u64,
        })
        .collect()
}

/// One row per month with at least one event, ascending by month.
pub fn monthly_active_users(events: &[Event]) -> Vec<MonthlyActiveUsers> {
    distinct_users_by_period(events, |e| month_start(e.date()))
        .into_iter()
        .map(|(month, users)| MonthlyActiveUsers {
            month,
            mau: users.len() as u64,
        })
        .collect()
}

/// Group events by `key_fn` and collect the distinct user ids per key.
fn distinct_users_by_period<'a>(
    events: &'a [Event],
    key_fn: impl Fn(&Event) -> NaiveDate,
) -> BTreeMap<NaiveDate, HashSet<&'a str>> {
    let mut map: BTreeMap<NaiveDate, HashSet<&'a str>> = BTreeMap::new();
    for event in events {
        map.entry(key_fn(event))
            .or_default()
            .insert(event.user_id.as_str());
    }
    map
}

// ── Churn & activation ────────────────────────────────────────────────────────

/// Share of subscription rows flagged as churned.
///
/// The rate is over rows, not users: a user with three subscription rows
/// contributes three times. `0.0` for an empty table.
pub fn churn_rate(subscriptions: &[Subscription]) -> f64 {
    if subscriptions.is_empty() {
        return 0.0;
    }
    let churned = subscriptions.iter().filter(|s| s.is_churned).count();
    churned as f64 / subscriptions.len() as f64
}

/// Share of users with at least one key action.
///
/// Key-action events whose user is not in `users` are ignored, so the rate
/// stays within `[0, 1]`. `0.0` when there are no users.
pub fn activation_rate(users: &[User], events: &[Event]) -> f64 {
    if users.is_empty() {
        return 0.0;
    }
    activated_users(users, events).len() as f64 / users.len() as f64
}

/// Distinct ids of `users` that performed at least one key action.
pub fn activated_users<'a>(users: &'a [User], events: &[Event]) -> HashSet<&'a str> {
    let key_actors: HashSet<&str> = events
        .iter()
        .filter(|e| e.event_type.is_key_action())
        .map(|e| e.user_id.as_str())
        .collect();
    users
        .iter()
        .map(|u| u.user_id.as_str())
        .filter(|id| key_actors.contains(id))
        .collect()
}

// ── Conversion funnel ─────────────────────────────────────────────────────────

/// Funnel stages in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunnelStage {
    #[serde(rename = "Signed up")]
    SignedUp,
    #[serde(rename = "Activated")]
    Activated,
    #[serde(rename = "Paying")]
    Paying,
    #[serde(rename = "Retained")]
    Retained,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 4] = [
        FunnelStage::SignedUp,
        FunnelStage::Activated,
        FunnelStage::Paying,
        FunnelStage::Retained,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SignedUp => "Signed up",
            Self::Activated => "Activated",
            Self::Paying => "Paying",
            Self::Retained => "Retained",
        }
    }
}

/// User count at one funnel stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStep {
    pub step: FunnelStage,
    pub count: u64,
}

/// Signed up → Activated → Paying → Retained.
///
/// Every stage is counted over the whole filtered population on its own; a
/// paying user is counted as paying whether or not they activated, so later
/// stages can exceed earlier ones.
///
/// * Signed up: rows in `users`.
/// * Activated: users with a key action, as in [`activation_rate`].
/// * Paying: distinct users owning a subscription row with `mrr > 0`.
/// * Retained: distinct users owning a non-churned row with `mrr > 0`.
pub fn conversion_funnel(
    users: &[User],
    events: &[Event],
    subscriptions: &[Subscription],
) -> Vec<FunnelStep> {
    let paying: HashSet<&str> = subscriptions
        .iter()
        .filter(|s| s.is_paying())
        .map(|s| s.user_id.as_str())
        .collect();
    let retained: HashSet<&str> = subscriptions
        .iter()
        .filter(|s| s.is_paying() && !s.is_churned)
        .map(|s| s.user_id.as_str())
        .collect();

    let counts = [
        users.len() as u64,
        activated_users(users, events).len() as u64,
        paying.len() as u64,
        retained.len() as u64,
    ];

    FunnelStage::ALL
        .into_iter()
        .zip(counts)
        .map(|(step, count)| FunnelStep { step, count })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
