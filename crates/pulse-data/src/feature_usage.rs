//! Feature usage breakdowns over feature-scoped events.

use std::collections::{BTreeMap, HashMap};

use pulse_core::models::{Event, Subscription};
use serde::Serialize;

/// Number of rows returned by [`top_features`] when the caller has no
/// preference.
pub const DEFAULT_TOP_FEATURES: usize = 10;

/// Event count for one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureUsage {
    pub feature_name: String,
    pub event_count: u64,
}

/// Event count for one (plan, feature) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanFeatureUsage {
    pub plan_type: String,
    pub feature_name: String,
    pub event_count: u64,
}

/// Count events per feature, most used first.
///
/// Events without a feature name are ignored. Features with equal counts
/// are ordered by name.
pub fn feature_usage_counts(events: &[Event]) -> Vec<FeatureUsage> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for feature in events.iter().filter_map(|e| e.feature_name.as_deref()) {
        *counts.entry(feature).or_default() += 1;
    }

    let mut rows: Vec<FeatureUsage> = counts
        .into_iter()
        .map(|(feature_name, event_count)| FeatureUsage {
            feature_name: feature_name.to_string(),
            event_count,
        })
        .collect();
    // Stable sort keeps the name order among ties.
    rows.sort_by(|a, b| b.event_count.cmp(&a.event_count));
    rows
}

/// The first `n` rows of [`feature_usage_counts`].
pub fn top_features(events: &[Event], n: usize) -> Vec<FeatureUsage> {
    let mut rows = feature_usage_counts(events);
    rows.truncate(n);
    rows
}

/// Each user's current plan: the plan of their subscription row with the
/// latest start date.
///
/// Rows are ordered by start date with a stable sort and the last row per
/// user wins, so among rows sharing the latest start date the one appearing
/// last in `subscriptions` is chosen.
pub fn latest_plans(subscriptions: &[Subscription]) -> HashMap<&str, &str> {
    let mut ordered: Vec<&Subscription> = subscriptions.iter().collect();
    ordered.sort_by_key(|s| s.subscription_start_date);

    let mut plans: HashMap<&str, &str> = HashMap::new();
    for sub in ordered {
        plans.insert(sub.user_id.as_str(), sub.plan_type.as_str());
    }
    plans
}

/// Count feature events per (current plan, feature), ordered by plan then
/// feature name.
///
/// Events of users without any subscription row are left out.
pub fn feature_usage_by_plan(
    events: &[Event],
    subscriptions: &[Subscription],
) -> Vec<PlanFeatureUsage> {
    let plans = latest_plans(subscriptions);

    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for event in events {
        let Some(feature) = event.feature_name.as_deref() else {
            continue;
        };
        let Some(plan) = plans.get(event.user_id.as_str()) else {
            continue;
        };
        *counts.entry((*plan, feature)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((plan_type, feature_name), event_count)| PlanFeatureUsage {
            plan_type: plan_type.to_string(),
            feature_name: feature_name.to_string(),
            event_count,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
