//! Revenue metrics: MRR series, growth, ARPU and lifetime value.
//!
//! The revenue table is month keyed. ARPU and LTV bring subscriptions in
//! through their `mrr` column; neither joins individual revenue rows to
//! subscription rows.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use pulse_core::models::{RevenueRecord, Subscription};
use pulse_core::time_utils::{month_end, month_start, now_naive, start_of_day};
use serde::Serialize;

/// Length of one lifetime "month" in the LTV estimate.
const LTV_MONTH_SECONDS: f64 = 30.0 * 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMrr {
    pub month: NaiveDate,
    pub mrr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MrrGrowth {
    pub month: NaiveDate,
    pub net_mrr_growth: f64,
}

/// Average revenue per active user for one revenue month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyArpu {
    pub month: NaiveDate,
    pub arpu: f64,
    /// Distinct users with a subscription overlapping the month.
    pub active_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnMrr {
    pub month: NaiveDate,
    pub churn_mrr: f64,
}

/// Revenue rows ordered by month. The sort is stable.
fn by_month(revenue: &[RevenueRecord]) -> Vec<&RevenueRecord> {
    let mut rows: Vec<&RevenueRecord> = revenue.iter().collect();
    rows.sort_by_key(|r| r.month);
    rows
}

/// (month, mrr) ascending by month.
pub fn monthly_mrr(revenue: &[RevenueRecord]) -> Vec<MonthlyMrr> {
    by_month(revenue)
        .into_iter()
        .map(|r| MonthlyMrr {
            month: r.month,
            mrr: r.mrr,
        })
        .collect()
}

/// Month-over-month change in MRR. The first month is compared against zero,
/// so its growth equals its own MRR.
pub fn net_mrr_growth(revenue: &[RevenueRecord]) -> Vec<MrrGrowth> {
    let mut previous = 0.0;
    by_month(revenue)
        .into_iter()
        .map(|r| {
            let growth = r.mrr - previous;
            previous = r.mrr;
            MrrGrowth {
                month: r.month,
                net_mrr_growth: growth,
            }
        })
        .collect()
}

/// (month, churn_mrr) ascending by month.
pub fn churn_mrr_trend(revenue: &[RevenueRecord]) -> Vec<ChurnMrr> {
    by_month(revenue)
        .into_iter()
        .map(|r| ChurnMrr {
            month: r.month,
            churn_mrr: r.churn_mrr,
        })
        .collect()
}

/// MRR of the most recent revenue month, `0.0` without revenue rows.
pub fn latest_mrr(revenue: &[RevenueRecord]) -> f64 {
    by_month(revenue).last().map_or(0.0, |r| r.mrr)
}

/// ARPU per revenue month.
///
/// A user is active in a month when any of their subscriptions overlaps the
/// month's first and last calendar days. Months without active users report
/// an ARPU of `0.0`.
pub fn arpu(subscriptions: &[Subscription], revenue: &[RevenueRecord]) -> Vec<MonthlyArpu> {
    by_month(revenue)
        .into_iter()
        .map(|r| {
            let first = month_start(r.month);
            let last = month_end(r.month);
            let active: HashSet<&str> = subscriptions
                .iter()
                .filter(|s| s.overlaps(first, last))
                .map(|s| s.user_id.as_str())
                .collect();
            let active_users = active.len() as u64;
            let arpu = if active_users == 0 {
                0.0
            } else {
                r.mrr / active_users as f64
            };
            MonthlyArpu {
                month: r.month,
                arpu,
                active_users,
            }
        })
        .collect()
}

/// Estimated lifetime value per subscription, measured against the current
/// UTC time for subscriptions that are still open.
pub fn ltv_estimate(subscriptions: &[Subscription], revenue: &[RevenueRecord]) -> f64 {
    ltv_estimate_at(subscriptions, revenue, now_naive())
}

/// Estimated lifetime value: average lifetime across subscription rows, in
/// 30-day months, times the average `mrr` across the same rows.
///
/// Open subscriptions run until `now`. Returns `0.0` when there are no
/// subscriptions. The revenue table does not enter the estimate.
pub fn ltv_estimate_at(
    subscriptions: &[Subscription],
    _revenue: &[RevenueRecord],
    now: NaiveDateTime,
) -> f64 {
    if subscriptions.is_empty() {
        return 0.0;
    }
    let rows = subscriptions.len() as f64;

    let total_lifetime: f64 = subscriptions
        .iter()
        .map(|s| {
            let end = s.subscription_end_date.map_or(now, start_of_day);
            let seconds = (end - start_of_day(s.subscription_start_date)).num_seconds();
            seconds as f64 / LTV_MONTH_SECONDS
        })
        .sum();
    let total_mrr: f64 = subscriptions.iter().map(|s| s.mrr).sum();

    (total_lifetime / rows) * (total_mrr / rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
