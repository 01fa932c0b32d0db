//! Dashboard pipeline for SaaS Pulse.
//!
//! Filters the loaded tables once and runs the metric functions behind each
//! dashboard page, returning a [`DashboardReport`] ready for rendering.

use std::fmt;
use std::time::Instant;

use chrono::NaiveDateTime;
use pulse_core::date_range::DateRange;
use pulse_core::error::{PulseError, Result};
use pulse_core::models::{TableCounts, Tables};
use pulse_core::time_utils::now_naive;
use serde::Serialize;
use tracing::info;

use crate::analytics::{
    activation_rate, churn_rate, conversion_funnel, daily_active_users, monthly_active_users,
    DailyActiveUsers, FunnelStep, MonthlyActiveUsers,
};
use crate::cohorts::{build_signup_cohorts, cohort_retention_matrix, RetentionMatrix, SignupCohort};
use crate::feature_usage::{
    feature_usage_by_plan, feature_usage_counts, top_features, FeatureUsage, PlanFeatureUsage,
};
use crate::filter::{apply_filters, FilterSelection};
use crate::revenue::{
    arpu, churn_mrr_trend, latest_mrr, ltv_estimate_at, monthly_mrr, net_mrr_growth, ChurnMrr,
    MonthlyArpu, MonthlyMrr, MrrGrowth,
};

// ── Pages ─────────────────────────────────────────────────────────────────────

/// One page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPage {
    Overview,
    Cohorts,
    Features,
    Revenue,
}

impl DashboardPage {
    pub const ALL: [DashboardPage; 4] = [
        DashboardPage::Overview,
        DashboardPage::Cohorts,
        DashboardPage::Features,
        DashboardPage::Revenue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Cohorts => "cohorts",
            Self::Features => "features",
            Self::Revenue => "revenue",
        }
    }

    /// Pages selected by a `--page` value; `"all"` selects every page.
    pub fn select(name: &str) -> Result<Vec<DashboardPage>> {
        let name = name.trim().to_lowercase();
        if name == "all" {
            return Ok(Self::ALL.to_vec());
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .map(|p| vec![p])
            .ok_or_else(|| PulseError::Config(format!("unknown dashboard page: {}", name)))
    }
}

impl fmt::Display for DashboardPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPage {
    pub total_users: u64,
    /// Fraction of subscription rows that churned.
    pub churn_rate: f64,
    /// Fraction of users with a key action.
    pub activation_rate: f64,
    pub latest_mrr: f64,
    pub daily_active_users: Vec<DailyActiveUsers>,
    pub monthly_active_users: Vec<MonthlyActiveUsers>,
    pub funnel: Vec<FunnelStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortsPage {
    pub signup_cohorts: Vec<SignupCohort>,
    pub retention: RetentionMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturesPage {
    pub usage: Vec<FeatureUsage>,
    pub usage_by_plan: Vec<PlanFeatureUsage>,
    pub top_features: Vec<FeatureUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePage {
    pub monthly_mrr: Vec<MonthlyMrr>,
    pub net_mrr_growth: Vec<MrrGrowth>,
    pub churn_mrr: Vec<ChurnMrr>,
    pub arpu: Vec<MonthlyArpu>,
    pub ltv_estimate: f64,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Metadata produced alongside the dashboard pages.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// RFC 3339 timestamp when this report was generated.
    pub generated_at: String,
    pub pages: Vec<DashboardPage>,
    /// False when the selection kept every row.
    pub filtered: bool,
    /// The date window of the selection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub rows_loaded: TableCounts,
    pub rows_after_filter: TableCounts,
    /// Wall-clock seconds spent filtering and computing metrics.
    pub compute_time_seconds: f64,
}

/// The complete output of [`DashboardReport::build`].
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<OverviewPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohorts: Option<CohortsPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeaturesPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenuePage>,
}

impl DashboardReport {
    /// Filter `tables` with `selection` and compute the requested pages.
    pub fn build(
        tables: &Tables,
        selection: &FilterSelection,
        pages: &[DashboardPage],
        top_n: usize,
    ) -> Self {
        Self::build_at(tables, selection, pages, top_n, now_naive())
    }

    /// Every page, with the default top-features length.
    pub fn build_all(tables: &Tables, selection: &FilterSelection) -> Self {
        Self::build(
            tables,
            selection,
            &DashboardPage::ALL,
            crate::feature_usage::DEFAULT_TOP_FEATURES,
        )
    }

    /// [`build`](Self::build) with a fixed clock. `now` closes open
    /// subscriptions in the LTV estimate and stamps the metadata.
    pub fn build_at(
        tables: &Tables,
        selection: &FilterSelection,
        pages: &[DashboardPage],
        top_n: usize,
        now: NaiveDateTime,
    ) -> Self {
        let started = Instant::now();

        let filtered = apply_filters(tables, selection);
        let rows_loaded = tables.row_counts();
        let rows_after_filter = filtered.row_counts();

        let wants = |page: DashboardPage| pages.contains(&page);

        let overview = wants(DashboardPage::Overview).then(|| overview_page(&filtered));
        let cohorts = wants(DashboardPage::Cohorts).then(|| CohortsPage {
            signup_cohorts: build_signup_cohorts(&filtered.users),
            retention: cohort_retention_matrix(&filtered.users, &filtered.events),
        });
        let features = wants(DashboardPage::Features).then(|| features_page(&filtered, top_n));
        let revenue = wants(DashboardPage::Revenue).then(|| RevenuePage {
            monthly_mrr: monthly_mrr(&filtered.revenue),
            net_mrr_growth: net_mrr_growth(&filtered.revenue),
            churn_mrr: churn_mrr_trend(&filtered.revenue),
            arpu: arpu(&filtered.subscriptions, &filtered.revenue),
            ltv_estimate: ltv_estimate_at(&filtered.subscriptions, &filtered.revenue, now),
        });

        let compute_time = started.elapsed().as_secs_f64();
        info!(
            "Computed {} page(s) in {:.3}s",
            pages.len(),
            compute_time
        );

        DashboardReport {
            metadata: ReportMetadata {
                generated_at: now.and_utc().to_rfc3339(),
                pages: pages.to_vec(),
                filtered: rows_loaded != rows_after_filter,
                date_range: selection.date_range,
                rows_loaded,
                rows_after_filter,
                compute_time_seconds: compute_time,
            },
            overview,
            cohorts,
            features,
            revenue,
        }
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn overview_page(tables: &Tables) -> OverviewPage {
    OverviewPage {
        total_users: tables.users.len() as u64,
        churn_rate: churn_rate(&tables.subscriptions),
        activation_rate: activation_rate(&tables.users, &tables.events),
        latest_mrr: latest_mrr(&tables.revenue),
        daily_active_users: daily_active_users(&tables.events),
        monthly_active_users: monthly_active_users(&tables.events),
        funnel: conversion_funnel(&tables.users, &tables.events, &tables.subscriptions),
    }
}

fn features_page(tables: &Tables, top_n: usize) -> FeaturesPage {
    FeaturesPage {
        usage: feature_usage_counts(&tables.events),
        usage_by_plan: feature_usage_by_plan(&tables.events, &tables.subscriptions),
        top_features: top_features(&tables.events, top_n),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
