//! Plain-text rendering of a [`DashboardReport`].
//!
//! One section per computed page, with aligned two-column tables.

use std::fmt::Write;

use pulse_core::formatting::{format_count, format_currency, format_number, format_rate, percentage};
use pulse_data::analysis::{
    CohortsPage, DashboardReport, FeaturesPage, OverviewPage, RevenuePage,
};

/// Number of most recent days listed in the DAU table.
const RECENT_DAYS: usize = 14;

/// Render every page present in `report`, followed by a footer line.
pub fn render_report(report: &DashboardReport) -> String {
    let mut out = String::new();

    if let Some(page) = &report.overview {
        render_overview(&mut out, page);
    }
    if let Some(page) = &report.cohorts {
        render_cohorts(&mut out, page);
    }
    if let Some(page) = &report.features {
        render_features(&mut out, page);
    }
    if let Some(page) = &report.revenue {
        render_revenue(&mut out, page);
    }

    let meta = &report.metadata;
    if let Some(range) = &meta.date_range {
        let _ = writeln!(
            out,
            "Date filter: {} ({} days)",
            range,
            format_count(range.days() as u64)
        );
    }
    let _ = writeln!(
        out,
        "{} users, {} subscriptions, {} events, {} revenue months after filtering ({:.3}s)",
        format_count(meta.rows_after_filter.users as u64),
        format_count(meta.rows_after_filter.subscriptions as u64),
        format_count(meta.rows_after_filter.events as u64),
        format_count(meta.rows_after_filter.revenue as u64),
        meta.compute_time_seconds
    );
    out
}

// ── Pages ─────────────────────────────────────────────────────────────────────

fn render_overview(out: &mut String, page: &OverviewPage) {
    heading(out, "Overview");
    let _ = writeln!(out, "  Total users      {}", format_count(page.total_users));
    let _ = writeln!(out, "  Churn rate       {}", format_rate(page.churn_rate));
    let _ = writeln!(out, "  Activation rate  {}", format_rate(page.activation_rate));
    let _ = writeln!(out, "  Latest MRR       {}", format_currency(page.latest_mrr, 0));
    out.push('\n');

    let signed_up = page.funnel.first().map_or(0, |s| s.count) as f64;
    let rows: Vec<(String, String)> = page
        .funnel
        .iter()
        .map(|s| {
            let share = percentage(s.count as f64, signed_up, 1);
            (
                s.step.label().to_string(),
                format!("{} ({}%)", format_count(s.count), format_number(share, 1)),
            )
        })
        .collect();
    table(out, "Funnel", &rows);

    let rows: Vec<(String, String)> = page
        .monthly_active_users
        .iter()
        .map(|m| (m.month.format("%Y-%m").to_string(), format_count(m.mau)))
        .collect();
    table(out, "Monthly active users", &rows);

    let skip = page.daily_active_users.len().saturating_sub(RECENT_DAYS);
    let rows: Vec<(String, String)> = page.daily_active_users[skip..]
        .iter()
        .map(|d| (d.date.to_string(), format_count(d.dau)))
        .collect();
    table(out, "Daily active users (recent)", &rows);
}

fn render_cohorts(out: &mut String, page: &CohortsPage) {
    heading(out, "Cohorts");

    let rows: Vec<(String, String)> = page
        .signup_cohorts
        .iter()
        .map(|c| (c.cohort_month.format("%Y-%m").to_string(), format_count(c.num_users)))
        .collect();
    table(out, "Signups per month", &rows);

    let matrix = &page.retention;
    if matrix.is_empty() {
        let _ = writeln!(out, "  Retention: no activity\n");
        return;
    }
    let _ = write!(out, "  Retention  {:>8}", "cohort");
    for column in &matrix.columns {
        let _ = write!(out, " {:>7}", column);
    }
    out.push('\n');
    for row in &matrix.rows {
        let _ = write!(out, "             {:>8}", row.signup_month.format("%Y-%m"));
        for value in &row.values {
            let _ = write!(out, " {:>7}", format_rate(*value));
        }
        out.push('\n');
    }
    out.push('\n');
}

fn render_features(out: &mut String, page: &FeaturesPage) {
    heading(out, "Feature usage");

    let rows: Vec<(String, String)> = page
        .top_features
        .iter()
        .map(|f| (f.feature_name.clone(), format_count(f.event_count)))
        .collect();
    table(out, "Top features", &rows);

    let rows: Vec<(String, String)> = page
        .usage_by_plan
        .iter()
        .map(|r| {
            (
                format!("{} / {}", r.plan_type, r.feature_name),
                format_count(r.event_count),
            )
        })
        .collect();
    table(out, "By plan", &rows);
}

fn render_revenue(out: &mut String, page: &RevenuePage) {
    heading(out, "Revenue");
    let _ = writeln!(out, "  Estimated LTV    {}\n", format_currency(page.ltv_estimate, 0));

    let rows: Vec<(String, String)> = page
        .monthly_mrr
        .iter()
        .zip(&page.net_mrr_growth)
        .map(|(m, g)| {
            (
                m.month.format("%Y-%m").to_string(),
                format!(
                    "{} ({})",
                    format_currency(m.mrr, 0),
                    signed_currency(g.net_mrr_growth)
                ),
            )
        })
        .collect();
    table(out, "MRR (net growth)", &rows);

    let rows: Vec<(String, String)> = page
        .churn_mrr
        .iter()
        .map(|c| (c.month.format("%Y-%m").to_string(), format_currency(c.churn_mrr, 0)))
        .collect();
    table(out, "Churned MRR", &rows);

    let rows: Vec<(String, String)> = page
        .arpu
        .iter()
        .map(|a| {
            (
                a.month.format("%Y-%m").to_string(),
                format!(
                    "{} over {} users",
                    format_currency(a.arpu, 2),
                    format_count(a.active_users)
                ),
            )
        })
        .collect();
    table(out, "ARPU", &rows);
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}\n{}", title, "=".repeat(title.len()));
}

/// Two-column table with the first column padded to its widest label.
fn table(out: &mut String, title: &str, rows: &[(String, String)]) {
    let _ = writeln!(out, "  {}", title);
    if rows.is_empty() {
        let _ = writeln!(out, "    (no data)\n");
        return;
    }
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(out, "    {:<width$}  {}", label, value, width = width);
    }
    out.push('\n');
}

fn signed_currency(amount: f64) -> String {
    let body = format_currency(amount, 0);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
