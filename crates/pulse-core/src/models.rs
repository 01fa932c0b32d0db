use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time_utils::now_naive;

/// A registered account, keyed by `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier, e.g. `"U00042"`.
    pub user_id: String,
    /// ISO country code the user signed up from.
    pub country: String,
    /// Calendar date of signup.
    pub signup_date: NaiveDate,
    /// Marketing channel that acquired the user (`ads`, `organic`, ...).
    pub acquisition_channel: String,
    /// Plan chosen at signup.
    pub initial_plan: String,
}

/// One subscription period of a user. A user may own several over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Owning user.
    pub user_id: String,
    /// First day the subscription was active.
    pub subscription_start_date: NaiveDate,
    /// Last day of the subscription; `None` while it is still running.
    #[serde(default)]
    pub subscription_end_date: Option<NaiveDate>,
    /// Plan name (`free`, `pro`, `enterprise`, ...).
    pub plan_type: String,
    /// Whether the subscription was terminated.
    #[serde(default)]
    pub is_churned: bool,
    /// Monthly recurring revenue contributed by this subscription.
    #[serde(default)]
    pub mrr: f64,
}

impl Subscription {
    /// Whether the subscription was active at any point in `[from, to]`.
    ///
    /// Open-ended subscriptions count as active for every range that starts
    /// on or after their start date.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.subscription_start_date <= to
            && self.subscription_end_date.map_or(true, |end| end >= from)
    }

    /// A churned subscription must carry an end date that is not in the
    /// future.
    pub fn is_consistent(&self) -> bool {
        self.is_consistent_at(now_naive().date())
    }

    /// [`is_consistent`](Self::is_consistent) against a fixed `today`.
    pub fn is_consistent_at(&self, today: NaiveDate) -> bool {
        !self.is_churned || self.subscription_end_date.is_some_and(|end| end <= today)
    }

    /// Paying subscriptions have a strictly positive MRR.
    pub fn is_paying(&self) -> bool {
        self.mrr > 0.0
    }
}

/// Fixed set of product events the tracker emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Login,
    SessionStart,
    FeatureOpen,
    CreateProject,
    ShareItem,
    DownloadReport,
    SessionEnd,
}

impl EventType {
    /// Every event type, in tracker order.
    pub const ALL: [EventType; 7] = [
        EventType::Login,
        EventType::SessionStart,
        EventType::FeatureOpen,
        EventType::CreateProject,
        EventType::ShareItem,
        EventType::DownloadReport,
        EventType::SessionEnd,
    ];

    /// Wire name of the event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SessionStart => "session_start",
            Self::FeatureOpen => "feature_open",
            Self::CreateProject => "create_project",
            Self::ShareItem => "share_item",
            Self::DownloadReport => "download_report",
            Self::SessionEnd => "session_end",
        }
    }

    /// Parse a wire name; returns `None` for anything outside the enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Key actions mark a user as activated.
    pub fn is_key_action(&self) -> bool {
        matches!(
            self,
            Self::CreateProject | Self::ShareItem | Self::DownloadReport
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracked product event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub event_id: String,
    /// User who generated the event.
    pub user_id: String,
    /// What happened.
    pub event_type: EventType,
    /// When it happened (naive, dataset-local time).
    pub event_timestamp: NaiveDateTime,
    /// Feature touched by feature-scoped events.
    #[serde(default)]
    pub feature_name: Option<String>,
}

impl Event {
    /// Calendar date of the event.
    pub fn date(&self) -> NaiveDate {
        self.event_timestamp.date()
    }
}

/// Month-level revenue roll-up, keyed by the first day of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub month: NaiveDate,
    pub mrr: f64,
    #[serde(default)]
    pub expansion_mrr: f64,
    #[serde(default)]
    pub contraction_mrr: f64,
    #[serde(default)]
    pub churn_mrr: f64,
    #[serde(default)]
    pub new_mrr: f64,
}

/// The four datasets the metrics engine works on.
///
/// Filtering never mutates a `Tables`; it produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub users: Vec<User>,
    pub subscriptions: Vec<Subscription>,
    pub events: Vec<Event>,
    pub revenue: Vec<RevenueRecord>,
}

impl Tables {
    pub fn new(
        users: Vec<User>,
        subscriptions: Vec<Subscription>,
        events: Vec<Event>,
        revenue: Vec<RevenueRecord>,
    ) -> Self {
        Self {
            users,
            subscriptions,
            events,
            revenue,
        }
    }

    /// True when all four tables are empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.subscriptions.is_empty()
            && self.events.is_empty()
            && self.revenue.is_empty()
    }

    /// Row counts of the four tables.
    pub fn row_counts(&self) -> TableCounts {
        TableCounts {
            users: self.users.len(),
            subscriptions: self.subscriptions.len(),
            events: self.events.len(),
            revenue: self.revenue.len(),
        }
    }
}

/// Number of rows in each of the four tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub users: usize,
    pub subscriptions: usize,
    pub events: usize,
    pub revenue: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sub(start: &str, end: Option<&str>) -> Subscription {
        Subscription {
            user_id: "U1".to_string(),
            subscription_start_date: date(start),
            subscription_end_date: end.map(date),
            plan_type: "pro".to_string(),
            is_churned: end.is_some(),
            mrr: 49.0,
        }
    }

    #[test]
    fn test_overlaps_open_ended() {
        let s = sub("2024-01-10", None);
        assert!(s.overlaps(date("2024-03-01"), date("2024-03-31")));
        assert!(!s.overlaps(date("2023-12-01"), date("2024-01-09")));
    }

    #[test]
    fn test_overlaps_closed_boundaries_inclusive() {
        let s = sub("2024-01-10", Some("2024-02-01"));
        assert!(s.overlaps(date("2024-02-01"), date("2024-02-29")));
        assert!(s.overlaps(date("2023-12-01"), date("2024-01-10")));
        assert!(!s.overlaps(date("2024-02-02"), date("2024-02-29")));
    }

    #[test]
    fn test_is_consistent() {
        let mut s = sub("2024-01-10", None);
        assert!(s.is_consistent());
        s.is_churned = true;
        assert!(!s.is_consistent());
    }

    #[test]
    fn test_is_consistent_rejects_future_churn_end() {
        let today = date("2024-06-15");
        let mut s = sub("2024-01-10", Some("2024-06-15"));
        s.is_churned = true;
        assert!(s.is_consistent_at(today));

        s.subscription_end_date = Some(date("2024-06-16"));
        assert!(!s.is_consistent_at(today));

        s.subscription_end_date = Some(date("2999-01-01"));
        assert!(!s.is_consistent());

        // An open-ended future end date is fine while not churned.
        s.is_churned = false;
        assert!(s.is_consistent_at(today));
    }

    #[test]
    fn test_event_type_round_trip_names() {
        for t in EventType::ALL {
            assert_eq!(EventType::parse(t.as_str()), Some(t));
        }
        assert_eq!(EventType::parse("logout"), None);
    }

    #[test]
    fn test_key_actions() {
        let keys: Vec<EventType> = EventType::ALL
            .into_iter()
            .filter(|t| t.is_key_action())
            .collect();
        assert_eq!(
            keys,
            vec![
                EventType::CreateProject,
                EventType::ShareItem,
                EventType::DownloadReport
            ]
        );
    }

    #[test]
    fn test_event_type_serde_snake_case() {
        let json = serde_json::to_string(&EventType::DownloadReport).unwrap();
        assert_eq!(json, "\"download_report\"");
        let back: EventType = serde_json::from_str("\"session_start\"").unwrap();
        assert_eq!(back, EventType::SessionStart);
    }

    #[test]
    fn test_tables_row_counts() {
        let tables = Tables::new(vec![], vec![sub("2024-01-01", None)], vec![], vec![]);
        let counts = tables.row_counts();
        assert_eq!(counts.subscriptions, 1);
        assert_eq!(counts.users, 0);
        assert!(!tables.is_empty());
        assert!(Tables::default().is_empty());
    }
}
