//! Loading of the four analytics datasets.
//!
//! Each table is a CSV file with a header row or a JSONL file of one object
//! per line. Rows are mapped field by field into the typed records of
//! [`pulse_core::models`]; rows that cannot be mapped are skipped so that
//! every table handed to the metrics engine is well-formed.

use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pulse_core::error::{PulseError, Result};
use pulse_core::models::{Event, EventType, RevenueRecord, Subscription, Tables, User};
use pulse_core::time_utils::{month_start, parse_date, parse_timestamp};
use serde_json::Value;
use tracing::{debug, warn};

pub const USERS_TABLE: &str = "users";
pub const SUBSCRIPTIONS_TABLE: &str = "subscriptions";
pub const EVENTS_TABLE: &str = "events";
pub const REVENUE_TABLE: &str = "revenue";

/// File extensions tried for each table, in order of preference.
pub const TABLE_EXTENSIONS: [&str; 2] = ["csv", "jsonl"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve the directory holding the dataset files.
///
/// Datasets conventionally live under `<data_dir>/raw`; when that
/// subdirectory exists it is used, otherwise `data_dir` itself.
pub fn resolve_raw_dir(data_dir: &Path) -> PathBuf {
    let raw = data_dir.join("raw");
    if raw.is_dir() {
        raw
    } else {
        data_dir.to_path_buf()
    }
}

/// Path of `table` inside `dir`: the first of `<table>.csv` and
/// `<table>.jsonl` that exists, or the CSV path when neither does.
pub fn locate_table(dir: &Path, table: &str) -> PathBuf {
    TABLE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", table, ext)))
        .find(|p| p.is_file())
        .unwrap_or_else(|| dir.join(format!("{}.{}", table, TABLE_EXTENSIONS[0])))
}

/// Load all four tables from `data_dir`.
///
/// A missing directory is an error. A missing dataset file yields an empty
/// table and a warning.
pub fn load_tables(data_dir: &Path) -> Result<Tables> {
    if !data_dir.is_dir() {
        return Err(PulseError::DataPathNotFound(data_dir.to_path_buf()));
    }
    let dir = resolve_raw_dir(data_dir);

    let tables = Tables::new(
        load_users(&locate_table(&dir, USERS_TABLE))?,
        load_subscriptions(&locate_table(&dir, SUBSCRIPTIONS_TABLE))?,
        load_events(&locate_table(&dir, EVENTS_TABLE))?,
        load_revenue(&locate_table(&dir, REVENUE_TABLE))?,
    );

    let counts = tables.row_counts();
    debug!(
        "Loaded {} users, {} subscriptions, {} events, {} revenue months from {}",
        counts.users,
        counts.subscriptions,
        counts.events,
        counts.revenue,
        dir.display()
    );

    Ok(tables)
}

/// Load the users table.
pub fn load_users(path: &Path) -> Result<Vec<User>> {
    read_rows(path, map_to_user)
}

/// Load the subscriptions table.
///
/// Rows flagged as churned without an end date, or with one in the future,
/// are rejected.
pub fn load_subscriptions(path: &Path) -> Result<Vec<Subscription>> {
    read_rows(path, |data| {
        let sub = map_to_subscription(data)?;
        if !sub.is_consistent() {
            warn!(
                "Dropping churned subscription of {} without a past end date",
                sub.user_id
            );
            return None;
        }
        Some(sub)
    })
}

/// Load the events table.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    read_rows(path, map_to_event)
}

/// Load the revenue table.
///
/// Months are normalised to their first day; a repeated month keeps the
/// first row seen.
pub fn load_revenue(path: &Path) -> Result<Vec<RevenueRecord>> {
    let rows = read_rows(path, map_to_revenue)?;
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    Ok(rows
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.month);
            if !fresh {
                warn!("Duplicate revenue row for {}, keeping the first", r.month);
            }
            fresh
        })
        .collect())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read a dataset file, choosing the parser from its extension. A missing
/// file is an empty table.
fn read_rows<T>(path: &Path, map: impl Fn(&Value) -> Option<T>) -> Result<Vec<T>> {
    if !path.exists() {
        warn!("Dataset file does not exist: {}", path.display());
        return Ok(Vec::new());
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => read_csv(path, map),
        _ => read_jsonl(path, map),
    }
}

/// Read a CSV file with a header row, mapping each record with `map`.
///
/// Every cell is handed to `map` as a JSON string keyed by its column name;
/// empty cells are left out, so they read as absent values. Records with
/// the wrong number of cells or that `map` rejects are counted as skipped.
fn read_csv<T>(path: &Path, map: impl Fn(&Value) -> Option<T>) -> Result<Vec<T>> {
    let file = std::fs::File::open(path).map_err(|source| PulseError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    let mut records_read = 0u64;
    let mut records_skipped = 0u64;

    for result in reader.deserialize::<HashMap<String, String>>() {
        records_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => {
                return Err(PulseError::FileRead {
                    path: path.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                debug!("Failed to parse CSV record in {}: {}", path.display(), e);
                records_skipped += 1;
                continue;
            }
        };

        let data = csv_record_to_value(record);
        match map(&data) {
            Some(row) => rows.push(row),
            None => {
                debug!("Skipping malformed row in {}: {}", path.display(), data);
                records_skipped += 1;
            }
        }
    }

    debug!(
        "File {}: {} read, {} skipped, {} loaded",
        path.display(),
        records_read,
        records_skipped,
        rows.len()
    );

    Ok(rows)
}

fn csv_record_to_value(record: HashMap<String, String>) -> Value {
    Value::Object(
        record
            .into_iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(column, cell)| (column, Value::String(cell)))
            .collect(),
    )
}

/// Read `path` line by line, mapping each parsed JSON object with `map`.
///
/// Blank lines are ignored; lines that are not JSON or that `map` rejects
/// are counted as skipped.
fn read_jsonl<T>(path: &Path, map: impl Fn(&Value) -> Option<T>) -> Result<Vec<T>> {
    let file = std::fs::File::open(path).map_err(|source| PulseError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);

    let mut rows = Vec::new();
    let mut lines_read = 0u64;
    let mut lines_skipped = 0u64;

    for line_result in reader.lines() {
        let line = line_result.map_err(|source| PulseError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        lines_read += 1;

        let data: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                debug!("Failed to parse JSON line in {}: {}", path.display(), e);
                lines_skipped += 1;
                continue;
            }
        };

        match map(&data) {
            Some(row) => rows.push(row),
            None => {
                debug!("Skipping malformed row in {}: {}", path.display(), trimmed);
                lines_skipped += 1;
            }
        }
    }

    debug!(
        "File {}: {} read, {} skipped, {} loaded",
        path.display(),
        lines_read,
        lines_skipped,
        rows.len()
    );

    Ok(rows)
}

fn map_to_user(data: &Value) -> Option<User> {
    Some(User {
        user_id: string_field(data, "user_id")?,
        country: string_field(data, "country")?,
        signup_date: date_field(data, "signup_date")?,
        acquisition_channel: string_field(data, "acquisition_channel")?,
        initial_plan: string_field(data, "initial_plan")?,
    })
}

fn map_to_subscription(data: &Value) -> Option<Subscription> {
    Some(Subscription {
        user_id: string_field(data, "user_id")?,
        subscription_start_date: date_field(data, "subscription_start_date")?,
        subscription_end_date: optional_date_field(data, "subscription_end_date")?,
        plan_type: string_field(data, "plan_type")?,
        is_churned: bool_field(data, "is_churned")?,
        mrr: number_field(data, "mrr").filter(|m| *m >= 0.0)?,
    })
}

fn map_to_event(data: &Value) -> Option<Event> {
    let event_type = string_field(data, "event_type").and_then(|s| EventType::parse(&s))?;
    let event_timestamp = data
        .get("event_timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;

    Some(Event {
        event_id: string_field(data, "event_id")?,
        user_id: string_field(data, "user_id")?,
        event_type,
        event_timestamp,
        feature_name: string_field(data, "feature_name"),
    })
}

fn map_to_revenue(data: &Value) -> Option<RevenueRecord> {
    Some(RevenueRecord {
        month: month_start(date_field(data, "month")?),
        mrr: number_field(data, "mrr")?,
        expansion_mrr: number_field(data, "expansion_mrr").unwrap_or(0.0),
        contraction_mrr: number_field(data, "contraction_mrr").unwrap_or(0.0),
        churn_mrr: number_field(data, "churn_mrr").unwrap_or(0.0),
        new_mrr: number_field(data, "new_mrr").unwrap_or(0.0),
    })
}

/// A non-empty string field. Numeric ids are accepted and stringified.
fn string_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn date_field(data: &Value, key: &str) -> Option<NaiveDate> {
    data.get(key).and_then(Value::as_str).and_then(parse_date)
}

/// `Some(None)` for an absent, null or empty value; `None` when a value is
/// present but unparseable.
fn optional_date_field(data: &Value, key: &str) -> Option<Option<NaiveDate>> {
    match data.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.trim().is_empty() => Some(None),
        Some(Value::String(s)) => parse_date(s).map(Some),
        Some(_) => None,
    }
}

fn bool_field(data: &Value, key: &str) -> Option<bool> {
    match data.get(key) {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::Number(n)) => n.as_i64().map(|v| v != 0),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        Some(_) => None,
    }
}

fn number_field(data: &Value, key: &str) -> Option<f64> {
    let value = match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn user_line(id: &str, signup: &str) -> String {
        serde_json::json!({
            "user_id": id,
            "country": "DE",
            "signup_date": signup,
            "acquisition_channel": "organic",
            "initial_plan": "free",
        })
        .to_string()
    }

    // ── load_tables ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_tables_missing_directory() {
        let err = load_tables(Path::new("/tmp/does-not-exist-pulse-test-xyz")).unwrap_err();
        assert!(matches!(err, PulseError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_tables_empty_directory_yields_empty_tables() {
        let dir = TempDir::new().unwrap();
        let tables = load_tables(dir.path()).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_load_tables_prefers_raw_subdirectory() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("raw");
        std::fs::create_dir_all(&raw).unwrap();
        write_lines(&raw, "users.jsonl", &[&user_line("U1", "2024-01-15")]);

        let tables = load_tables(dir.path()).unwrap();
        assert_eq!(tables.users.len(), 1);
        assert_eq!(tables.users[0].signup_date, date("2024-01-15"));
    }

    #[test]
    fn test_load_tables_all_four_files() {
        let dir = TempDir::new().unwrap();
        write_lines(dir.path(), "users.jsonl", &[&user_line("U1", "2024-01-15")]);
        write_lines(
            dir.path(),
            "subscriptions.jsonl",
            &[r#"{"user_id":"U1","subscription_start_date":"2024-01-20","subscription_end_date":null,"plan_type":"pro","is_churned":false,"mrr":49.0}"#],
        );
        write_lines(
            dir.path(),
            "events.jsonl",
            &[r#"{"event_id":"E1","user_id":"U1","event_type":"create_project","event_timestamp":"2024-01-20 10:15:00","feature_name":"workspace"}"#],
        );
        write_lines(
            dir.path(),
            "revenue.jsonl",
            &[r#"{"month":"2024-01-01","mrr":49.0,"expansion_mrr":2.5,"contraction_mrr":1.0,"churn_mrr":0.0,"new_mrr":0.0}"#],
        );

        let tables = load_tables(dir.path()).unwrap();
        let counts = tables.row_counts();
        assert_eq!(counts.users, 1);
        assert_eq!(counts.subscriptions, 1);
        assert_eq!(counts.events, 1);
        assert_eq!(counts.revenue, 1);
        assert_eq!(tables.events[0].event_type, EventType::CreateProject);
        assert_eq!(tables.events[0].feature_name.as_deref(), Some("workspace"));
        assert!(tables.subscriptions[0].subscription_end_date.is_none());
    }

    // ── load_users ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_users_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "users.jsonl",
            &[
                "{not valid json{{",
                &user_line("U1", "2024-01-15"),
                "",
                &user_line("U2", "not-a-date"),
                r#"{"user_id":"U3"}"#,
            ],
        );

        let users = load_users(&path).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_id, "U1");
    }

    #[test]
    fn test_load_users_preserves_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "users.jsonl",
            &[&user_line("U2", "2024-03-01"), &user_line("U1", "2024-01-01")],
        );
        let ids: Vec<String> = load_users(&path)
            .unwrap()
            .into_iter()
            .map(|u| u.user_id)
            .collect();
        assert_eq!(ids, vec!["U2", "U1"]);
    }

    // ── load_subscriptions ────────────────────────────────────────────────────

    #[test]
    fn test_load_subscriptions_rejects_churned_without_end_date() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "subscriptions.jsonl",
            &[
                r#"{"user_id":"U1","subscription_start_date":"2024-01-01","plan_type":"pro","is_churned":true,"mrr":49}"#,
                r#"{"user_id":"U2","subscription_start_date":"2024-01-01","subscription_end_date":"2024-03-01","plan_type":"pro","is_churned":"True","mrr":"49.0"}"#,
            ],
        );

        let subs = load_subscriptions(&path).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].user_id, "U2");
        assert!(subs[0].is_churned);
        assert_eq!(subs[0].subscription_end_date, Some(date("2024-03-01")));
        assert!((subs[0].mrr - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_subscriptions_empty_end_date_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "subscriptions.jsonl",
            &[r#"{"user_id":"U1","subscription_start_date":"2024-01-01","subscription_end_date":"","plan_type":"free","is_churned":false,"mrr":0}"#],
        );
        let subs = load_subscriptions(&path).unwrap();
        assert_eq!(subs.len(), 1);
        assert!(subs[0].subscription_end_date.is_none());
    }

    #[test]
    fn test_load_subscriptions_rejects_negative_mrr() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "subscriptions.jsonl",
            &[r#"{"user_id":"U1","subscription_start_date":"2024-01-01","plan_type":"pro","is_churned":false,"mrr":-5}"#],
        );
        assert!(load_subscriptions(&path).unwrap().is_empty());
    }

    // ── load_events ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_events_unknown_type_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "events.jsonl",
            &[
                r#"{"event_id":"E1","user_id":"U1","event_type":"logout","event_timestamp":"2024-01-20T10:00:00"}"#,
                r#"{"event_id":"E2","user_id":"U1","event_type":"login","event_timestamp":"2024-01-20T10:00:00Z","feature_name":null}"#,
            ],
        );

        let events = load_events(&path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "E2");
        assert!(events[0].feature_name.is_none());
    }

    // ── load_revenue ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_revenue_normalises_month_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "revenue.jsonl",
            &[
                r#"{"month":"2024-02-15","mrr":100.0}"#,
                r#"{"month":"2024-02-01","mrr":999.0}"#,
                r#"{"month":"2024-03-01 00:00:00","mrr":120.0,"churn_mrr":10.0}"#,
            ],
        );

        let revenue = load_revenue(&path).unwrap();
        assert_eq!(revenue.len(), 2);
        assert_eq!(revenue[0].month, date("2024-02-01"));
        assert!((revenue[0].mrr - 100.0).abs() < 1e-9);
        assert_eq!(revenue[1].month, date("2024-03-01"));
        assert!((revenue[1].churn_mrr - 10.0).abs() < 1e-9);
        assert_eq!(revenue[1].new_mrr, 0.0);
    }

    #[test]
    fn test_missing_file_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let revenue = load_revenue(&dir.path().join("revenue.jsonl")).unwrap();
        assert!(revenue.is_empty());
    }

    // ── CSV ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_tables_reads_csv_with_empty_cells() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("raw");
        std::fs::create_dir_all(&raw).unwrap();
        write_lines(
            &raw,
            "users.csv",
            &[
                "user_id,country,signup_date,acquisition_channel,initial_plan",
                "U1,US,2024-01-15,ads,free",
                "U2,DE,2024-02-03,organic,pro",
            ],
        );
        write_lines(
            &raw,
            "subscriptions.csv",
            &[
                "user_id,subscription_start_date,subscription_end_date,plan_type,is_churned,mrr",
                "U1,2024-01-15,,pro,False,49.0",
                "U2,2024-02-03,2024-04-01,pro,True,29.0",
            ],
        );
        write_lines(
            &raw,
            "events.csv",
            &[
                "event_id,user_id,event_type,event_timestamp,feature_name",
                "E1,U1,login,2024-01-15 09:00:00,",
                "E2,U1,feature_open,2024-01-16 10:30:00,reports",
            ],
        );
        write_lines(
            &raw,
            "revenue.csv",
            &[
                "month,mrr,expansion_mrr,contraction_mrr,churn_mrr,new_mrr",
                "2024-01-01,49.0,0.0,0.0,0.0,49.0",
            ],
        );

        let tables = load_tables(dir.path()).unwrap();
        let counts = tables.row_counts();
        assert_eq!((counts.users, counts.subscriptions, counts.events, counts.revenue), (2, 2, 2, 1));

        assert!(tables.subscriptions[0].subscription_end_date.is_none());
        assert!(!tables.subscriptions[0].is_churned);
        assert_eq!(tables.subscriptions[1].subscription_end_date, Some(date("2024-04-01")));
        assert!(tables.subscriptions[1].is_churned);

        assert!(tables.events[0].feature_name.is_none());
        assert_eq!(tables.events[1].event_type, EventType::FeatureOpen);
        assert_eq!(tables.events[1].feature_name.as_deref(), Some("reports"));
        assert!((tables.revenue[0].new_mrr - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_csv_preferred_over_jsonl() {
        let dir = TempDir::new().unwrap();
        write_lines(dir.path(), "users.jsonl", &[&user_line("J1", "2024-01-15")]);
        assert_eq!(locate_table(dir.path(), USERS_TABLE), dir.path().join("users.jsonl"));

        write_lines(
            dir.path(),
            "users.csv",
            &[
                "user_id,country,signup_date,acquisition_channel,initial_plan",
                "C1,US,2024-01-15,ads,free",
            ],
        );
        assert_eq!(locate_table(dir.path(), USERS_TABLE), dir.path().join("users.csv"));
        let tables = load_tables(dir.path()).unwrap();
        assert_eq!(tables.users[0].user_id, "C1");
    }

    #[test]
    fn test_csv_skips_malformed_records() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "users.csv",
            &[
                "user_id,country,signup_date,acquisition_channel,initial_plan",
                "U1,US,2024-01-15,ads,free",
                "U2,US,not-a-date,ads,free",
                "U3,US",
                ",US,2024-01-15,ads,free",
                "U4, FR , 2024-03-01 ,referral,pro",
            ],
        );

        let users = load_users(&path).unwrap();
        let ids: Vec<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["U1", "U4"]);
        assert_eq!(users[1].country, "FR");
    }

    #[test]
    fn test_csv_rejects_churned_with_future_end_date() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(
            dir.path(),
            "subscriptions.csv",
            &[
                "user_id,subscription_start_date,subscription_end_date,plan_type,is_churned,mrr",
                "U1,2024-01-01,2999-01-01,pro,True,49.0",
                "U2,2024-01-01,,pro,True,49.0",
                "U3,2024-01-01,2024-02-01,pro,True,49.0",
            ],
        );
        let subs = load_subscriptions(&path).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].user_id, "U3");
    }

    #[test]
    fn test_missing_csv_is_empty_table() {
        let dir = TempDir::new().unwrap();
        assert!(load_events(&dir.path().join("events.csv")).unwrap().is_empty());
    }

    // ── field helpers ─────────────────────────────────────────────────────────

    #[test]
    fn test_string_field_accepts_numeric_ids() {
        let data = serde_json::json!({"user_id": 42, "blank": "  "});
        assert_eq!(string_field(&data, "user_id"), Some("42".to_string()));
        assert_eq!(string_field(&data, "blank"), None);
        assert_eq!(string_field(&data, "missing"), None);
    }

    #[test]
    fn test_bool_field_variants() {
        let data = serde_json::json!({"a": true, "b": "False", "c": 1, "d": "maybe"});
        assert_eq!(bool_field(&data, "a"), Some(true));
        assert_eq!(bool_field(&data, "b"), Some(false));
        assert_eq!(bool_field(&data, "c"), Some(true));
        assert_eq!(bool_field(&data, "d"), None);
        assert_eq!(bool_field(&data, "missing"), Some(false));
    }
}
