use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::date_range::DateRange;
use crate::error::{PulseError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Product analytics report for a SaaS dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "saas-pulse",
    about = "Product analytics report for a SaaS dataset",
    version
)]
pub struct Settings {
    /// Directory holding users/subscriptions/events/revenue JSONL files
    #[arg(long, env = "SAAS_PULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Dashboard page to compute
    #[arg(long, default_value = "overview", value_parser = ["overview", "cohorts", "features", "revenue", "all"])]
    pub page: String,

    /// Keep only users from these countries (repeatable, empty = all)
    #[arg(long = "country", value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Keep only subscriptions on these plans (repeatable, empty = all)
    #[arg(long = "plan", value_delimiter = ',')]
    pub plans: Vec<String>,

    /// Keep only users acquired through these channels (repeatable, empty = all)
    #[arg(long = "channel", value_delimiter = ',')]
    pub channels: Vec<String>,

    /// First day of the date filter (YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date, requires = "end")]
    pub start: Option<NaiveDate>,

    /// Last day of the date filter (YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date, requires = "start")]
    pub end: Option<NaiveDate>,

    /// Number of features listed under "top features"
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub top_n: u32,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_cli_date(s: &str) -> Result<NaiveDate> {
    crate::time_utils::parse_date(s).ok_or_else(|| PulseError::DateParse(s.to_string()))
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.saas-pulse/last_used.json`.
///
/// Filter selections are not persisted; every run starts from
/// the full dataset unless filters are passed explicitly.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
}

impl LastUsedParams {
    /// Default path of the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".saas-pulse").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and merge them with the persisted params.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Parse `args`, fill values not given on the command line from the file
    /// at `config_path`, and persist the merged result back to it.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return settings.apply_debug_flag();
        }

        let last = LastUsedParams::load_from(config_path);

        if settings.data_dir.is_none() && !is_arg_explicitly_set(&matches, "data_dir") {
            settings.data_dir = last.data_dir;
        }
        if !is_arg_explicitly_set(&matches, "page") {
            if let Some(v) = last.page {
                settings.page = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "top_n") {
            if let Some(v) = last.top_n {
                settings.top_n = v;
            }
        }

        settings = settings.apply_debug_flag();

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!("Failed to persist settings: {}", e);
        }

        settings
    }

    /// The date filter, if one was requested.
    pub fn date_range(&self) -> Result<Option<DateRange>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(PulseError::Config(
                "--start and --end must be given together".to_string(),
            )),
        }
    }

    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_dir: s.data_dir.clone(),
            page: Some(s.page.clone()),
            format: Some(s.format.clone()),
            top_n: Some(s.top_n),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
///
/// clap keys args by field name (underscores), not by flag spelling.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
