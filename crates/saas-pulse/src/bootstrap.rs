use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.saas-pulse/` exists. It holds `last_used.json` and may hold a
/// `data/` directory picked up by [`discover_data_path`].
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(home.join(".saas-pulse"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an [`EnvFilter`] directive.
fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber. Logs go to stderr so that
/// report output on stdout stays clean.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the dataset directory.
///
/// An explicit path is returned as given, whether or not it exists; the
/// loader reports a missing directory. Otherwise the first existing entry of
/// `./data` and `~/.saas-pulse/data` is used.
pub fn discover_data_path(explicit: Option<&Path>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let home = dirs::home_dir();
    discover_data_path_in(explicit, cwd.as_deref(), home.as_deref())
}

fn discover_data_path_in(
    explicit: Option<&Path>,
    cwd: Option<&Path>,
    home: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidates = [
        cwd.map(|d| d.join("data")),
        home.map(|h| h.join(".saas-pulse").join("data")),
    ];
    candidates.into_iter().flatten().find(|p| p.is_dir())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
