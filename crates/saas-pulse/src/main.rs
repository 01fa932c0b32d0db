mod bootstrap;
mod render;

use anyhow::{Context, Result};
use pulse_core::settings::Settings;
use pulse_data::analysis::{DashboardPage, DashboardReport};
use pulse_data::filter::FilterSelection;
use pulse_data::reader::load_tables;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("SaaS Pulse v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Page: {}, Format: {}, Top features: {}",
        settings.page,
        settings.format,
        settings.top_n
    );

    let data_dir = bootstrap::discover_data_path(settings.data_dir.as_deref()).context(
        "no dataset found; pass --data-dir or create ./data or ~/.saas-pulse/data",
    )?;
    tracing::info!("Loading dataset from {}", data_dir.display());

    let tables = load_tables(&data_dir)?;
    let pages = DashboardPage::select(&settings.page)?;

    let mut selection = FilterSelection::new()
        .with_countries(settings.countries.clone())
        .with_plans(settings.plans.clone())
        .with_channels(settings.channels.clone());
    if let Some(range) = settings.date_range()? {
        selection = selection.with_date_range(range);
    }

    let report = DashboardReport::build(&tables, &selection, &pages, settings.top_n as usize);

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", render::render_report(&report)),
    }

    Ok(())
}
