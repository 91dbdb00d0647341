mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use mls_salaries::config::DashboardConfig;
use mls_salaries::data::aggregate::{
    histogram_bin_count_with_floor, max_compensation_per_year, max_tenure, overall_statistics,
};
use mls_salaries::data::loader::load_dashboard;
use mls_salaries::data::model::DashboardData;

use app::SalaryDashboardApp;
use state::AppState;

/// Dashboard of MLS player salaries, 2007-2022.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding the salary and position tables.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file; defaults to <data-dir>/dashboard.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print headline figures and exit without opening a window.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = DashboardConfig::resolve(args.data_dir.as_deref(), args.config.as_deref())
        .context("reading configuration")?;
    let data = load_dashboard(&config)
        .with_context(|| format!("loading tables from {}", config.data_dir.display()))?;

    if args.summary {
        print_summary(&data, &config);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(config, data);
    eframe::run_native(
        "MLS Salaries 2007-2022",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}

fn print_summary(data: &DashboardData, config: &DashboardConfig) {
    let table = &data.salaries;
    let first = table.years.first().copied().unwrap_or_default();
    let last = table.years.last().copied().unwrap_or_default();
    println!(
        "{} rows, seasons {first}-{last}, {} teams",
        table.len(),
        table.teams.len()
    );

    match overall_statistics(table) {
        Some(stats) => println!(
            "compensation: mean {:.2}, median {:.2}, max {:.2}",
            stats.mean, stats.median, stats.max
        ),
        None => println!("compensation: no data"),
    }
    println!(
        "histogram bins: {}",
        histogram_bin_count_with_floor(table, config.histogram_min_bins)
    );
    if let Some(tenure) = max_tenure(table) {
        println!("longest tenure: {tenure} seasons");
    }

    println!("highest paid per season:");
    for r in max_compensation_per_year(table) {
        println!(
            "  {}  {} {} ({})  {:.2}",
            r.year, r.first_name, r.last_name, r.team, r.compensation
        );
    }
}
