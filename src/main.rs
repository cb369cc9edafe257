//! Avocado Analytics - Avocado Sales Dashboard
//!
//! Loads the avocado sales CSV once, computes the regional and organic share
//! charts, and shows price/volume charts filtered by the user's selection.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{anyhow, Context};
use config::AppConfig;
use data::DataLoader;
use eframe::egui;
use gui::DashboardApp;
use stats::StatsCalculator;
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    // Startup aborts here if the dataset is missing or malformed
    let dataset = DataLoader::load_csv(&config.data_path)
        .with_context(|| format!("loading dataset from {}", config.data_path.display()))?;
    let dataset = Arc::new(dataset);
    let static_charts = StatsCalculator::static_charts(&dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Avocado Analytics: Understand Your Avocados!"),
        ..Default::default()
    };

    info!("opening dashboard window");
    eframe::run_native(
        "Avocado Analytics",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dataset, static_charts, config)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {}", e))?;

    info!("dashboard closed");
    Ok(())
}
