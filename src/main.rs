mod app;
mod chart;
mod color;
mod config;
mod data;
mod pages;
mod state;
mod ui;

use anyhow::anyhow;
use app::FilmDashboardApp;
use config::DashboardConfig;
use data::DataLoader;
use eframe::egui;
use pages::{AppContext, ViewSettings};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load()?;
    log::info!("Reading tables from {}", config.output_dir.display());
    let context = AppContext::new(
        DataLoader::new(&config.output_dir),
        ViewSettings::from(&config),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Film Dashboard – Movie Ratings",
        options,
        Box::new(move |_cc| Ok(Box::new(FilmDashboardApp::new(context)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
