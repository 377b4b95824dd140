//! crimemap - India violent-crime choropleth dashboard.
//!
//! Loads the crime spreadsheet and state boundaries once at startup, joins
//! them on the reconciled state name, and serves an interactive map with
//! top/bottom rankings.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Context;
use eframe::egui;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let app_config = config::AppConfig::load_or_default(Path::new("config.toml"))?;
    let context = data::load_context(&app_config).context("startup data load failed")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("India Violent Crimes 2020"),
        ..Default::default()
    };

    eframe::run_native(
        "India Violent Crimes 2020",
        options,
        Box::new(move |cc| Ok(Box::new(gui::CrimeMapApp::new(cc, context, &app_config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run GUI: {e}"))
}
