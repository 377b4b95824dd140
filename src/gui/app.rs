//! Main application window: sidebar controls plus the map panel.
//!
//! One "Draw Chart" press runs one synchronous recompute-and-render; the
//! loaded data context is never mutated.

use crate::charts::ChoroplethRenderer;
use crate::config::{AppConfig, MapConfig};
use crate::data::DataContext;
use crate::gui::{ControlPanel, ControlPanelAction, MapViewer, RankedTables, UserSettings, ViewMode};
use crate::stats::RateCalculator;
use anyhow::Result;
use egui::SidePanel;
use image::RgbaImage;

const RANKING_SIZE: usize = 5;

pub struct CrimeMapApp {
    context: DataContext,
    map_config: MapConfig,
    control_panel: ControlPanel,
    map_viewer: MapViewer,
}

impl CrimeMapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        context: DataContext,
        config: &AppConfig,
    ) -> Self {
        let control_panel = ControlPanel::new(context.categories.clone());
        Self {
            context,
            map_config: config.map.clone(),
            control_panel,
            map_viewer: MapViewer::new(),
        }
    }

    fn handle_draw(&mut self, ctx: &egui::Context) {
        let settings = self.control_panel.settings.clone();
        match self.run_pipeline(&settings) {
            Ok((img, tables, value_range)) => {
                self.map_viewer.set_render(ctx, img, tables, value_range);
                self.control_panel.set_status(&format!(
                    "Rendered {} ({})",
                    settings.category,
                    settings.mode.label()
                ));
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    /// The full presenter pipeline for one interaction: pick the table for
    /// the view mode, rasterize the map, rank the states.
    fn run_pipeline(
        &self,
        settings: &UserSettings,
    ) -> Result<(RgbaImage, RankedTables, (f64, f64))> {
        let table = match settings.mode {
            ViewMode::Absolute => self.context.view.table.clone(),
            ViewMode::Incidence => RateCalculator::incidence_rates(
                &self.context.view,
                &self.context.categories,
                &self.context.population_column,
            )?,
        };

        let values = RateCalculator::column_values(&table, &settings.category)?;
        let img = ChoroplethRenderer::render(
            &self.context.view,
            &values,
            self.map_config.width,
            self.map_config.height,
        )?;

        let tables = RankedTables {
            heading: settings.mode.heading(),
            value_header: settings.mode.value_header(),
            top: RateCalculator::top_n(&table, &settings.category, RANKING_SIZE)?,
            bottom: RateCalculator::bottom_n(&table, &settings.category, RANKING_SIZE)?,
        };

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (_, value) in &values {
            if let Some(v) = value {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        let value_range = if min.is_infinite() { (0.0, 0.0) } else { (min, max) };

        Ok((img, tables, value_range))
    }
}

impl eframe::App for CrimeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    if action == ControlPanelAction::Draw {
                        self.handle_draw(ctx);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_viewer.show(ui);
        });
    }
}
