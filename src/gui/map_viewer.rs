//! Map Viewer Widget
//! Central panel showing the rendered choropleth, its legend, and the
//! top-5 / bottom-5 ranking tables.

use crate::charts::colormap;
use crate::stats::Ranking;
use egui::{Color32, RichText, TextureHandle, TextureOptions};
use image::RgbaImage;

const LEGEND_WIDTH: f32 = 220.0;
const LEGEND_HEIGHT: f32 = 14.0;

/// One render's ranking output, labeled for the active view mode.
pub struct RankedTables {
    pub heading: &'static str,
    pub value_header: &'static str,
    pub top: Vec<Ranking>,
    pub bottom: Vec<Ranking>,
}

/// Central display area. Empty until the first draw.
pub struct MapViewer {
    texture: Option<TextureHandle>,
    tables: Option<RankedTables>,
    value_range: (f64, f64),
}

impl Default for MapViewer {
    fn default() -> Self {
        Self {
            texture: None,
            tables: None,
            value_range: (0.0, 0.0),
        }
    }
}

impl MapViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload a freshly rendered map and its tables.
    pub fn set_render(
        &mut self,
        ctx: &egui::Context,
        img: RgbaImage,
        tables: RankedTables,
        value_range: (f64, f64),
    ) {
        let size = [img.width() as usize, img.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        self.texture = Some(ctx.load_texture("choropleth", color_image, TextureOptions::LINEAR));
        self.tables = Some(tables);
        self.value_range = value_range;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let (Some(texture), Some(tables)) = (&self.texture, &self.tables) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Press \"Draw Chart\" to render the map").size(18.0));
            });
            return;
        };

        ui.label(RichText::new(tables.heading).size(18.0).strong());
        ui.add_space(8.0);

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new("Map of India").size(14.0).strong());
                let max_width = (ui.available_width() - 320.0).max(300.0);
                ui.add(egui::Image::from_texture(texture).max_width(max_width));
                Self::draw_legend(ui, self.value_range);
            });

            ui.add_space(15.0);

            ui.vertical(|ui| {
                Self::draw_table(ui, "Top 5 States", "top_states", tables.value_header, &tables.top);
                ui.add_space(12.0);
                Self::draw_table(
                    ui,
                    "Bottom 5 States",
                    "bottom_states",
                    tables.value_header,
                    &tables.bottom,
                );
            });
        });
    }

    fn draw_legend(ui: &mut egui::Ui, (min, max): (f64, f64)) {
        ui.add_space(6.0);
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(LEGEND_WIDTH, LEGEND_HEIGHT),
            egui::Sense::hover(),
        );
        let painter = ui.painter();
        let steps = LEGEND_WIDTH as usize;
        let step_width = rect.width() / steps as f32;
        for i in 0..steps {
            let t = i as f64 / (steps - 1) as f64;
            let rgba = colormap::diverging_color(t);
            let color = Color32::from_rgb(rgba[0], rgba[1], rgba[2]);
            let x = rect.left() + i as f32 * step_width;
            painter.rect_filled(
                egui::Rect::from_min_size(
                    egui::pos2(x, rect.top()),
                    egui::vec2(step_width + 1.0, rect.height()),
                ),
                0.0,
                color,
            );
        }
        ui.horizontal(|ui| {
            ui.label(RichText::new(format_value(min)).size(11.0));
            ui.add_space(LEGEND_WIDTH - 80.0);
            ui.label(RichText::new(format_value(max)).size(11.0));
        });
    }

    fn draw_table(
        ui: &mut egui::Ui,
        title: &str,
        id: &str,
        value_header: &str,
        rankings: &[Ranking],
    ) {
        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(4.0);
        egui::Grid::new(id)
            .striped(true)
            .min_col_width(40.0)
            .show(ui, |ui| {
                ui.label(RichText::new("#").strong());
                ui.label(RichText::new("State").strong());
                ui.label(RichText::new(value_header).strong());
                ui.end_row();

                for (i, ranking) in rankings.iter().enumerate() {
                    ui.label(format!("{}", i + 1));
                    ui.label(&ranking.state);
                    ui.label(format_value(ranking.value));
                    ui.end_row();
                }
            });
    }
}

/// Integers print bare, fractional values with two decimals.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_format_without_decimals() {
        assert_eq!(format_value(500.0), "500");
    }

    #[test]
    fn rates_format_with_two_decimals() {
        assert_eq!(format_value(0.05), "0.05");
        assert_eq!(format_value(12.345), "12.35");
    }
}
