//! Control Panel Widget
//! Left side panel: category and view-mode selection plus the draw trigger.

use egui::{Color32, ComboBox, RichText};

/// How the selected category is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Absolute,
    Incidence,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Absolute => "Absolute",
            ViewMode::Incidence => "Incidence",
        }
    }

    /// Header of the value column in the ranking tables.
    pub fn value_header(&self) -> &'static str {
        match self {
            ViewMode::Absolute => "Count",
            ViewMode::Incidence => "Rate",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            ViewMode::Absolute => "Absolute Number of Crimes Committed",
            ViewMode::Incidence => "Incidence Rate per 10,000 people",
        }
    }
}

/// User selections driving one render.
#[derive(Debug, Clone, Default)]
pub struct UserSettings {
    pub category: String,
    pub mode: ViewMode,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub categories: Vec<String>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(categories: Vec<String>) -> Self {
        let settings = UserSettings {
            category: categories.first().cloned().unwrap_or_default(),
            mode: ViewMode::Absolute,
        };
        Self {
            settings,
            categories,
            status: "Ready".to_string(),
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel.
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("India Violent Crimes 2020")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("Select Crime").size(14.0).strong());
        ui.add_space(5.0);
        ComboBox::from_id_salt("crime_category")
            .width(220.0)
            .selected_text(&self.settings.category)
            .show_ui(ui, |ui| {
                for category in &self.categories {
                    if ui
                        .selectable_label(self.settings.category == *category, category)
                        .clicked()
                    {
                        self.settings.category = category.clone();
                    }
                }
            });

        ui.add_space(10.0);

        ui.label(
            RichText::new("Incidence Rate or Absolute")
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);
        ComboBox::from_id_salt("view_mode")
            .width(220.0)
            .selected_text(self.settings.mode.label())
            .show_ui(ui, |ui| {
                for mode in [ViewMode::Absolute, ViewMode::Incidence] {
                    if ui
                        .selectable_label(self.settings.mode == mode, mode.label())
                        .clicked()
                    {
                        self.settings.mode = mode;
                    }
                }
            });

        ui.add_space(15.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.settings.category.is_empty(), |ui| {
                let button = egui::Button::new(RichText::new("Draw Chart").size(15.0))
                    .min_size(egui::vec2(160.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Draw;
                }
            });
        });

        ui.add_space(10.0);
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(
            RichText::new(
                "Crime data: National Crime Records Bureau, 2020. Population figures \
                 estimated from UIDAI state-wise Aadhaar saturation data.",
            )
            .size(11.0)
            .color(Color32::GRAY),
        );
        ui.add_space(8.0);
        ui.label(
            RichText::new(
                "The absolute number is the total count of crimes committed in a state; \
                 the incidence rate is crimes per 10,000 people in that state.",
            )
            .size(11.0)
            .color(Color32::GRAY),
        );

        action
    }
}

/// Actions triggered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_category_is_preselected() {
        let panel = ControlPanel::new(vec!["Murder".to_string(), "Rioting".to_string()]);
        assert_eq!(panel.settings.category, "Murder");
        assert_eq!(panel.settings.mode, ViewMode::Absolute);
    }

    #[test]
    fn mode_labels_match_table_headers() {
        assert_eq!(ViewMode::Absolute.value_header(), "Count");
        assert_eq!(ViewMode::Incidence.value_header(), "Rate");
    }
}
