//! Control Panel Widget
//! Left side panel with the chart filters, export buttons and status line.

use crate::data::{Dataset, Selection};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};

const LABEL_WIDTH: f32 = 80.0;
const COMBO_WIDTH: f32 = 170.0;

/// Left side control panel. Options are fixed at startup from the dataset.
pub struct ControlPanel {
    pub selection: Selection,
    regions: Vec<String>,
    types: Vec<String>,
    dates: Vec<NaiveDate>,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(dataset: &Dataset, selection: Selection) -> Self {
        Self {
            selection,
            regions: dataset.regions(),
            types: dataset.types(),
            dates: dataset.calendar_days(),
            status: format!("Loaded {} rows", dataset.len()),
            export_enabled: !dataset.is_empty(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn text_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        selected: &mut String,
        options: &[String],
    ) {
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(COMBO_WIDTH)
                .selected_text(selected.as_str())
                .show_ui(ui, |ui| {
                    for option in options {
                        ui.selectable_value(selected, option.clone(), option.as_str());
                    }
                });
        });
    }

    fn date_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        selected: &mut NaiveDate,
        options: &[NaiveDate],
    ) {
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(COMBO_WIDTH)
                .selected_text(selected.to_string())
                .height(300.0)
                .show_ui(ui, |ui| {
                    for date in options {
                        ui.selectable_value(selected, *date, date.to_string());
                    }
                });
        });
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("🥑").size(36.0));
            ui.label(
                RichText::new("Avocado Analytics")
                    .size(22.0)
                    .color(Color32::from_rgb(7, 154, 130)),
            );
            ui.label(
                RichText::new("Avocado prices and sales volume in the US, 2015 to 2018")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Price & Volume filters =====
        ui.label(RichText::new("📈 Price & Volume").size(14.0).strong());
        ui.add_space(5.0);

        let primary = &mut self.selection.primary;
        Self::text_combo(ui, "region_filter", "Region:", &mut primary.region, &self.regions);
        ui.add_space(3.0);
        Self::text_combo(ui, "type_filter", "Type:", &mut primary.avocado_type, &self.types);
        ui.add_space(3.0);
        Self::date_combo(ui, "start_date", "From:", &mut primary.start, &self.dates);
        ui.add_space(3.0);
        Self::date_combo(ui, "end_date", "To:", &mut primary.end, &self.dates);

        if primary.start > primary.end {
            ui.label(
                RichText::new("Start date is after end date")
                    .size(11.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Comparison filters =====
        ui.label(RichText::new("⚖ Compare Regions").size(14.0).strong());
        ui.add_space(5.0);

        let compare = &mut self.selection.compare;
        Self::text_combo(ui, "region1", "Region:", &mut compare.region_one, &self.regions);
        ui.add_space(3.0);
        Self::text_combo(ui, "region2", "Region:", &mut compare.region_two, &self.regions);
        ui.add_space(3.0);
        Self::text_combo(ui, "type2", "Type:", &mut compare.avocado_type, &self.types);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let ppt_button = egui::Button::new(RichText::new("📄 Export PPT").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(ppt_button).clicked() {
                    action = ControlPanelAction::ExportPpt;
                }

                ui.add_space(6.0);

                let json_button = egui::Button::new(RichText::new("💾 Export JSON").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(json_button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("error") || self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ExportPpt,
    ExportJson,
}
