//! Chart Viewer Widget
//! Central scrollable panel with one card per chart. Cards pair up side by
//! side when the window is wide enough.

use crate::charts::ChartPlotter;
use crate::data::DashboardCharts;
use crate::stats::StaticCharts;
use egui::ScrollArea;

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 280.0;
/// Minimum card width before falling back to a single column.
const MIN_CARD_WIDTH: f32 = 520.0;

pub struct ChartViewer {
    pub charts: Option<DashboardCharts>,
    pub static_charts: StaticCharts,
}

impl ChartViewer {
    pub fn new(static_charts: StaticCharts) -> Self {
        Self {
            charts: None,
            static_charts,
        }
    }

    pub fn set_charts(&mut self, charts: DashboardCharts) {
        self.charts = Some(charts);
    }

    /// Draw all chart cards.
    pub fn show(&self, ui: &mut egui::Ui) {
        let two_columns = ui.available_width() >= 2.0 * MIN_CARD_WIDTH + CHART_SPACING;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(charts) = &self.charts {
                    Self::pair(
                        ui,
                        two_columns,
                        |ui| ChartPlotter::draw_line_chart(ui, "price_chart", &charts.price, CHART_HEIGHT),
                        |ui| {
                            ChartPlotter::draw_line_chart(ui, "volume_chart", &charts.volume, CHART_HEIGHT)
                        },
                    );

                    Self::card(ui, |ui| {
                        ChartPlotter::draw_summary_table(
                            ui,
                            "selection_summary",
                            &charts.price_summary,
                            &charts.volume_summary,
                        );
                    });
                    ui.add_space(CHART_SPACING);

                    Self::card(ui, |ui| {
                        ChartPlotter::draw_line_chart(ui, "compare_chart", &charts.compare, CHART_HEIGHT);
                    });
                    ui.add_space(CHART_SPACING);
                }

                Self::pair(
                    ui,
                    two_columns,
                    |ui| {
                        ChartPlotter::draw_pie_chart(
                            ui,
                            "region_share_chart",
                            &self.static_charts.region_shares,
                            CHART_HEIGHT + 60.0,
                        )
                    },
                    |ui| {
                        ChartPlotter::draw_pie_chart(
                            ui,
                            "type_share_chart",
                            &self.static_charts.type_shares,
                            CHART_HEIGHT + 60.0,
                        )
                    },
                );
            });
    }

    /// Two cards side by side, or stacked in a narrow window.
    fn pair(
        ui: &mut egui::Ui,
        two_columns: bool,
        left: impl FnOnce(&mut egui::Ui),
        right: impl FnOnce(&mut egui::Ui),
    ) {
        if two_columns {
            ui.columns(2, |cols| {
                Self::card(&mut cols[0], left);
                Self::card(&mut cols[1], right);
            });
        } else {
            Self::card(ui, left);
            ui.add_space(CHART_SPACING);
            Self::card(ui, right);
        }
        ui.add_space(CHART_SPACING);
    }

    fn card(ui: &mut egui::Ui, content: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                content(ui);
            });
    }
}
