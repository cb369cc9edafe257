//! Chart Plotter Module
//! Draws chart specifications inside the window using egui_plot.

use super::spec::{format_compact, x_to_date, LineChart, PieChart, Rgb};
use crate::stats::SeriesSummary;
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Polygon, Text};

/// Slices smaller than this get no percentage label.
const MIN_LABELLED_PERCENT: f64 = 2.0;

/// Draws line and pie charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color32(color: Rgb) -> Color32 {
        Color32::from_rgb(color.0, color.1, color.2)
    }

    fn draw_title(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(4.0);
    }

    fn draw_no_data(ui: &mut egui::Ui, height: f32) {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data").size(14.0).color(Color32::GRAY));
            });
        });
    }

    /// Draw a time-series chart. X values are days since the Unix epoch.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, chart: &LineChart, height: f32) {
        Self::draw_title(ui, &chart.title);

        if !chart.has_points() {
            Self::draw_no_data(ui, height);
            return;
        }

        let prefix = chart.y_tick_prefix.clone();
        let hover_prefix = chart.y_tick_prefix.clone();

        let mut plot = Plot::new(id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_axes([true, chart.y_axis_visible])
            .x_axis_formatter(|mark, _range| {
                x_to_date(mark.value)
                    .map(|d| d.format("%b %Y").to_string())
                    .unwrap_or_default()
            })
            .y_axis_formatter(move |mark, _range| {
                format!("{}{}", prefix, format_compact(mark.value))
            })
            .label_formatter(move |name, value| {
                let date = x_to_date(value.x)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                let amount = format!("{}{}", hover_prefix, format_compact(value.y));
                if name.is_empty() {
                    format!("{}\n{}", date, amount)
                } else {
                    format!("{}\n{}\n{}", name, date, amount)
                }
            });

        if chart.series.len() > 1 {
            plot = plot.legend(Legend::default());
        }

        plot.show(ui, |plot_ui| {
            for series in chart.series.iter().filter(|s| !s.is_empty()) {
                let points: PlotPoints = series.points.iter().map(|p| [p.x(), p.value]).collect();
                plot_ui.line(
                    Line::new(points)
                        .color(Self::color32(series.color))
                        .width(2.0)
                        .name(&series.name),
                );
            }
        });
    }

    /// Draw a pie chart as filled polygons with percentage labels.
    pub fn draw_pie_chart(ui: &mut egui::Ui, id: &str, chart: &PieChart, height: f32) {
        Self::draw_title(ui, &chart.title);

        let wedges = chart.wedges();
        if wedges.is_empty() {
            Self::draw_no_data(ui, height);
            return;
        }

        Plot::new(id)
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_x(false)
            .show_y(false)
            .include_x(-1.1)
            .include_x(1.1)
            .include_y(-1.1)
            .include_y(1.1)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for wedge in &wedges {
                    let color = Self::color32(wedge.color);
                    // Pieces share the label so the legend shows one entry per slice
                    for piece in wedge.pieces() {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(piece))
                                .fill_color(color)
                                .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                                .name(&wedge.label),
                        );
                    }

                    if wedge.percent >= MIN_LABELLED_PERCENT {
                        let [x, y] = wedge.mid_point();
                        plot_ui.text(Text::new(
                            PlotPoint::new(x * 0.7, y * 0.7),
                            RichText::new(format!("{:.1}%", wedge.percent))
                                .size(11.0)
                                .color(Color32::BLACK),
                        ));
                    }
                }
            });
    }

    /// Draw the price and volume summary table.
    pub fn draw_summary_table(
        ui: &mut egui::Ui,
        id: &str,
        price: &SeriesSummary,
        volume: &SeriesSummary,
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Series", "N", "Mean", "Min", "Max", "Std"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for (name, prefix, summary) in
                            [("Average Price", "$", price), ("Total Volume", "", volume)]
                        {
                            ui.label(RichText::new(name).size(11.0));
                            ui.label(RichText::new(summary.count.to_string()).size(11.0));
                            for value in [summary.mean, summary.min, summary.max, summary.std_dev] {
                                let text = if value.is_nan() {
                                    "-".to_string()
                                } else {
                                    format!("{}{}", prefix, format_compact(value))
                                };
                                ui.label(RichText::new(text).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
