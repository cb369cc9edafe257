//! Avocado Analytics Main Application
//! Main window with control panel and chart viewer.

use crate::config::AppConfig;
use crate::data::{DataProcessor, Dataset, Selection};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::{DashboardSnapshot, ReportError, ReportGenerator};
use crate::stats::StaticCharts;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

const REPORT_TITLE: &str = "Avocado Analytics Report";

/// Main application window.
pub struct DashboardApp {
    dataset: Arc<Dataset>,
    config: AppConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    /// Selection the current charts were computed for
    rendered_for: Option<Selection>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset: Arc<Dataset>,
        static_charts: StaticCharts,
        config: AppConfig,
    ) -> Self {
        let selection = Selection::initial(&dataset, &config.default_region, &config.default_type);
        Self {
            control_panel: ControlPanel::new(&dataset, selection),
            chart_viewer: ChartViewer::new(static_charts),
            dataset,
            config,
            rendered_for: None,
        }
    }

    /// Re-run the filter callback when any control changed.
    fn refresh_charts(&mut self) {
        let selection = &self.control_panel.selection;
        if self.rendered_for.as_ref() == Some(selection) {
            return;
        }

        let charts = DataProcessor::update_charts(&self.dataset, selection);
        self.chart_viewer.set_charts(charts);
        self.rendered_for = Some(selection.clone());
    }

    fn snapshot(&self) -> Option<DashboardSnapshot<'_>> {
        Some(DashboardSnapshot {
            selection: self.rendered_for.as_ref()?,
            charts: self.chart_viewer.charts.as_ref()?,
            static_charts: &self.chart_viewer.static_charts,
        })
    }

    fn pick_save_path(filter_name: &str, extension: &str, file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter_name, &[extension])
            .set_file_name(file_name)
            .save_file()
    }

    /// Handle PPT export - render charts to memory and write the PPTX
    fn handle_export_ppt(&mut self) {
        let Some(output_path) =
            Self::pick_save_path("PowerPoint", "pptx", "avocado_report.pptx")
        else {
            return; // User cancelled
        };

        let result = match self.snapshot() {
            Some(snapshot) => snapshot.render().and_then(|rendered| {
                ReportGenerator::generate_pptx(&rendered, &output_path, REPORT_TITLE)
                    .map(|()| rendered.len())
            }),
            None => {
                self.control_panel.set_status("No charts to export");
                return;
            }
        };

        match result {
            Ok(slides) => {
                self.control_panel
                    .set_status(format!("PPT exported: {} slides", slides));
                self.open_exported(&output_path);
            }
            Err(e) => self.report_export_error("PPT", &e),
        }
    }

    fn handle_export_json(&mut self) {
        let Some(output_path) = Self::pick_save_path("JSON", "json", "avocado_charts.json") else {
            return;
        };

        let result = match self.snapshot() {
            Some(snapshot) => ReportGenerator::export_json(&snapshot, &output_path),
            None => {
                self.control_panel.set_status("No charts to export");
                return;
            }
        };

        match result {
            Ok(()) => self
                .control_panel
                .set_status(format!("JSON exported: {}", output_path.display())),
            Err(e) => self.report_export_error("JSON", &e),
        }
    }

    fn report_export_error(&mut self, kind: &str, e: &ReportError) {
        error!(error = %e, "{} export failed", kind);
        self.control_panel
            .set_status(format!("{} export error: {}", kind, e));
    }

    fn open_exported(&self, path: &Path) {
        if !self.config.open_after_export {
            return;
        }
        if let Err(e) = open::that(path) {
            warn!(error = %e, path = %path.display(), "could not open exported file");
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::ExportPpt => self.handle_export_ppt(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        self.refresh_charts();

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
