//! FleetLens Main Application
//! Main window wiring the filter panel to the data pipeline.

use std::sync::Arc;

use egui::{Color32, RichText, SidePanel};

use crate::config::AppConfig;
use crate::data::processor::{date_bounds, DataProcessor, PreparedData};
use crate::data::{DataCache, DataLoader, DataOrigin};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use crate::run_pipeline;
use crate::stats::DashboardSummary;

/// Main application window.
pub struct FleetLensApp {
    config: AppConfig,
    cache: DataCache,
    control_panel: ControlPanel,
    dashboard: DashboardView,

    data: Option<Arc<PreparedData>>,
    summary: Option<DashboardSummary>,
    error: Option<String>,
}

impl FleetLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let cache = DataCache::new(DataLoader::new(&config), config.cache_ttl());

        let mut app = Self {
            control_panel: ControlPanel::new(),
            dashboard: DashboardView::new(),
            cache,
            config,
            data: None,
            summary: None,
            error: None,
        };
        app.control_panel.data_dir_label = app.config.data_dir.display().to_string();
        app.refresh();
        app
    }

    /// Fetch the (cached) prepared datasets and re-run the pipeline with
    /// the current criteria. One synchronous pass per interaction.
    fn refresh(&mut self) {
        match self.cache.get() {
            Ok(data) => {
                self.control_panel.update_vocabularies(
                    DataProcessor::unique_values(&data.vehicles, "category"),
                    DataProcessor::unique_values(&data.vehicles, "status"),
                    DataProcessor::unique_values(&data.vehicles, "brand"),
                );
                if let Some((min, max)) = date_bounds(&data.rentals, "start_date") {
                    self.control_panel.update_date_bounds(min, max);
                }
                self.data = Some(data);
                self.error = None;
                self.run_current_criteria();
            }
            Err(e) => {
                log::error!("Data load failed: {}", e);
                self.error = Some(e.to_string());
                self.control_panel.set_status("Load failed");
            }
        }
    }

    fn run_current_criteria(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        match run_pipeline(data, &self.control_panel.criteria()) {
            Ok(summary) => {
                self.control_panel.set_status(&format!(
                    "{} rentals in view",
                    summary.kpis.total_rentals
                ));
                self.summary = Some(summary);
                self.error = None;
            }
            Err(e) => {
                log::error!("Pipeline run failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Pick a new data directory and reload from it.
    fn handle_browse_data_dir(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.config.data_dir = dir;
            self.control_panel.data_dir_label = self.config.data_dir.display().to_string();
            self.cache.set_loader(DataLoader::new(&self.config));
            self.refresh();
        }
    }
}

impl eframe::App for FleetLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - filters and data source
        SidePanel::left("control_panel")
            .min_width(250.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::FiltersChanged => self.refresh(),
                        ControlPanelAction::BrowseDataDir => self.handle_browse_data_dir(),
                        ControlPanelAction::Reload => {
                            self.cache.invalidate();
                            self.refresh();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(data) = &self.data {
                if data.origin == DataOrigin::Sample {
                    ui.label(
                        RichText::new(
                            "⚠ Data files not found. Showing generated sample data.",
                        )
                        .color(Color32::from_rgb(243, 156, 18)),
                    );
                    ui.add_space(6.0);
                }
            }
            if let Some(error) = &self.error {
                ui.label(
                    RichText::new(format!("Error: {}", error)).color(Color32::LIGHT_RED),
                );
                return;
            }
            match &self.summary {
                Some(summary) => self.dashboard.show(ui, summary),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label("Loading data…");
                    });
                }
            }
        });
    }
}
