//! Control Panel Widget
//! Left side panel with the data source controls and filter selections.

use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};
use egui_extras::DatePickerButton;

use crate::data::FilterCriteria;

/// Sentinel option meaning "no restriction" for a filter dimension.
pub const ALL: &str = "All";

/// Actions emitted by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    /// A filter selection changed; re-run the pipeline.
    FiltersChanged,
    /// User wants to pick a different data directory.
    BrowseDataDir,
    /// User forced a reload of the source files.
    Reload,
}

/// Left side control panel with the filter selections.
pub struct ControlPanel {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub selected_category: String,
    pub selected_status: String,
    pub selected_brand: String,

    pub categories: Vec<String>,
    pub statuses: Vec<String>,
    pub brands: Vec<String>,

    pub data_dir_label: String,
    pub status: String,
    dates_initialized: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            date_from: today,
            date_to: today,
            selected_category: ALL.to_string(),
            selected_status: ALL.to_string(),
            selected_brand: ALL.to_string(),
            categories: Vec::new(),
            statuses: Vec::new(),
            brands: Vec::new(),
            data_dir_label: String::new(),
            status: "Ready".to_string(),
            dates_initialized: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the filter vocabularies after a (re)load.
    pub fn update_vocabularies(
        &mut self,
        categories: Vec<String>,
        statuses: Vec<String>,
        brands: Vec<String>,
    ) {
        if !categories.contains(&self.selected_category) {
            self.selected_category = ALL.to_string();
        }
        if !statuses.contains(&self.selected_status) {
            self.selected_status = ALL.to_string();
        }
        if !brands.contains(&self.selected_brand) {
            self.selected_brand = ALL.to_string();
        }
        self.categories = categories;
        self.statuses = statuses;
        self.brands = brands;
    }

    /// Snap the date widgets to the extent of the loaded data. The user's
    /// range is kept when it still falls inside the new bounds.
    pub fn update_date_bounds(&mut self, min: NaiveDate, max: NaiveDate) {
        if !self.dates_initialized {
            self.date_from = min;
            self.date_to = max;
            self.dates_initialized = true;
            return;
        }
        self.date_from = self.date_from.clamp(min, max);
        self.date_to = self.date_to.clamp(self.date_from, max);
    }

    /// Current selections as pipeline criteria.
    pub fn criteria(&self) -> FilterCriteria {
        let pick = |selected: &str| {
            if selected == ALL {
                None
            } else {
                Some(selected.to_string())
            }
        };
        FilterCriteria {
            date_range: Some((self.date_from, self.date_to)),
            category: pick(&self.selected_category),
            status: pick(&self.selected_status),
            brand: pick(&self.selected_brand),
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
                RichText::new("🚗 FleetLens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Car Rental Analytics")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.data_dir_label).size(12.0));
                ui.horizontal(|ui| {
                    if ui.button("📂 Browse").clicked() {
                        action = ControlPanelAction::BrowseDataDir;
                    }
                    if ui.button("⟳ Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔎 Filters").size(14.0).strong());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("From:");
            let changed = ui
                .push_id("filter_date_from", |ui| {
                    ui.add(DatePickerButton::new(&mut self.date_from))
                })
                .inner
                .changed();
            if changed {
                if self.date_to < self.date_from {
                    self.date_to = self.date_from;
                }
                action = ControlPanelAction::FiltersChanged;
            }
        });
        ui.horizontal(|ui| {
            ui.label("To:");
            let changed = ui
                .push_id("filter_date_to", |ui| {
                    ui.add(DatePickerButton::new(&mut self.date_to))
                })
                .inner
                .changed();
            if changed {
                if self.date_from > self.date_to {
                    self.date_from = self.date_to;
                }
                action = ControlPanelAction::FiltersChanged;
            }
        });

        ui.add_space(8.0);

        if filter_combo(ui, "category_filter", "Category:", &self.categories, &mut self.selected_category) {
            action = ControlPanelAction::FiltersChanged;
        }
        if filter_combo(ui, "status_filter", "Status:", &self.statuses, &mut self.selected_status) {
            action = ControlPanelAction::FiltersChanged;
        }
        if filter_combo(ui, "brand_filter", "Brand:", &self.brands, &mut self.selected_brand) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new(&self.status).size(12.0).color(Color32::GRAY));

        action
    }
}

/// A labeled "All"-plus-values combo. Returns true when the selection
/// changed.
fn filter_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    options: &[String],
    selected: &mut String,
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized([70.0, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(150.0)
            .selected_text(selected.clone())
            .show_ui(ui, |ui| {
                if ui.selectable_label(selected.as_str() == ALL, ALL).clicked() {
                    *selected = ALL.to_string();
                    changed = true;
                }
                for option in options {
                    if ui
                        .selectable_label(selected.as_str() == option.as_str(), option)
                        .clicked()
                    {
                        *selected = option.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}
