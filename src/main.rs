//! FleetLens - Car Rental Fleet Analytics Dashboard
//!
//! Loads the rental datasets and displays interactive KPIs, charts, and
//! detail tables over them.

use eframe::egui;
use fleetlens::gui::FleetLensApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("FleetLens"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "FleetLens",
        options,
        Box::new(|cc| Ok(Box::new(FleetLensApp::new(cc)))),
    )
}
