mod analysis;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::PersonaDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();
    log::info!(
        "Starting {:?} dashboard on {}",
        config.variant,
        config.data_path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    // The dataset is read once here and shared read-only with every frame.
    let mut state = AppState::new(config);
    state.load_configured();

    eframe::run_native(
        ui::panels::PAGE_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(PersonaDashApp::new(state)))),
    )
}
