mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::DbuDashApp;
use eframe::egui;
use state::AppState;

/// Dataset location: first CLI argument, then the `DBU_DATA` environment
/// variable, then the bundled default.
fn data_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DBU_DATA").ok())
        .unwrap_or_else(|| "data/dbu_monthly.csv".to_string())
        .into()
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    // Load once at startup; a failure is not fatal, the user can still open
    // a file from the menu.
    let mut state = AppState::default();
    let path = data_path();
    match data::loader::load_file(&path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} rows from {} spanning {}..={}",
                dataset.len(),
                path.display(),
                dataset.year_bounds.0,
                dataset.year_bounds.1
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::warn!("Could not load {}: {e}", path.display());
            state.status_message = Some(format!("Could not load {}: {e}", path.display()));
        }
    }

    eframe::run_native(
        "DBU Dash – Sri Lanka Bank Balance Sheets",
        options,
        Box::new(move |_cc| Ok(Box::new(DbuDashApp::new(state)))),
    )
}
