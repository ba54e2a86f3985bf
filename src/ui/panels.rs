use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::ExportFormat;
use crate::data::model::Category;
use crate::data::reshape::ChartKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter and export controls
// ---------------------------------------------------------------------------

/// Render the left controls panel: category, year range, indicators,
/// chart kind, and export.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let (min_year, max_year) = dataset.year_bounds;
    let all_indicators = dataset.indicators_for(state.selection.category);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category ----
            ui.strong("Dataset");
            for category in Category::ALL {
                if ui
                    .radio(state.selection.category == category, category.label())
                    .clicked()
                {
                    state.set_category(category);
                }
            }
            ui.separator();

            // ---- Year range ----
            ui.strong("Year range");
            ui.horizontal(|ui: &mut Ui| {
                let mut start = state.selection.year_start;
                if ui
                    .add(
                        egui::DragValue::new(&mut start)
                            .range(min_year..=max_year)
                            .prefix("from "),
                    )
                    .changed()
                {
                    state.set_year_start(start);
                }
                let mut end = state.selection.year_end;
                if ui
                    .add(
                        egui::DragValue::new(&mut end)
                            .range(min_year..=max_year)
                            .prefix("to "),
                    )
                    .changed()
                {
                    state.set_year_end(end);
                }
            });
            ui.separator();

            // ---- Indicators ----
            let n_selected = state.selection.indicators.len();
            ui.strong(format!("Indicators  ({n_selected}/{})", all_indicators.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_indicators();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_indicators();
                }
            });
            for indicator in &all_indicators {
                let checked = state.selection.indicators.contains(indicator);
                let text =
                    RichText::new(indicator).color(state.color_map.color_for(indicator));
                let mut toggled = checked;
                if ui.checkbox(&mut toggled, text).changed() {
                    state.toggle_indicator(indicator);
                }
            }
            ui.separator();

            // ---- Chart kind ----
            ui.strong("Chart");
            egui::ComboBox::from_id_salt("chart_kind")
                .selected_text(state.chart_kind.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for kind in ChartKind::ALL {
                        if ui
                            .selectable_label(state.chart_kind == kind, kind.label())
                            .clicked()
                        {
                            state.chart_kind = kind;
                        }
                    }
                });
            ui.separator();

            // ---- Export ----
            ui.strong("Export data");
            for format in ExportFormat::ALL {
                if ui
                    .radio(state.export_format == format, format.label())
                    .clicked()
                {
                    state.export_format = format;
                }
            }
            if ui.button("Export selected data…").clicked() {
                export_dialog(state);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dataset) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} in view",
                dataset.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open balance-sheet data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows spanning {}..={}",
                    dataset.len(),
                    dataset.year_bounds.0,
                    dataset.year_bounds.1
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Encode the filtered table and ask where to save it. An empty table is a
/// status message ("nothing to export"), not a crash or an empty file.
fn export_dialog(state: &mut AppState) {
    let bytes = match state.export_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            state.status_message = Some(format!("Export failed: {e}"));
            return;
        }
    };

    let format = state.export_format;
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(state.export_file_name())
        .add_filter(format.label(), &[format.extension()])
        .save_file();

    if let Some(path) = file {
        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                log::info!(
                    "Exported {} rows as {} to {}",
                    state.filtered.len(),
                    format.mime(),
                    path.display()
                );
                state.status_message =
                    Some(format!("Exported {} rows to {}", state.filtered.len(), path.display()));
            }
            Err(e) => {
                log::error!("Failed to write export: {e}");
                state.status_message = Some(format!("Export failed: {e}"));
            }
        }
    }
}
