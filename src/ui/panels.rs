use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::classify::ColumnKind;
use crate::state::AppState;
use crate::ui::{plot, tables};

pub const PAGE_TITLE: &str = "Personality analysis: Extroverts vs Introverts";

const WARNING: Color32 = Color32::from_rgb(230, 160, 30);

// ---------------------------------------------------------------------------
// Left side panel – feature and chart selection
// ---------------------------------------------------------------------------

/// Render the left sidebar: selectors and the class distribution.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters and chart settings");
    ui.separator();

    if state.halted() {
        ui.label("No features to select.");
        return;
    }

    // Clone what we need so we can mutate state inside the widgets.
    let features = state.features.clone();
    let current = state
        .selection
        .as_ref()
        .map(|s| s.feature.name.clone())
        .unwrap_or_default();

    ui.strong("Select a feature to analyse:");
    egui::ComboBox::from_id_salt("feature")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for feature in &features {
                if ui
                    .selectable_label(current == feature.name, &feature.name)
                    .clicked()
                {
                    state.select_feature(&feature.name);
                }
            }
        });
    ui.add_space(8.0);

    if let Some(selection) = state.selection.clone() {
        let prompt = match selection.feature.kind {
            ColumnKind::Boolean => "Chart type for boolean features:",
            _ => "Chart type for numeric features:",
        };
        ui.strong(prompt);
        for &kind in state.chart_options() {
            if ui.radio(selection.chart == kind, kind.to_string()).clicked() {
                state.select_chart(kind);
            }
        }
    }

    ui.add_space(8.0);
    ui.separator();
    ui.strong("Overall personality distribution");
    if let Some(colors) = &state.color_map {
        plot::class_count_chart(ui, &state.class_counts, colors);
    }
}

// ---------------------------------------------------------------------------
// Central panel – raw data, chart and statistics
// ---------------------------------------------------------------------------

/// Render the main page top to bottom; stops at the first halting condition.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(PAGE_TITLE);
            ui.add_space(4.0);

            if let Some(err) = &state.load_error {
                ui.label(RichText::new(err).color(Color32::RED));
                return;
            }

            let Some(dataset) = &state.dataset else {
                ui.label("Open a file to start  (File → Open…)");
                return;
            };

            egui::CollapsingHeader::new("View raw data")
                .id_salt("raw_data_header")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    tables::raw_data_table(ui, dataset);
                });

            if let Some(msg) = &state.status_message {
                ui.label(RichText::new(msg).color(WARNING));
                return;
            }

            let Some(selection) = &state.selection else {
                return;
            };

            ui.add_space(8.0);
            ui.heading(format!(
                "Comparison of {} between extroverts and introverts",
                selection.feature.name
            ));

            match &state.report {
                Some(Ok(report)) => {
                    if let Some(colors) = &state.color_map {
                        plot::report_chart(ui, &report.chart, colors);
                    }
                    ui.add_space(8.0);
                    ui.heading(format!(
                        "Descriptive statistics for {}",
                        selection.feature.name
                    ));
                    tables::summary_table(ui, &report.summary);
                }
                Some(Err(e)) => {
                    ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
                }
                None => {}
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(path)) = (&state.dataset, &state.source_path) {
            ui.label(format!("{} rows loaded from {}", ds.len(), path.display()));
            ui.separator();
        }

        ui.label(format!("Variant: {:?}", state.config.variant));
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open personality dataset")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
