use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::Summary;
use crate::data::model::RecordTable;

// ---------------------------------------------------------------------------
// Raw data viewer
// ---------------------------------------------------------------------------

/// Scrollable grid of every row of the dataset.
pub fn raw_data_table(ui: &mut Ui, table: &RecordTable) {
    let n_cols = table.column_names.len();

    ui.push_id("raw_data", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(300.0)
                .columns(Column::auto().at_least(60.0), n_cols)
                .header(20.0, |mut header| {
                    for name in &table.column_names {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, table.len(), |mut row| {
                        let cells = &table.rows[row.index()];
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
    });
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Statistic (or feature value) per row, one column per class.
pub fn summary_table(ui: &mut Ui, summary: &Summary) {
    let classes = summary.classes();

    egui::Grid::new("summary_table")
        .striped(true)
        .num_columns(classes.len() + 1)
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for class in classes {
                ui.strong(class);
            }
            ui.end_row();

            for (r, label) in summary.row_labels().iter().enumerate() {
                ui.strong(label);
                for c in 0..classes.len() {
                    ui.monospace(summary.format_cell(r, c));
                }
                ui.end_row();
            }
        });
}
