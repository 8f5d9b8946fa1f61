use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – fit controls
// ---------------------------------------------------------------------------

/// Render the left panel: axis columns, row range, colouring and fit summary.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Regression");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No results table loaded.");
        return;
    };
    let n_rows = table.len();
    let columns = state.numeric_columns();

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Axis selectors ----
            ui.strong("X (predictor)");
            changed |= column_combo(ui, "x_column", &mut state.x_column, &columns);
            ui.strong("Y (response)");
            changed |= column_combo(ui, "y_column", &mut state.y_column, &columns);
            ui.separator();

            // ---- Row range ----
            ui.strong(format!("Rows  ({n_rows} in table)"));
            ui.horizontal(|ui: &mut Ui| {
                ui.label("from");
                changed |= ui
                    .add(egui::DragValue::new(&mut state.row_start).range(0..=n_rows))
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(egui::DragValue::new(&mut state.row_end).range(0..=usize::MAX))
                    .changed();
            });
            ui.separator();

            ui.checkbox(&mut state.color_by_profile, "Color by profile");
            ui.separator();

            // ---- Fit summary ----
            ui.strong("Fit");
            match &state.fit {
                Some(fit) => {
                    egui::Grid::new("fit_summary").show(ui, |ui: &mut Ui| {
                        ui.label("points");
                        ui.label(fit.n.to_string());
                        ui.end_row();
                        ui.label("slope");
                        ui.label(format!("{:.6}", fit.slope));
                        ui.end_row();
                        ui.label("intercept");
                        ui.label(format!("{:.6}", fit.intercept));
                        ui.end_row();
                        ui.label("R²");
                        ui.label(format!("{:.6}", fit.r_squared));
                        ui.end_row();
                    });
                }
                None => {
                    ui.label("No fit.");
                }
            }
        });

    if changed {
        state.refit();
    }
}

/// Column picker; returns whether the selection changed.
fn column_combo(ui: &mut Ui, id: &str, selected: &mut String, columns: &[String]) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(*selected == *col, col).clicked() && *selected != *col {
                    *selected = col.clone();
                    changed = true;
                }
            }
        });
    changed
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

        if let (Some(table), Some(path)) = (&state.table, &state.source) {
            ui.label(format!(
                "{}: {} rows, {} used in fit",
                path.display(),
                table.len(),
                state.observations.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open results table")
        .add_filter("Delimited text", &["csv", "txt", "tsv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
