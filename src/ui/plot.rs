use std::collections::BTreeMap;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Regression plot (central panel)
// ---------------------------------------------------------------------------

/// Render the observation scatter and fitted line in the central panel.
pub fn regression_plot(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a results table to fit  (File → Open…)");
        });
        return;
    }

    let x_label = state.config.axis_label(&state.x_column);
    let y_label = state.config.axis_label(&state.y_column);

    Plot::new("regression_plot")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            match (&state.color_map, state.color_by_profile) {
                (Some(cm), true) => {
                    let mut by_profile: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
                    for obs in &state.observations {
                        by_profile
                            .entry(obs.profile.as_str())
                            .or_default()
                            .push([obs.x, obs.y]);
                    }
                    for (profile, points) in by_profile {
                        plot_ui.points(
                            Points::new(PlotPoints::new(points))
                                .name(profile)
                                .color(cm.color_for(profile))
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(4.0),
                        );
                    }
                }
                _ => {
                    let points: PlotPoints =
                        state.observations.iter().map(|o| [o.x, o.y]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .name("Observation")
                            .color(Color32::RED)
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(4.0),
                    );
                }
            }

            let (Some(fit), Some((x_min, x_max)), Some(y_min)) =
                (&state.fit, state.x_extent(), state.y_min())
            else {
                return;
            };

            let line = PlotPoints::new(vec![
                [x_min, fit.predict(x_min)],
                [x_max, fit.predict(x_max)],
            ]);
            plot_ui.line(
                Line::new(line)
                    .name("Regression Line")
                    .color(Color32::BLACK)
                    .width(3.0),
            );

            plot_ui.text(
                Text::new(
                    PlotPoint::new(x_max, y_min),
                    RichText::new(fit.annotation()).size(18.0),
                )
                .color(Color32::BLACK)
                .anchor(Align2::RIGHT_BOTTOM),
            );
        });
}
