mod app;
mod color;
mod state;
mod ui;

use app::RegressionApp;
use eframe::egui;
use srf_crosscal::config::RunConfig;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = RunConfig::default();
    let input = config.output_csv.clone();
    let mut state = AppState::new(config);

    match state.load(&input) {
        Ok(()) => {
            if let Some(fit) = &state.fit {
                println!("{fit}");
            }
        }
        Err(e) => {
            log::error!("{e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SRF cross-calibration – regression",
        options,
        Box::new(move |cc| {
            // White background like a printed figure.
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(RegressionApp::new(state)))
        }),
    )
}
