use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use srf_crosscal::config::RunConfig;
use srf_crosscal::data::loader::load_results;
use srf_crosscal::data::model::{Observation, RadianceTable};
use srf_crosscal::regression::{fit_linear, LinearFit};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    pub config: RunConfig,

    /// Loaded results table (None until a file loads).
    pub table: Option<RadianceTable>,

    /// Path the table was read from.
    pub source: Option<PathBuf>,

    /// Predictor and response columns.
    pub x_column: String,
    pub y_column: String,

    /// Selected row index range, end exclusive.
    pub row_start: usize,
    pub row_end: usize,

    /// Points passing the row selection with both columns present (cached).
    pub observations: Vec<Observation>,

    /// Fit over `observations`, if there are any.
    pub fit: Option<LinearFit>,

    /// Colour points by their `Profile` value instead of a single colour.
    pub color_by_profile: bool,
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: RunConfig) -> Self {
        Self {
            x_column: config.x_column(),
            y_column: config.y_column(),
            row_start: config.row_selection.start,
            row_end: config.row_selection.end,
            config,
            table: None,
            source: None,
            observations: Vec::new(),
            fit: None,
            color_by_profile: false,
            color_map: None,
            status_message: None,
        }
    }

    /// Read a results table from disk and fit it.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let table = load_results(path)
            .with_context(|| format!("loading results table {}", path.display()))?;
        self.source = Some(path.to_path_buf());
        self.set_table(table);
        Ok(())
    }

    /// Ingest a table and recompute the fit.
    pub fn set_table(&mut self, table: RadianceTable) {
        self.table = Some(table);
        self.status_message = None;
        self.refit();
    }

    /// Recompute observations, fit and colours after any selection change.
    pub fn refit(&mut self) {
        self.observations.clear();
        self.fit = None;
        self.color_map = None;

        let Some(table) = &self.table else {
            return;
        };

        let observations =
            match table.pairs(&self.x_column, &self.y_column, self.row_start..self.row_end) {
                Ok(obs) => obs,
                Err(e) => {
                    log::error!("Cannot select observations: {e}");
                    self.status_message = Some(format!("Error: {e}"));
                    return;
                }
            };

        let points: Vec<[f64; 2]> = observations.iter().map(|o| [o.x, o.y]).collect();
        match fit_linear(&points) {
            Ok(fit) => {
                log::info!(
                    "Fitted {} vs {} over {} points: {}",
                    self.y_column,
                    self.x_column,
                    fit.n,
                    fit.annotation().replace('\n', ", ")
                );
                self.fit = Some(fit);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("No regression: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }

        let profiles: BTreeSet<&str> = observations.iter().map(|o| o.profile.as_str()).collect();
        self.color_map = Some(ColorMap::new(profiles));
        self.observations = observations;
    }

    /// Columns offered as regression axes.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.table
            .as_ref()
            .map(|t| t.numeric_columns())
            .unwrap_or_default()
    }

    /// Smallest and largest x over the observations.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        if self.observations.is_empty() {
            return None;
        }
        let min = self.observations.iter().map(|o| o.x).fold(f64::INFINITY, f64::min);
        let max = self.observations.iter().map(|o| o.x).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    pub fn y_min(&self) -> Option<f64> {
        self.observations.iter().map(|o| o.y).reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    fn state_with(csv: &str) -> AppState {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        let mut state = AppState::new(RunConfig::default());
        state.load(file.path()).unwrap();
        state
    }

    #[test]
    fn load_fits_default_columns() {
        let state = state_with(
            "Profile,VZA,VAA,SZA,SAA,modis_rad,mersi_rad\n\
             P1,0.0,0.0,30.0,180.0,1.000000,3.000000\n\
             P1,10.0,0.0,30.0,180.0,2.000000,5.000000\n\
             P2,0.0,0.0,30.0,180.0,nan,9.000000\n\
             P2,10.0,0.0,30.0,180.0,4.000000,9.000000\n",
        );
        assert_eq!(state.observations.len(), 3);
        let fit = state.fit.unwrap();
        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_eq!(state.x_extent(), Some((1.0, 4.0)));
        assert_eq!(state.y_min(), Some(3.0));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn row_selection_and_missing_column() {
        let mut state = state_with(
            "Profile,modis_rad,mersi_rad\n\
             P1,1.0,3.0\n\
             P1,2.0,5.0\n\
             P1,3.0,8.0\n",
        );
        state.row_end = 2;
        state.refit();
        assert_eq!(state.observations.len(), 2);
        assert_abs_diff_eq!(state.fit.unwrap().r_squared, 1.0, epsilon = 1e-12);

        state.y_column = "VZA".to_string();
        state.refit();
        assert!(state.fit.is_none());
        assert!(state.status_message.is_some());
    }
}
