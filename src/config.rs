//! Run constants for both entry points.
//!
//! There is no configuration file or command line: edit these values and
//! rebuild.

use std::ops::Range;
use std::path::PathBuf;

/// Directory holding one sub-directory per MODTRAN run.
pub const BASE_DIR: &str = "F:/modtran5/MODTRAN_Sunny3";

/// Results table written by the batch driver and read by the viewer.
pub const OUTPUT_CSV: &str = "D:/example/srf/modtran_dual_srf_comparison.csv";

/// `(name, display label, SRF path)` per sensor, in output column order.
pub const SENSORS: [(&str, &str, &str); 2] = [
    (
        "modis",
        "MODIS",
        "D:/example/srf/aqua/rtcoef_eos_2_modis-C7_srf_ch03.txt",
    ),
    (
        "mersi",
        "MERSI-II",
        "D:/example/srf/fy3d/rtcoef_fy3_4_mersi2_srf_ch01.txt",
    ),
];

/// Row indices of the results table used for the regression.
pub const ROW_SELECTION: Range<usize> = 0..3600;

/// One sensor channel to convolve against.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Short identifier, also the prefix of the radiance column (`<name>_rad`).
    pub name: String,
    /// Human-readable name used on plot axes.
    pub label: String,
    pub srf_path: PathBuf,
}

impl SensorConfig {
    pub fn new(name: &str, label: &str, srf_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            srf_path: srf_path.into(),
        }
    }

    /// Name of this sensor's column in the results table.
    pub fn column(&self) -> String {
        radiance_column(&self.name)
    }
}

/// Column name holding the band radiance of sensor `name`.
pub fn radiance_column(name: &str) -> String {
    format!("{name}_rad")
}

/// Everything a run needs, gathered from the constants above.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_dir: PathBuf,
    pub output_csv: PathBuf,
    pub sensors: Vec<SensorConfig>,
    pub row_selection: Range<usize>,
    /// Index into `sensors` of the regression predictor.
    pub x_sensor: usize,
    /// Index into `sensors` of the regression response.
    pub y_sensor: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(BASE_DIR),
            output_csv: PathBuf::from(OUTPUT_CSV),
            sensors: SENSORS
                .iter()
                .map(|&(name, label, path)| SensorConfig::new(name, label, path))
                .collect(),
            row_selection: ROW_SELECTION,
            x_sensor: 0,
            y_sensor: 1,
        }
    }
}

impl RunConfig {
    pub fn x_column(&self) -> String {
        self.sensors[self.x_sensor].column()
    }

    pub fn y_column(&self) -> String {
        self.sensors[self.y_sensor].column()
    }

    /// Axis label for a radiance column, e.g. `"MODIS Rad"`.
    pub fn axis_label(&self, column: &str) -> String {
        self.sensors
            .iter()
            .find(|s| s.column() == column)
            .map(|s| format!("{} Rad", s.label))
            .unwrap_or_else(|| column.to_string())
    }
}
