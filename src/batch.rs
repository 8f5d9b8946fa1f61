//! Batch convolution over a directory of MODTRAN runs.
//!
//! ```text
//!  base_dir/
//!    P1_angle_0.0_0.0_30.0_180.0/tape7 ─┐
//!    P1_angle_10.0_0.0_30.0_180.0/tape7 ├─▶ read_tape7 ─▶ convolve × sensors ─▶ ResultRow
//!    ...                               ─┘
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::{radiance_column, SensorConfig};
use crate::convolve::convolve;
use crate::data::case::parse_case_name;
use crate::data::loader::{read_srf, read_tape7};
use crate::data::model::{BandRadiances, ResultRow, ResultTable, SimulationCase, Spectrum};
use crate::error::{Result, SrfError};

/// File name of the MODTRAN output inside each case directory.
pub const TAPE7_FILE_NAME: &str = "tape7";

/// A sensor's normalized SRF, loaded once per run.
#[derive(Debug, Clone)]
pub struct SensorCurve {
    pub name: String,
    pub srf: Spectrum,
}

/// Load every configured SRF. Any failure aborts the run.
pub fn load_sensor_curves(sensors: &[SensorConfig]) -> Result<Vec<SensorCurve>> {
    sensors
        .iter()
        .map(|sensor| {
            let srf = read_srf(&sensor.srf_path).inspect_err(|e| {
                log::error!("Failed to read SRF {}: {e}", sensor.name);
            })?;
            log::info!("Read SRF {} ({} samples)", sensor.name, srf.len());
            Ok(SensorCurve {
                name: sensor.name.clone(),
                srf,
            })
        })
        .collect()
}

/// Immediate sub-directories of `base_dir`, parsed and in output order.
pub fn discover_cases(base_dir: &Path) -> Result<Vec<SimulationCase>> {
    let entries = std::fs::read_dir(base_dir).map_err(|e| SrfError::io(base_dir, e))?;

    let mut cases = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SrfError::io(base_dir, e))?.path();
        if !path.is_dir() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parsed = parse_case_name(&name);
        cases.push(SimulationCase {
            dir: path,
            profile: parsed.profile,
            geometry: parsed.geometry,
        });
    }

    cases.sort_by(|a, b| a.sort_cmp(b));
    Ok(cases)
}

/// Convolve one case's tape7 with every sensor curve.
///
/// A sensor whose convolution fails is logged and recorded as missing; only
/// a missing or unreadable tape7 fails the whole case.
pub fn process_case(case_dir: &Path, curves: &[SensorCurve]) -> Result<BandRadiances> {
    let tape7 = case_dir.join(TAPE7_FILE_NAME);
    if !tape7.is_file() {
        return Err(SrfError::MissingFile(tape7));
    }
    let radiance = read_tape7(&tape7)?;

    let mut radiances = BandRadiances::default();
    for curve in curves {
        let value = match convolve(&radiance, &curve.srf) {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("Convolution failed for {} in {}: {e}", curve.name, case_dir.display());
                None
            }
        };
        radiances.insert(&curve.name, value);
    }
    Ok(radiances)
}

/// Process every case under `base_dir`. Failed cases are logged and left
/// out of the table.
pub fn run_batch(base_dir: &Path, curves: &[SensorCurve]) -> Result<ResultTable> {
    let cases = discover_cases(base_dir)?;
    log::info!("Found {} case folders in {}", cases.len(), base_dir.display());

    let mut table = ResultTable {
        sensors: curves.iter().map(|c| c.name.clone()).collect(),
        rows: Vec::with_capacity(cases.len()),
    };
    for case in cases {
        match process_case(&case.dir, curves) {
            Ok(radiances) => {
                log::info!("Processed {}", case.name());
                table.rows.push(ResultRow { case, radiances });
            }
            Err(e) => log::error!("Failed to process {}: {e}", case.name()),
        }
    }
    Ok(table)
}

/// Write `table` as CSV to `path`.
pub fn write_results(path: &Path, table: &ResultTable) -> Result<()> {
    let file = File::create(path).map_err(|e| SrfError::io(path, e))?;
    write_results_to(file, table)?;
    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write `table` as CSV: geometry columns then one `<sensor>_rad` per sensor.
pub fn write_results_to<W: Write>(writer: W, table: &ResultTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = ["Profile", "VZA", "VAA", "SZA", "SAA"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(table.sensors.iter().map(|s| radiance_column(s)));
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.case.profile.to_string()];
        record.extend(row.case.geometry.as_array().iter().map(|&a| format_angle(a)));
        record.extend(
            table
                .sensors
                .iter()
                .map(|s| format_radiance(row.radiances.get(s))),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Shortest round-trip form that always keeps a decimal point (`10.0`).
fn format_angle(angle: f64) -> String {
    format!("{angle:?}")
}

fn format_radiance(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => "nan".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Geometry, Profile};
    use std::path::PathBuf;

    #[test]
    fn csv_layout() {
        let mut radiances = BandRadiances::default();
        radiances.insert("modis", Some(1.23456789));
        radiances.insert("mersi", None);

        let table = ResultTable {
            sensors: vec!["modis".into(), "mersi".into()],
            rows: vec![ResultRow {
                case: SimulationCase {
                    dir: PathBuf::from("P5_angle_10_20.5_0_180"),
                    profile: Profile::Number(5),
                    geometry: Geometry::new(10.0, 20.5, 0.0, 180.0),
                },
                radiances,
            }],
        };

        let mut out = Vec::new();
        write_results_to(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Profile,VZA,VAA,SZA,SAA,modis_rad,mersi_rad\n\
             P5,10.0,20.5,0.0,180.0,1.234568,nan\n"
        );
    }

    #[test]
    fn missing_tape7_fails_case() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            process_case(dir.path(), &[]),
            Err(SrfError::MissingFile(p)) if p.ends_with(TAPE7_FILE_NAME)
        ));
    }

    #[test]
    fn unreadable_srf_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let sensors = [SensorConfig::new("modis", "MODIS", dir.path().join("missing.txt"))];
        assert!(load_sensor_curves(&sensors).is_err());
    }
}
