use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use srf_crosscal::batch::{load_sensor_curves, run_batch, write_results};
use srf_crosscal::config::SensorConfig;
use srf_crosscal::data::loader::load_results;
use srf_crosscal::data::model::{CellValue, Geometry, Profile};

/// Raw tape7 radiance at `wn`; `1 + wn / 1000` after unit scaling.
fn raw_radiance(wn: f64) -> f64 {
    (1.0 + wn / 1000.0) * 1e-8
}

fn tape7_text(wavenumbers: impl IntoIterator<Item = f64>) -> String {
    let mut text = String::from(
        "***** MODTRAN5 *****\n\
         FREQ TOT_TRANS PTH_THRML THRML_SCT SURF_EMIS SOL_SCAT SING_SCAT GRND_RFLT DRCT_RFLT TOTAL_RAD\n",
    );
    for wn in wavenumbers {
        text.push_str(&format!(
            "{wn:9.1} 0.9 1.0E-07 0.0 2.0E-07 0.0 0.0 0.0 {:e} 3.0E-06\n",
            raw_radiance(wn)
        ));
    }
    text.push_str(" -9999.\n");
    text
}

fn write_case(base: &Path, name: &str, tape7: Option<String>) {
    let dir = base.join(name);
    fs::create_dir(&dir).unwrap();
    if let Some(text) = tape7 {
        fs::write(dir.join("tape7"), text).unwrap();
    }
}

fn write_box_srf(path: &Path, lo: f64, hi: f64) {
    let mut text = String::from("Sensor SRF, arbitrary header\nchannel 1 response table\n");
    let mut wn = lo;
    while wn <= hi {
        text.push_str(&format!("{wn:.1}  0.8\n"));
        wn += 10.0;
    }
    fs::write(path, text).unwrap();
}

fn setup() -> (TempDir, Vec<SensorConfig>) {
    let tmp = TempDir::new().unwrap();
    let srf_dir = tmp.path().join("srf");
    let base = tmp.path().join("runs");
    fs::create_dir(&srf_dir).unwrap();
    fs::create_dir(&base).unwrap();

    write_box_srf(&srf_dir.join("modis.txt"), 1000.0, 1100.0);
    write_box_srf(&srf_dir.join("mersi.txt"), 2000.0, 2100.0);
    let sensors = vec![
        SensorConfig::new("modis", "MODIS", srf_dir.join("modis.txt")),
        SensorConfig::new("mersi", "MERSI-II", srf_dir.join("mersi.txt")),
    ];

    let full = || Some(tape7_text((900..=2200).map(f64::from)));
    write_case(&base, "P2_angle_10.0_0.0_30.0_180.0", full());
    write_case(&base, "P1_angle_20.0_0.0_30.0_180.0", full());
    // Only covers the first band.
    write_case(
        &base,
        "P1_angle_10.0_0.0_30.0_180.0",
        Some(tape7_text((900..=1200).map(f64::from))),
    );
    // Same samples, written in descending order.
    write_case(
        &base,
        "Pref_angle_0_0_0_0",
        Some(tape7_text((900..=2200).rev().map(f64::from))),
    );
    write_case(&base, "P3_noangletag", full());
    write_case(&base, "P4_angle_1_2_3_4", None);
    fs::write(base.join("notes.txt"), "not a case").unwrap();

    (tmp, sensors)
}

#[test]
fn batch_end_to_end() {
    let (tmp, sensors) = setup();
    let base = tmp.path().join("runs");

    let curves = load_sensor_curves(&sensors).unwrap();
    let table = run_batch(&base, &curves).unwrap();

    // P4 has no tape7 and notes.txt is not a directory.
    let names: Vec<String> = table.rows.iter().map(|r| r.case.name()).collect();
    assert_eq!(
        names,
        [
            "P1_angle_10.0_0.0_30.0_180.0",
            "P1_angle_20.0_0.0_30.0_180.0",
            "P2_angle_10.0_0.0_30.0_180.0",
            "P3_noangletag",
            "Pref_angle_0_0_0_0",
        ]
    );

    let partial = &table.rows[0];
    assert_abs_diff_eq!(partial.radiances.get("modis").unwrap(), 2.05, epsilon = 1e-9);
    assert_eq!(partial.radiances.get("mersi"), None);

    let full = &table.rows[1];
    assert_abs_diff_eq!(full.radiances.get("modis").unwrap(), 2.05, epsilon = 1e-9);
    assert_abs_diff_eq!(full.radiances.get("mersi").unwrap(), 3.05, epsilon = 1e-9);

    assert_eq!(table.rows[3].case.profile, Profile::Number(3));
    assert_eq!(table.rows[3].case.geometry, Geometry::default());

    // Row order in the tape7 does not change the result.
    let reversed = &table.rows[4];
    assert_eq!(reversed.case.profile, Profile::Label("ref".into()));
    assert_eq!(reversed.radiances, full.radiances);

    // Write and read back.
    let csv_path = tmp.path().join("results.csv");
    write_results(&csv_path, &table).unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Profile,VZA,VAA,SZA,SAA,modis_rad,mersi_rad")
    );
    assert_eq!(
        lines.next(),
        Some("P1,10.0,0.0,30.0,180.0,2.050000,nan")
    );

    let loaded = load_results(&csv_path).unwrap();
    assert_eq!(loaded.len(), 5);
    assert_eq!(loaded.rows[0]["mersi_rad"], CellValue::Missing);
    assert_eq!(loaded.rows[4]["Profile"], CellValue::Text("Pref".into()));

    let obs = loaded.pairs("modis_rad", "mersi_rad", 0..3600).unwrap();
    assert_eq!(obs.len(), 4);
    for o in &obs {
        assert_abs_diff_eq!(o.x, 2.05, epsilon = 1e-9);
        assert_abs_diff_eq!(o.y, 3.05, epsilon = 1e-9);
    }
}

#[test]
fn bad_srf_aborts_before_cases() {
    let (tmp, mut sensors) = setup();
    let broken = tmp.path().join("srf").join("broken.txt");
    fs::write(&broken, "header only\nnothing numeric here\n").unwrap();
    sensors[1].srf_path = broken;

    assert!(load_sensor_curves(&sensors).is_err());
}
