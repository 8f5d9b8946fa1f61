use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SrfError};

use super::model::{CellValue, RadianceTable, Spectrum};

/// Converts tape7 radiance (W cm⁻² sr⁻¹ / cm⁻¹) to the output unit.
pub const RADIANCE_SCALE: f64 = 1e8;

/// Lines starting with this marker are tape7 headers or separators.
const TAPE7_HEADER_MARKER: &str = "***";

/// Zero-based tape7 column holding the radiance of interest.
const TAPE7_RADIANCE_COLUMN: usize = 8;

// ---------------------------------------------------------------------------
// MODTRAN tape7
// ---------------------------------------------------------------------------

/// Read the (wavenumber, radiance) spectrum from a MODTRAN `tape7` file.
///
/// Every line that is not a `***` header and splits into at least nine
/// numeric fields contributes `(field 0, field 8)`; anything else is
/// skipped. The result is sorted by wavenumber and scaled by
/// [`RADIANCE_SCALE`].
pub fn read_tape7(path: &Path) -> Result<Spectrum> {
    let file = File::open(path).map_err(|e| SrfError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut samples: Vec<(f64, f64)> = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| SrfError::io(path, e))?;
        if let Some(sample) = parse_tape7_line(&line) {
            samples.push(sample);
        }
    }

    if samples.is_empty() {
        return Err(SrfError::MissingData(path.to_path_buf()));
    }

    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    log::debug!("{}: {} radiance samples", path.display(), samples.len());

    Ok(Spectrum::from_pairs(
        samples.into_iter().map(|(wn, rad)| (wn, rad * RADIANCE_SCALE)),
    ))
}

fn parse_tape7_line(line: &str) -> Option<(f64, f64)> {
    let trimmed = line.trim();
    if trimmed.starts_with(TAPE7_HEADER_MARKER) {
        return None;
    }
    let values = parse_all_floats(trimmed)?;
    if values.len() > TAPE7_RADIANCE_COLUMN {
        Some((values[0], values[TAPE7_RADIANCE_COLUMN]))
    } else {
        None
    }
}

/// Every whitespace token as `f64`, or `None` if any token is not a number.
fn parse_all_floats(line: &str) -> Option<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| tok.parse::<f64>().ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Spectral response function
// ---------------------------------------------------------------------------

/// Read a spectral response function and normalize it to a peak of 1.
///
/// The header has no fixed length: data starts at the first line made of
/// exactly two numeric tokens. A header line that happens to look like that
/// is taken as data. Samples keep the file order.
pub fn read_srf(path: &Path) -> Result<Spectrum> {
    let text = std::fs::read_to_string(path).map_err(|e| SrfError::io(path, e))?;
    let lines: Vec<&str> = text.lines().collect();

    let start = lines
        .iter()
        .position(|line| parse_two_columns(line).is_some())
        .ok_or_else(|| SrfError::NoSrfData(path.to_path_buf()))?;

    let mut samples = Vec::with_capacity(lines.len() - start);
    for (i, line) in lines.iter().enumerate().skip(start) {
        if line.trim().is_empty() {
            continue;
        }
        let sample = parse_two_columns(line).ok_or_else(|| SrfError::MalformedSrfRow {
            path: path.to_path_buf(),
            line: i + 1,
        })?;
        samples.push(sample);
    }

    let peak = samples
        .iter()
        .map(|&(_, response)| response)
        .fold(f64::NEG_INFINITY, f64::max);
    if !(peak.is_finite() && peak > 0.0) {
        return Err(SrfError::NonPositiveResponse(path.to_path_buf()));
    }

    log::debug!(
        "{}: header ends at line {}, {} SRF samples",
        path.display(),
        start,
        samples.len()
    );

    Ok(Spectrum::from_pairs(
        samples.into_iter().map(|(wn, response)| (wn, response / peak)),
    ))
}

fn parse_two_columns(line: &str) -> Option<(f64, f64)> {
    let mut tokens = line.split_whitespace();
    let wn = tokens.next()?.parse::<f64>().ok()?;
    let response = tokens.next()?.parse::<f64>().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((wn, response))
}

// ---------------------------------------------------------------------------
// Results table
// ---------------------------------------------------------------------------

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Load a results table written by the batch driver (or edited by hand).
/// The delimiter is guessed from the header line.
pub fn load_results(path: &Path) -> Result<RadianceTable> {
    let header = {
        let file = File::open(path).map_err(|e| SrfError::io(path, e))?;
        let mut first = String::new();
        BufReader::new(file)
            .read_line(&mut first)
            .map_err(|e| SrfError::io(path, e))?;
        first
    };
    let delimiter = sniff_delimiter(&header);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let column_names: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: BTreeMap<String, CellValue> = column_names
            .iter()
            .enumerate()
            .map(|(i, col)| (col.clone(), guess_cell_type(record.get(i).unwrap_or(""))))
            .collect();
        rows.push(row);
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        rows.len(),
        column_names,
        path.display()
    );

    Ok(RadianceTable { column_names, rows })
}

/// The candidate that occurs most often in `header`, comma on a tie or when
/// none occur.
fn sniff_delimiter(header: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for &candidate in &DELIMITER_CANDIDATES {
        let count = header.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || is_missing_marker(s) {
        return CellValue::Missing;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => CellValue::Missing,
        Ok(v) => CellValue::Number(v),
        Err(_) => CellValue::Text(s.to_string()),
    }
}

fn is_missing_marker(s: &str) -> bool {
    matches!(s, "NA" | "N/A" | "null" | "NULL") || s.eq_ignore_ascii_case("nan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const TAPE7: &str = "\
*** MODTRAN header
 ***** separator *****
   FREQ  TOT_TRANS  PTH_THRML  THRML_SCT  SURF_EMIS   SOL_SCAT  SING_SCAT  GRND_RFLT  DRCT_RFLT  TOTAL_RAD
 2000.0  0.1  0.2  0.3  0.4  0.5  0.6  0.7  2.0E-06  9.9
 1999.0  0.1  0.2  0.3  0.4  0.5  0.6  0.7  1.0E-06  9.9
 2001.0  0.1  0.2  0.3  0.4  0.5  0.6  0.7  3.0E-06
 2002.0  0.1  0.2  0.3  0.4  0.5  0.6  0.7
 -9999.
";

    #[test]
    fn tape7_keeps_nine_column_rows_sorted_and_scaled() {
        let file = write_temp(TAPE7);
        let spectrum = read_tape7(file.path()).unwrap();

        assert_eq!(spectrum.x, [1999.0, 2000.0, 2001.0]);
        assert_relative_eq!(spectrum.y[0], 100.0, max_relative = 1e-12);
        assert_relative_eq!(spectrum.y[1], 200.0, max_relative = 1e-12);
        assert_relative_eq!(spectrum.y[2], 300.0, max_relative = 1e-12);
    }

    #[test]
    fn tape7_without_data_is_missing_data() {
        let file = write_temp("*** header only\n 1.0 2.0 3.0\nFREQ TRANS\n");
        assert!(matches!(
            read_tape7(file.path()),
            Err(SrfError::MissingData(_))
        ));
    }

    #[test]
    fn tape7_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_tape7(&dir.path().join("tape7")),
            Err(SrfError::Io { .. })
        ));
    }

    #[test]
    fn srf_skips_header_and_normalizes() {
        let file = write_temp(
            "MODIS Aqua band 3 SRF\n\
             channel 3 wavenumbers 2\n\
             columns: wavenumber response\n\
             2100.0  0.5\n\
             2101.0  2.0\n\
             \n\
             2099.0  1.0\n",
        );
        let srf = read_srf(file.path()).unwrap();
        assert_eq!(srf.x, [2100.0, 2101.0, 2099.0]);
        assert_eq!(srf.y, [0.25, 1.0, 0.5]);
    }

    #[test]
    fn srf_header_with_two_numbers_is_taken_as_data() {
        // Known ambiguity: "3 2" looks like a data row.
        let file = write_temp("3 2\n10.0 1.0\n");
        let srf = read_srf(file.path()).unwrap();
        assert_eq!(srf.x, [3.0, 10.0]);
    }

    #[test]
    fn srf_errors() {
        let file = write_temp("header\nno data here\n");
        assert!(matches!(read_srf(file.path()), Err(SrfError::NoSrfData(_))));

        let file = write_temp("header\n1.0 0.5\n2.0 oops\n");
        assert!(matches!(
            read_srf(file.path()),
            Err(SrfError::MalformedSrfRow { line: 3, .. })
        ));

        let file = write_temp("1.0 0.0\n2.0 0.0\n");
        assert!(matches!(
            read_srf(file.path()),
            Err(SrfError::NonPositiveResponse(_))
        ));
    }

    #[test]
    fn results_table_with_semicolons_and_nan() {
        let file = write_temp(
            "Profile;VZA;VAA;SZA;SAA;modis_rad;mersi_rad\n\
             P1;10.0;0.0;30.0;180.0;1.500000;1.600000\n\
             P2;10.0;0.0;30.0;180.0;nan;1.700000\n",
        );
        let table = load_results(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names[5], "modis_rad");
        assert_eq!(table.rows[1]["modis_rad"], CellValue::Missing);
        assert_eq!(table.rows[0]["Profile"], CellValue::Text("P1".into()));
        assert_eq!(table.rows[0]["mersi_rad"], CellValue::Number(1.6));
    }

    #[test]
    fn delimiter_sniffing() {
        assert_eq!(sniff_delimiter("a,b,c"), b',');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter("a|b"), b'|');
        assert_eq!(sniff_delimiter("single"), b',');
    }
}
