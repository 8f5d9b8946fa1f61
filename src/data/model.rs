use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use crate::error::{Result, SrfError};

// ---------------------------------------------------------------------------
// Spectrum – sampled curve over wavenumber
// ---------------------------------------------------------------------------

/// A sampled spectral curve: simulated radiance or a normalized response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    /// Wavenumber axis (x).
    pub x: Vec<f64>,
    /// Radiance or response (y) – same length as `x`.
    pub y: Vec<f64>,
}

impl Spectrum {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Spectrum { x, y }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = pairs.into_iter().unzip();
        Spectrum { x, y }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the spectrum has no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Smallest and largest wavenumber, or `None` when empty.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let min = self.x.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Simulation case – one MODTRAN run directory
// ---------------------------------------------------------------------------

/// Atmospheric profile encoded at the start of a case folder name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// `P<digits>`
    Number(u64),
    /// `P<anything else>`, kept verbatim (without the `P`).
    Label(String),
    /// Name does not start with `P`.
    Unknown,
}

impl Profile {
    /// Numeric profile index, `None` for labels that did not parse.
    pub fn number(&self) -> Option<u64> {
        match self {
            Profile::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Unparsable profiles sort after every numbered one.
    fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Number(n) => write!(f, "P{n}"),
            Profile::Label(s) => write!(f, "P{s}"),
            Profile::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Viewing and illumination angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub vza: f64,
    pub vaa: f64,
    pub sza: f64,
    pub saa: f64,
}

impl Geometry {
    pub fn new(vza: f64, vaa: f64, sza: f64, saa: f64) -> Self {
        Geometry { vza, vaa, sza, saa }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.vza, self.vaa, self.sza, self.saa]
    }

    fn sort_cmp(&self, other: &Self) -> Ordering {
        self.vza
            .total_cmp(&other.vza)
            .then(self.vaa.total_cmp(&other.vaa))
            .then(self.sza.total_cmp(&other.sza))
            .then(self.saa.total_cmp(&other.saa))
    }
}

/// Metadata recovered from a case folder name.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseName {
    pub profile: Profile,
    pub geometry: Geometry,
}

/// A run directory together with its parsed name.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationCase {
    pub dir: PathBuf,
    pub profile: Profile,
    pub geometry: Geometry,
}

impl SimulationCase {
    /// Folder name as shown in log messages.
    pub fn name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir.display().to_string())
    }

    /// Output order: profile number, vza, vaa, sza, saa, then folder path.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.profile
            .sort_cmp(&other.profile)
            .then_with(|| self.geometry.sort_cmp(&other.geometry))
            .then_with(|| self.dir.cmp(&other.dir))
    }
}

// ---------------------------------------------------------------------------
// Band radiances and the result table
// ---------------------------------------------------------------------------

/// Band radiance per sensor for one case, in configured sensor order.
/// `None` marks a sensor whose convolution failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandRadiances {
    values: Vec<(String, Option<f64>)>,
}

impl BandRadiances {
    pub fn insert(&mut self, sensor: &str, value: Option<f64>) {
        match self.values.iter_mut().find(|(name, _)| name == sensor) {
            Some(slot) => slot.1 = value,
            None => self.values.push((sensor.to_string(), value)),
        }
    }

    /// Radiance of `sensor`; `None` if missing or never computed.
    pub fn get(&self, sensor: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == sensor)
            .and_then(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub case: SimulationCase,
    pub radiances: BandRadiances,
}

/// All successfully processed cases, sorted for output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    /// Sensor names in column order.
    pub sensors: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CellValue – one cell of a results table read back from disk
// ---------------------------------------------------------------------------

/// A loosely-typed CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Empty or `nan`-like cell.
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RadianceTable – results CSV as loaded by the viewer
// ---------------------------------------------------------------------------

/// One point of the regression scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
    /// Value of the `Profile` column, used for colouring.
    pub profile: String,
}

/// A results table read back from CSV, column order preserved.
#[derive(Debug, Clone, Default)]
pub struct RadianceTable {
    pub column_names: Vec<String>,
    pub rows: Vec<BTreeMap<String, CellValue>>,
}

impl RadianceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns holding at least one number and no text.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_names
            .iter()
            .filter(|col| {
                let mut any_number = false;
                for row in &self.rows {
                    match row.get(*col) {
                        Some(CellValue::Number(_)) => any_number = true,
                        Some(CellValue::Text(_)) => return false,
                        _ => {}
                    }
                }
                any_number
            })
            .cloned()
            .collect()
    }

    /// Observations for rows in `rows` (clamped to the table) where both
    /// columns hold a number.
    pub fn pairs(&self, x_col: &str, y_col: &str, rows: Range<usize>) -> Result<Vec<Observation>> {
        for col in [x_col, y_col] {
            if !self.column_names.iter().any(|c| c == col) {
                return Err(SrfError::MissingColumn(col.to_string()));
            }
        }

        let end = rows.end.min(self.rows.len());
        let start = rows.start.min(end);

        Ok(self.rows[start..end]
            .iter()
            .filter_map(|row| {
                let x = row.get(x_col)?.as_f64()?;
                let y = row.get(y_col)?.as_f64()?;
                let profile = row
                    .get("Profile")
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                Some(Observation { x, y, profile })
            })
            .collect())
    }
}
