use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SrfError {
    #[error("no valid radiance samples found in {}", .0.display())]
    MissingData(PathBuf),
    #[error("no two-column numeric data row found in SRF file {}", .0.display())]
    NoSrfData(PathBuf),
    #[error("{}:{}: expected two numeric columns", .path.display(), .line)]
    MalformedSrfRow { path: PathBuf, line: usize },
    #[error("maximum response in SRF file {} is not a positive number", .0.display())]
    NonPositiveResponse(PathBuf),
    #[error("tape7 file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("SRF wavenumber range does not overlap the radiance spectrum")]
    NoOverlap,
    #[error("SRF integral is zero, wavenumber ranges may not match")]
    ZeroSrfIntegral,
    #[error("column '{0}' not found in results table")]
    MissingColumn(String),
    #[error("no observations left to fit")]
    EmptyRegression,
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SrfError>;

impl SrfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SrfError::Io {
            path: path.into(),
            source,
        }
    }
}
