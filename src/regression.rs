use std::fmt;

use crate::error::{Result, SrfError};

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit on its own samples.
    pub r_squared: f64,
    /// Number of samples used.
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Plot annotation: the equation and R² on two lines.
    pub fn annotation(&self) -> String {
        format!(
            "y = {:.4}x + {:.4}\nR² = {:.5}",
            self.slope, self.intercept, self.r_squared
        )
    }
}

impl fmt::Display for LinearFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Regression coefficient: {:.6}", self.slope)?;
        writeln!(f, "Intercept: {:.6}", self.intercept)?;
        write!(f, "R²: {:.6}", self.r_squared)
    }
}

/// Fit a line through `points` (`[x, y]`).
///
/// With constant `x` the slope is 0 and the intercept the mean of `y`. With
/// constant `y`, R² is 1 for an exact fit and 0 otherwise.
pub fn fit_linear(points: &[[f64; 2]]) -> Result<LinearFit> {
    if points.is_empty() {
        return Err(SrfError::EmptyRegression);
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let y_mean = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for &[x, y] in points {
        let dx = x - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let (mut ss_res, mut ss_tot) = (0.0, 0.0);
    for &[x, y] in points {
        let residual = y - (slope * x + intercept);
        ss_res += residual * residual;
        ss_tot += (y - y_mean) * (y - y_mean);
    }
    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        n: points.len(),
    })
}
