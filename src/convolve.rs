//! SRF-weighted band radiance.
//!
//! The band radiance a sensor sees is the radiance spectrum averaged with the
//! channel's spectral response as weight:
//!
//! ```text
//!        ∫ L(ν) R(ν) dν
//! L̄  =  ──────────────
//!          ∫ R(ν) dν
//! ```
//!
//! Both integrals are evaluated with the trapezoid rule on the radiance
//! wavenumber grid, restricted to the SRF support, with `R` linearly
//! interpolated onto that grid.

use crate::data::model::Spectrum;
use crate::error::{Result, SrfError};

/// Piecewise-linear interpolant over a sampled curve; zero outside its domain.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    /// Build from any sample order; samples are sorted by `x`.
    pub fn new(curve: &Spectrum) -> Self {
        let mut pairs: Vec<(f64, f64)> = curve.iter().collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (x, y) = pairs.into_iter().unzip();
        LinearInterpolator { x, y }
    }

    /// Interpolated value at `x`, or 0.0 outside `[x_min, x_max]`.
    pub fn at(&self, x: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.x.first(), self.x.last()) else {
            return 0.0;
        };
        if !(first..=last).contains(&x) {
            return 0.0;
        }

        // First index with self.x[i] >= x; in-range so always valid.
        let i = self.x.partition_point(|&xi| xi < x);
        if i == 0 || self.x[i] == x {
            return self.y[i];
        }
        let (x0, x1) = (self.x[i - 1], self.x[i]);
        let (y0, y1) = (self.y[i - 1], self.y[i]);
        let t = (x - x0) / (x1 - x0);
        y0 * (1.0 - t) + y1 * t
    }
}

/// Trapezoid-rule integral of `y` over `x` (same length, `x` ascending).
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// SRF-weighted mean of `radiance` over the support of `srf`.
///
/// `radiance` must be sorted by wavenumber, as returned by
/// [`read_tape7`](crate::data::loader::read_tape7).
pub fn convolve(radiance: &Spectrum, srf: &Spectrum) -> Result<f64> {
    let (lo, hi) = srf.x_range().ok_or(SrfError::NoOverlap)?;

    let (wavenumber, rad): (Vec<f64>, Vec<f64>) = radiance
        .iter()
        .filter(|&(wn, _)| wn >= lo && wn <= hi)
        .unzip();
    if wavenumber.is_empty() {
        return Err(SrfError::NoOverlap);
    }

    let interp = LinearInterpolator::new(srf);
    let response: Vec<f64> = wavenumber.iter().map(|&wn| interp.at(wn)).collect();
    let weighted: Vec<f64> = rad.iter().zip(&response).map(|(l, r)| l * r).collect();

    let numerator = trapezoid(&weighted, &wavenumber);
    let denominator = trapezoid(&response, &wavenumber);
    if denominator == 0.0 {
        return Err(SrfError::ZeroSrfIntegral);
    }

    Ok(numerator / denominator)
}
