// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::FIELD_DECIMALS;
use crate::error::{HysteresisError, HysteresisResult};
use ndarray::{Array1, Array2};

/// A grid value that may be missing.
/// `None` marks cells with no data: outside the reversal triangle,
/// undersampled for a fit, or masked out of the (Hc, Hu) rectangle.
pub type Cell = Option<f64>;

/// Round to a fixed number of decimal places (ties to even).
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Allocate a grid with every cell undefined.
pub fn undefined_grid(shape: (usize, usize)) -> Array2<Cell> {
    Array2::from_elem(shape, None)
}

/// NaN-filled copy of a cell grid, for consumers that expect plain floats.
pub fn cells_to_nan(cells: &Array2<Cell>) -> Array2<f64> {
    cells.mapv(|c| c.unwrap_or(f64::NAN))
}

/// Requested coercivity/bias rectangle. `min_hc` is always 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcBounds {
    pub min_hc: f64,
    pub max_hc: f64,
    pub min_hu: f64,
    pub max_hu: f64,
}

impl ForcBounds {
    pub fn new(max_hc: f64, min_hu: f64, max_hu: f64) -> HysteresisResult<Self> {
        if !max_hc.is_finite() || max_hc < 0.0 {
            return Err(HysteresisError::ConfigError(format!(
                "max_hc must be finite and >= 0, got {max_hc}"
            )));
        }
        if !min_hu.is_finite() || !max_hu.is_finite() {
            return Err(HysteresisError::ConfigError(format!(
                "bias bounds must be finite, got [{min_hu}, {max_hu}]"
            )));
        }
        if min_hu > max_hu {
            return Err(HysteresisError::ConfigError(format!(
                "min_hu ({min_hu}) must not exceed max_hu ({max_hu})"
            )));
        }
        Ok(ForcBounds {
            min_hc: 0.0,
            max_hc,
            min_hu,
            max_hu,
        })
    }

    /// Reversal-field span `[min_hu - max_hc, max_hu - min_hc]`.
    pub fn reversal_range(&self) -> (f64, f64) {
        (self.min_hu - self.max_hc, self.max_hu - self.min_hc)
    }

    /// Largest applied field the sweep must reach.
    pub fn max_applied_field(&self) -> f64 {
        self.max_hu + self.max_hc
    }

    /// Closed-rectangle membership test in (Hc, Hu) coordinates.
    pub fn contains(&self, hc: f64, hu: f64) -> bool {
        hc >= self.min_hc && hc <= self.max_hc && hu >= self.min_hu && hu <= self.max_hu
    }
}

/// Reversal-field / applied-field grid with precomputed meshgrids.
///
/// Rows index reversal fields (`hr`), columns index applied fields (`h`).
/// `h` starts with an exact copy of `hr` and continues with the same mean
/// step until it reaches the largest field the bounds require.
#[derive(Debug, Clone)]
pub struct ForcGrid {
    pub n_reversal: usize,
    pub n_applied: usize,
    pub hr: Array1<f64>,
    pub h: Array1<f64>,
    pub step: f64,
    pub h_grid: Array2<f64>,  // [n_reversal, n_applied], h_grid[[i, j]] = h[j]
    pub hr_grid: Array2<f64>, // [n_reversal, n_applied], hr_grid[[i, j]] = hr[i]
}

impl ForcGrid {
    pub fn new(bounds: &ForcBounds, resolution: usize) -> HysteresisResult<Self> {
        if resolution < 2 {
            return Err(HysteresisError::ConfigError(format!(
                "grid resolution must be >= 2, got {resolution}"
            )));
        }
        let (min_hr, max_hr) = bounds.reversal_range();
        if max_hr <= min_hr {
            return Err(HysteresisError::ConfigError(format!(
                "reversal field span is empty: [{min_hr}, {max_hr}]"
            )));
        }

        let hr = Array1::linspace(min_hr, max_hr, resolution)
            .mapv(|v| round_to(v, FIELD_DECIMALS));
        if hr.windows(2).into_iter().any(|w| w[1] <= w[0]) {
            return Err(HysteresisError::ConfigError(format!(
                "resolution {resolution} is too fine for span [{min_hr}, {max_hr}] at {FIELD_DECIMALS} decimals"
            )));
        }

        let n_reversal = resolution;
        let last_hr = hr[n_reversal - 1];
        let step = (last_hr - hr[0]) / (n_reversal - 1) as f64;
        let max_h = bounds.max_applied_field().max(last_hr);
        let slack = step * 1e-9;

        let mut h: Vec<f64> = hr.to_vec();
        let mut k = 1usize;
        while h[h.len() - 1] < max_h - slack {
            h.push(last_hr + k as f64 * step);
            k += 1;
        }
        let h = Array1::from_vec(h);
        let n_applied = h.len();

        let h_grid = Array2::from_shape_fn((n_reversal, n_applied), |(_, j)| h[j]);
        let hr_grid = Array2::from_shape_fn((n_reversal, n_applied), |(i, _)| hr[i]);

        Ok(ForcGrid {
            n_reversal,
            n_applied,
            hr,
            h,
            step,
            h_grid,
            hr_grid,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_reversal, self.n_applied)
    }

    /// A cell is measurable only once the field has swept up past its
    /// reversal point.
    #[inline]
    pub fn is_measurable(&self, i: usize, j: usize) -> bool {
        self.h[j] >= self.hr[i]
    }
}
