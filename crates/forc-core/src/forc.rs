// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — FORC Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! ForcEngine — first-order reversal curve measurement and distribution.
//!
//! 1. Sweep: for every reversal field Hr[i], saturate positive, step down to
//!    Hr[i], then record M[i, j] while the field climbs through H[j] ≥ Hr[i].
//! 2. Distribution: fit a quadratic surface to the defined M samples in a
//!    (2·SF)×(2·SF) window around each cell; P(H, Hr) = −∂²M/∂Hr∂H.
//! 3. Remap to coercivity Hc = (H − Hr)/2 and bias Hu = (H + Hr)/2, masking
//!    cells outside the requested rectangle.

use crate::matter::{MagneticMatter, Matter};
use forc_math::linalg::poly2_surface_fit;
use forc_types::config::{ForcParams, RunConfig};
use forc_types::constants::{FIELD_DECIMALS, QUADRATIC_TERMS};
use forc_types::error::HysteresisResult;
use forc_types::state::{round_to, undefined_grid, Cell, ForcBounds, ForcGrid};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// FORC measurement over a piece of magnetic matter.
#[derive(Debug, Clone)]
pub struct ForcEngine<M: MagneticMatter> {
    params: ForcParams,
    bounds: ForcBounds,
    grid: ForcGrid,
    matter: M,
    m_grid: Array2<Cell>,
    p_hhr: Array2<Cell>,
    hu_grid: Array2<Cell>,
    hc_grid: Array2<Cell>,
    p_hchu: Array2<Cell>,
}

impl ForcEngine<Matter> {
    /// Build matter and engine from a run configuration.
    pub fn from_config(config: &RunConfig) -> HysteresisResult<Self> {
        let matter = Matter::from_config(&config.matter)?;
        Self::new(config.forc.clone(), matter)
    }

    /// Create from a JSON run-configuration file.
    pub fn from_file(path: &str) -> HysteresisResult<Self> {
        let config = RunConfig::from_file(path)?;
        Self::from_config(&config)
    }
}

impl<M: MagneticMatter> ForcEngine<M> {
    /// Validate parameters, build the grid and allocate undefined outputs.
    pub fn new(params: ForcParams, matter: M) -> HysteresisResult<Self> {
        let bounds = params.bounds()?;
        let grid = ForcGrid::new(&bounds, params.resolution)?;
        let shape = grid.shape();
        debug!(
            n_reversal = shape.0,
            n_applied = shape.1,
            step = grid.step,
            "FORC grid built"
        );

        Ok(ForcEngine {
            params,
            bounds,
            grid,
            matter,
            m_grid: undefined_grid(shape),
            p_hhr: undefined_grid(shape),
            hu_grid: undefined_grid(shape),
            hc_grid: undefined_grid(shape),
            p_hchu: undefined_grid(shape),
        })
    }

    /// Sequential reversal sweep, highest reversal field first.
    ///
    /// The matter is left in the state reached at the end of the last
    /// (lowest) reversal branch.
    pub fn magnetization_forc(&mut self) {
        for i in (0..self.grid.n_reversal).rev() {
            let row = sweep_reversal_branch(&mut self.matter, &self.grid, i);
            store_row(&mut self.m_grid, i, row);
            debug!(branch = i, hr = self.grid.hr[i], "reversal branch recorded");
        }
    }

    /// Local fit over the magnetization surface followed by the (Hc, Hu)
    /// remap. Undersampled cells stay undefined.
    pub fn calculate_forc_distribution(&mut self) {
        let sf = self.params.smoothing_factor;
        let n_reversal = self.grid.n_reversal;
        let m_grid = &self.m_grid;
        let grid = &self.grid;

        let rows: Vec<Vec<Cell>> = if self.params.parallel {
            (0..n_reversal)
                .into_par_iter()
                .map(|i| fit_row(m_grid, grid, sf, i))
                .collect()
        } else {
            (0..n_reversal).map(|i| fit_row(m_grid, grid, sf, i)).collect()
        };
        for (i, row) in rows.into_iter().enumerate() {
            store_row(&mut self.p_hhr, i, row);
        }

        for i in 0..n_reversal {
            let hr = self.grid.hr[i];
            for j in 0..self.grid.n_applied {
                let h = self.grid.h[j];
                let hu = round_to(0.5 * (h + hr), FIELD_DECIMALS);
                let hc = round_to(0.5 * (h - hr), FIELD_DECIMALS);
                self.hu_grid[[i, j]] = Some(hu);
                self.hc_grid[[i, j]] = Some(hc);
                self.p_hchu[[i, j]] = if self.bounds.contains(hc, hu) {
                    self.p_hhr[[i, j]]
                } else {
                    None
                };
            }
        }
    }

    pub fn params(&self) -> &ForcParams {
        &self.params
    }

    /// (minHc, maxHc, minHu, maxHu).
    pub fn bounds(&self) -> &ForcBounds {
        &self.bounds
    }

    pub fn grid(&self) -> &ForcGrid {
        &self.grid
    }

    pub fn hr(&self) -> &Array1<f64> {
        &self.grid.hr
    }

    pub fn h(&self) -> &Array1<f64> {
        &self.grid.h
    }

    pub fn h_grid(&self) -> &Array2<f64> {
        &self.grid.h_grid
    }

    pub fn hr_grid(&self) -> &Array2<f64> {
        &self.grid.hr_grid
    }

    pub fn m_grid(&self) -> &Array2<Cell> {
        &self.m_grid
    }

    pub fn p_hhr(&self) -> &Array2<Cell> {
        &self.p_hhr
    }

    pub fn hu_grid(&self) -> &Array2<Cell> {
        &self.hu_grid
    }

    pub fn hc_grid(&self) -> &Array2<Cell> {
        &self.hc_grid
    }

    pub fn p_hchu(&self) -> &Array2<Cell> {
        &self.p_hchu
    }

    pub fn matter(&self) -> &M {
        &self.matter
    }
}

impl<M: MagneticMatter + Clone + Send + Sync> ForcEngine<M> {
    /// Reversal sweep with one matter clone per branch on the rayon pool.
    ///
    /// Every branch starts from positive saturation, so the grid matches the
    /// sequential sweep. The engine's own matter is not advanced.
    pub fn magnetization_forc_parallel(&mut self) {
        let grid = &self.grid;
        let template = &self.matter;
        let rows: Vec<Vec<Cell>> = (0..grid.n_reversal)
            .into_par_iter()
            .map(|i| {
                let mut matter = template.clone();
                sweep_reversal_branch(&mut matter, grid, i)
            })
            .collect();
        for (i, row) in rows.into_iter().enumerate() {
            store_row(&mut self.m_grid, i, row);
        }
    }

    /// Sweep (sequential or parallel per `params.parallel`) then distribution.
    pub fn run(&mut self) {
        let (n_reversal, n_applied) = self.grid.shape();
        info!(
            n_reversal,
            n_applied,
            parallel = self.params.parallel,
            "FORC sweep started"
        );
        if self.params.parallel {
            self.magnetization_forc_parallel();
        } else {
            self.magnetization_forc();
        }

        info!(
            smoothing_factor = self.params.smoothing_factor,
            "FORC distribution fit started"
        );
        self.calculate_forc_distribution();

        let defined = self.p_hchu.iter().filter(|c| c.is_some()).count();
        info!(defined_cells = defined, "FORC distribution complete");
    }
}

/// One reversal curve: saturate, reverse at Hr[i], climb through H[j] ≥ Hr[i].
fn sweep_reversal_branch<M: MagneticMatter>(
    matter: &mut M,
    grid: &ForcGrid,
    i: usize,
) -> Vec<Cell> {
    let mut row = vec![None; grid.n_applied];
    matter.saturate_to_positive();
    matter.magnetize(grid.hr[i]);
    for (j, cell) in row.iter_mut().enumerate() {
        if grid.is_measurable(i, j) {
            matter.magnetize(grid.h[j]);
            *cell = Some(matter.magnetization());
        }
    }
    row
}

fn store_row(target: &mut Array2<Cell>, i: usize, row: Vec<Cell>) {
    for (j, cell) in row.into_iter().enumerate() {
        target[[i, j]] = cell;
    }
}

fn fit_row(m_grid: &Array2<Cell>, grid: &ForcGrid, sf: usize, i: usize) -> Vec<Cell> {
    (0..grid.n_applied)
        .map(|j| {
            if grid.is_measurable(i, j) {
                local_forc_value(m_grid, grid, sf, i, j)
            } else {
                None
            }
        })
        .collect()
}

/// −a5 of the quadratic fit over the window [i−sf, i+sf) × [j−sf, j+sf),
/// clipped to the grid.
///
/// Coordinates are centred on the cell and divided by the grid step before
/// the solve; the cross term is rescaled by 1/step² afterwards.
fn local_forc_value(
    m_grid: &Array2<Cell>,
    grid: &ForcGrid,
    sf: usize,
    i: usize,
    j: usize,
) -> Cell {
    let (n_rows, n_cols) = grid.shape();
    let step = grid.step;
    let (hr0, h0) = (grid.hr[i], grid.h[j]);

    let rows = i.saturating_sub(sf)..i.saturating_add(sf).min(n_rows);
    let cols = j.saturating_sub(sf)..j.saturating_add(sf).min(n_cols);
    let capacity = rows.len() * cols.len();

    let mut xs = Vec::with_capacity(capacity);
    let mut ys = Vec::with_capacity(capacity);
    let mut ms = Vec::with_capacity(capacity);
    for u in rows {
        for v in cols.clone() {
            if let Some(m) = m_grid[[u, v]] {
                xs.push((grid.hr[u] - hr0) / step);
                ys.push((grid.h[v] - h0) / step);
                ms.push(m);
            }
        }
    }
    if ms.len() < QUADRATIC_TERMS {
        return None;
    }

    match poly2_surface_fit(&xs, &ys, &ms) {
        Ok(coeffs) => Some(-coeffs[5] / (step * step)),
        Err(e) => {
            warn!(i, j, error = %e, "local FORC fit failed");
            None
        }
    }
}
