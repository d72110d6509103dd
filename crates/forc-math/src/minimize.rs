// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Bounded 1-D Minimizer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Local 1-D minimization seeded at a given point.
//!
//! Two stages:
//!   1. downhill bracketing: walk from the seed in the descending direction
//!      with a growing (capped) step until the function turns up again;
//!   2. golden-section search inside that bracket.
//!
//! The result is the minimum of the basin that contains the seed, never a
//! global search. Hysteretic particle models depend on this to keep their
//! branch memory.

/// 1/φ, the golden-section shrink factor.
const INV_GOLDEN: f64 = 0.618_033_988_749_894_9;

/// Bracket growth factor.
const GOLDEN: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy)]
pub struct MinimizeConfig {
    /// First probe distance from the seed.
    pub initial_step: f64,
    /// Largest single bracketing step.
    pub max_step: f64,
    /// Cap on bracketing steps before giving up.
    pub max_bracket_steps: usize,
    /// Absolute bracket width at which golden-section search stops.
    pub tol: f64,
    /// Cap on golden-section iterations.
    pub max_iters: usize,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        Self {
            initial_step: 1e-2,
            max_step: 0.05,
            max_bracket_steps: 128,
            tol: 1e-10,
            max_iters: 200,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MinimizeResult {
    /// Best point found (the minimizer when `converged`).
    pub x: f64,
    pub fx: f64,
    /// Function evaluations spent in bracketing and search.
    pub evaluations: usize,
    pub converged: bool,
}

/// A bracketing triple `lo < mid < hi` with `f(mid) <= f(lo), f(hi)`.
#[derive(Debug, Clone, Copy)]
pub struct Bracket {
    pub lo: f64,
    pub mid: f64,
    pub hi: f64,
    pub f_mid: f64,
}

/// Walk downhill from `x0` until the function rises.
///
/// Returns `Err((x_best, f_best, evaluations))` when no bracket is found
/// within `max_bracket_steps`.
pub fn bracket_downhill<F>(
    f: &F,
    x0: f64,
    config: &MinimizeConfig,
) -> Result<(Bracket, usize), (f64, f64, usize)>
where
    F: Fn(f64) -> f64,
{
    let step = config.initial_step;
    let f0 = f(x0);
    let fp = f(x0 + step);
    let fm = f(x0 - step);
    let mut evaluations = 3;

    if fp >= f0 && fm >= f0 {
        return Ok((
            Bracket {
                lo: x0 - step,
                mid: x0,
                hi: x0 + step,
                f_mid: f0,
            },
            evaluations,
        ));
    }

    let dir = if fp <= fm { 1.0 } else { -1.0 };
    let mut a = x0;
    let mut b = x0 + dir * step;
    let mut fb = fp.min(fm);
    let mut width = step;

    for _ in 0..config.max_bracket_steps {
        width = (width * GOLDEN).min(config.max_step);
        let c = b + dir * width;
        let fc = f(c);
        evaluations += 1;

        if fc >= fb {
            let (lo, hi) = if dir > 0.0 { (a, c) } else { (c, a) };
            return Ok((
                Bracket {
                    lo,
                    mid: b,
                    hi,
                    f_mid: fb,
                },
                evaluations,
            ));
        }
        a = b;
        b = c;
        fb = fc;
    }

    Err((b, fb, evaluations))
}

/// Golden-section search on `[lo, hi]`.
pub fn golden_section<F>(f: &F, lo: f64, hi: f64, tol: f64, max_iters: usize) -> MinimizeResult
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut x1 = hi - INV_GOLDEN * (hi - lo);
    let mut x2 = lo + INV_GOLDEN * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);
    let mut evaluations = 2;
    let mut converged = false;

    for _ in 0..max_iters {
        if hi - lo <= tol {
            converged = true;
            break;
        }
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_GOLDEN * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_GOLDEN * (hi - lo);
            f2 = f(x2);
        }
        evaluations += 1;
    }
    if !converged && hi - lo <= tol {
        converged = true;
    }

    let (x, fx) = if f1 < f2 { (x1, f1) } else { (x2, f2) };
    MinimizeResult {
        x,
        fx,
        evaluations,
        converged,
    }
}

/// Minimum of the basin containing `x0`.
///
/// Never fails: when bracketing or the search runs out of budget the best
/// candidate seen is returned with `converged == false`.
pub fn minimize_local<F>(f: F, x0: f64, config: &MinimizeConfig) -> MinimizeResult
where
    F: Fn(f64) -> f64,
{
    match bracket_downhill(&f, x0, config) {
        Ok((bracket, bracket_evals)) => {
            let mut result = golden_section(&f, bracket.lo, bracket.hi, config.tol, config.max_iters);
            result.evaluations += bracket_evals;
            // Golden section on a flat-bottomed bracket can end on a slightly
            // worse point than the bracket midpoint.
            if bracket.f_mid < result.fx {
                result.x = bracket.mid;
                result.fx = bracket.f_mid;
            }
            result
        }
        Err((x, fx, evaluations)) => MinimizeResult {
            x,
            fx,
            evaluations,
            converged: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_parabola_minimum() {
        let res = minimize_local(|x| (x - 1.3) * (x - 1.3) + 2.0, 0.0, &MinimizeConfig::default());
        assert!(res.converged);
        assert!((res.x - 1.3).abs() < 1e-6, "x = {}", res.x);
        assert!((res.fx - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_seed_at_minimum_stays() {
        let res = minimize_local(|x| x.cos(), PI, &MinimizeConfig::default());
        assert!(res.converged);
        assert!((res.x - PI).abs() < 1e-6);
    }

    #[test]
    fn test_stays_in_seed_basin() {
        // cos has minima at ±π, ±3π ...; seeding near 3π must not return π.
        let res = minimize_local(|x| x.cos(), 3.0 * PI - 0.4, &MinimizeConfig::default());
        assert!(res.converged);
        assert!((res.x - 3.0 * PI).abs() < 1e-6, "x = {}", res.x);

        let res = minimize_local(|x| x.cos(), -PI + 0.7, &MinimizeConfig::default());
        assert!((res.x + PI).abs() < 1e-6, "x = {}", res.x);
    }

    #[test]
    fn test_unbounded_below_reports_non_convergence() {
        let config = MinimizeConfig {
            max_bracket_steps: 8,
            ..MinimizeConfig::default()
        };
        let res = minimize_local(|x| -x, 0.0, &config);
        assert!(!res.converged);
        assert!(res.x > 0.0);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let config = MinimizeConfig {
            max_iters: 3,
            ..MinimizeConfig::default()
        };
        let res = minimize_local(|x| (x - 0.5) * (x - 0.5), 0.0, &config);
        assert!(!res.converged);
        // Still a usable candidate.
        assert!((res.x - 0.5).abs() < 0.2);
    }

    #[test]
    fn test_bracket_orders_endpoints() {
        let config = MinimizeConfig::default();
        let (bracket, _) =
            bracket_downhill(&|x: f64| (x + 2.0).powi(2), 0.0, &config).expect("bracket");
        assert!(bracket.lo < bracket.mid && bracket.mid < bracket.hi);
        assert!(bracket.lo <= -2.0 && bracket.hi >= -2.0);
    }
}
