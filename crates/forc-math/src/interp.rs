// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Interp
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Piecewise-linear interpolation on tabulated 1-D samples.

/// Linear interpolation of `ys` over ascending `xs` at `x`.
///
/// Clamps to the end values outside `[xs[0], xs[n-1]]`; callers that need
/// extrapolation handle the out-of-range cases themselves. Returns 0.0 for
/// empty input.
pub fn interp_linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // First index with xs[k] > x; 1 <= k <= n-1 here.
    let k = xs[..n].partition_point(|&v| v <= x);
    let (x0, x1) = (xs[k - 1], xs[k]);
    let (y0, y1) = (ys[k - 1], ys[k]);
    let span = x1 - x0;
    if span <= 0.0 {
        return y1;
    }
    let t = (x - x0) / span;
    y0 + t * (y1 - y0)
}

/// Slope of the secant through the last two samples.
///
/// Zero when fewer than two samples exist or the last two share an abscissa.
pub fn end_slope(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let dx = xs[n - 1] - xs[n - 2];
    if dx == 0.0 {
        return 0.0;
    }
    (ys[n - 1] - ys[n - 2]) / dx
}

/// Slope of the secant from the origin through `(x, y)`; zero at `x == 0`.
pub fn origin_secant_slope(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        y / x
    }
}
