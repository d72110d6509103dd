// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Default number of reversal fields (grid resolution).
pub const DEFAULT_RESOLUTION: usize = 101;

/// Default half-width of the local fit window, in grid-index units.
pub const DEFAULT_SMOOTHING_FACTOR: usize = 4;

/// Unknowns in the local quadratic surface model; also the minimum sample
/// count for a fit.
pub const QUADRATIC_TERMS: usize = 6;

/// Decimal places kept for field coordinates (Hr, Hc, Hu).
pub const FIELD_DECIMALS: i32 = 4;

/// Field magnitude that saturates a Stoner–Wohlfarth particle in reduced
/// units (outside the astroid for every easy-axis angle).
pub const SW_SATURATION_FIELD: f64 = 1.5;
