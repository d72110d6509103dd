// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Stoner–Wohlfarth Particle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coherent-rotation (Stoner–Wohlfarth) single-domain particle.
//!
//! Reduced units: field in units of the anisotropy field, energy
//!
//!   E(φ) = ½ sin²(ψ − φ) − h cos φ
//!
//! where ψ is the easy-axis angle to the field and φ the magnetization
//! angle. The equilibrium is the local minimum reached from the previous
//! equilibrium, so the particle follows whichever branch its history put it
//! on until that minimum disappears at the switching field
//!
//!   h_sw = sqrt(1 − t² + t⁴) / (1 + t²),  t = cbrt(tan ψ).

use crate::particle::{MagneticParticle, Polarity};
use forc_math::minimize::{minimize_local, MinimizeConfig};
use forc_types::config::EasyAxisConvention;
use forc_types::constants::SW_SATURATION_FIELD;
use std::f64::consts::{PI, TAU};
use tracing::warn;

/// History carried between field applications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwState {
    pub branch: Polarity,
    /// Last equilibrium magnetization angle, wrapped into (−2π, 2π).
    pub phi: f64,
    pub last_field: f64,
    pub magnetization: f64,
}

#[derive(Debug, Clone)]
pub struct StonerWohlfarthParticle {
    psi: f64,
    convention: EasyAxisConvention,
    switching_field: f64,
    minimizer: MinimizeConfig,
    state: SwState,
}

/// Astroid switching field for easy-axis angle `psi`.
pub fn switching_field(psi: f64) -> f64 {
    let t = psi.tan().cbrt();
    let t2 = t * t;
    (1.0 - t2 + t2 * t2).sqrt() / (1.0 + t2)
}

impl StonerWohlfarthParticle {
    /// Particle with the canonical (reduced) easy-axis convention.
    pub fn new(psi: f64) -> Self {
        Self::with_convention(psi, EasyAxisConvention::Reduced)
    }

    pub fn with_convention(psi_in: f64, convention: EasyAxisConvention) -> Self {
        let psi = match convention {
            EasyAxisConvention::Reduced => psi_in.abs() % PI,
            EasyAxisConvention::Raw => psi_in,
        };
        StonerWohlfarthParticle {
            psi,
            convention,
            switching_field: switching_field(psi),
            minimizer: MinimizeConfig::default(),
            state: SwState {
                branch: Polarity::Positive,
                phi: psi,
                last_field: 0.0,
                magnetization: psi.cos(),
            },
        }
    }

    /// Override the equilibrium search budget.
    pub fn with_minimizer(mut self, minimizer: MinimizeConfig) -> Self {
        self.minimizer = minimizer;
        self
    }

    /// Easy-axis angle actually used (after applying the convention).
    pub fn psi(&self) -> f64 {
        self.psi
    }

    pub fn convention(&self) -> EasyAxisConvention {
        self.convention
    }

    pub fn switching_field(&self) -> f64 {
        self.switching_field
    }

    pub fn state(&self) -> SwState {
        self.state
    }

    pub fn energy(&self, phi: f64, field: f64) -> f64 {
        let s = (self.psi - phi).sin();
        0.5 * s * s - field * phi.cos()
    }

    pub fn transition(&self, state: SwState, field: f64) -> (SwState, f64) {
        let branch = if field >= self.switching_field {
            Polarity::Positive
        } else if field <= -self.switching_field {
            Polarity::Negative
        } else {
            state.branch
        };

        let result = minimize_local(|phi| self.energy(phi, field), state.phi, &self.minimizer);
        if !result.converged {
            warn!(
                psi = self.psi,
                field,
                phi = result.x,
                evaluations = result.evaluations,
                "Stoner-Wohlfarth equilibrium search did not converge; using best candidate"
            );
        }

        let phi = result.x % TAU;
        let magnetization = phi.cos();
        (
            SwState {
                branch,
                phi,
                last_field: field,
                magnetization,
            },
            magnetization,
        )
    }
}

impl MagneticParticle for StonerWohlfarthParticle {
    fn apply_field(&mut self, field: f64) -> f64 {
        let (next, m) = self.transition(self.state, field);
        self.state = next;
        m
    }

    fn set_up(&mut self) {
        self.apply_field(SW_SATURATION_FIELD);
    }

    fn set_down(&mut self) {
        self.apply_field(-SW_SATURATION_FIELD);
    }

    fn magnetization(&self) -> f64 {
        self.state.magnetization
    }

    fn positive_saturation_field(&self) -> f64 {
        SW_SATURATION_FIELD
    }

    fn negative_saturation_field(&self) -> f64 {
        -SW_SATURATION_FIELD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_switching_field_at_45_degrees() {
        let p = StonerWohlfarthParticle::new(FRAC_PI_4);
        assert!((p.switching_field() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_switching_field_easy_axis_limits() {
        assert!((switching_field(0.0) - 1.0).abs() < 1e-12);
        // Astroid minimum is at 45°, with symmetric growth either side.
        let a = switching_field(0.3);
        let b = switching_field(FRAC_PI_4 * 2.0 - 0.3);
        assert!((a - b).abs() < 1e-12);
        assert!(a > 0.5);
    }

    #[test]
    fn test_saturate_then_reverse_flips_branch() {
        let mut p = StonerWohlfarthParticle::new(FRAC_PI_4);
        let m_up = p.apply_field(1.5);
        assert!(m_up > 0.9, "m_up = {m_up}");
        assert_eq!(p.state().branch, Polarity::Positive);

        let m_down = p.apply_field(-1.5);
        assert!(m_down < -0.9, "m_down = {m_down}");
        assert_eq!(p.state().branch, Polarity::Negative);

        let m_up_again = p.apply_field(1.5);
        assert!((m_up_again - m_up).abs() < 1e-6);
    }

    #[test]
    fn test_remanence_depends_on_history() {
        let mut p = StonerWohlfarthParticle::new(FRAC_PI_4);
        p.set_up();
        let m_pos = p.apply_field(0.0);
        p.set_down();
        let m_neg = p.apply_field(0.0);
        assert!((m_pos - FRAC_PI_4.cos()).abs() < 1e-6, "m_pos = {m_pos}");
        assert!((m_neg + FRAC_PI_4.cos()).abs() < 1e-6, "m_neg = {m_neg}");
    }

    #[test]
    fn test_metastable_until_switching_field() {
        let mut p = StonerWohlfarthParticle::new(FRAC_PI_4);
        p.set_up();
        let m_meta = p.apply_field(-0.4);
        assert!(m_meta > 0.0, "still on the positive branch: {m_meta}");
        assert_eq!(p.state().branch, Polarity::Positive);

        let m_switched = p.apply_field(-0.6);
        assert!(m_switched < 0.0, "switched: {m_switched}");
        assert_eq!(p.state().branch, Polarity::Negative);
    }

    #[test]
    fn test_reduced_convention_folds_angle() {
        let reduced = StonerWohlfarthParticle::new(-FRAC_PI_4 - PI);
        assert!((reduced.psi() - FRAC_PI_4).abs() < 1e-12);
        let raw = StonerWohlfarthParticle::with_convention(-FRAC_PI_4, EasyAxisConvention::Raw);
        assert!((raw.psi() + FRAC_PI_4).abs() < 1e-12);
        assert_eq!(raw.convention(), EasyAxisConvention::Raw);
    }

    #[test]
    fn test_transition_replay_is_deterministic() {
        let p = StonerWohlfarthParticle::new(0.6);
        let fields = [1.5, 0.2, -0.3, -1.5, 0.4, 1.5];
        let mut a = p.state();
        let mut b = p.state();
        for &h in &fields {
            let (na, ma) = p.transition(a, h);
            let (nb, mb) = p.transition(b, h);
            assert_eq!(ma, mb);
            a = na;
            b = nb;
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_phi_stays_wrapped() {
        let mut p = StonerWohlfarthParticle::new(1.0);
        for _ in 0..20 {
            p.set_up();
            p.set_down();
        }
        assert!(p.state().phi.abs() < TAU);
    }

    #[test]
    fn test_starved_minimizer_falls_back_to_best_candidate() {
        let starved = MinimizeConfig {
            max_iters: 1,
            ..MinimizeConfig::default()
        };
        let mut p = StonerWohlfarthParticle::new(FRAC_PI_4).with_minimizer(starved);

        // The search budget cannot shrink any bracket down to `tol`.
        let seed = p.state().phi;
        let probe = minimize_local(|phi| p.energy(phi, -1.5), seed, &starved);
        assert!(!probe.converged);

        let fields = [1.5, 0.3, -0.6, -1.5, 0.0, 1.5];
        for &h in &fields {
            let m = p.apply_field(h);
            assert!(m.is_finite(), "h = {h}: m = {m}");
            assert!(m.abs() <= 1.0 + 1e-12, "h = {h}: m = {m}");
            assert_eq!(p.state().magnetization, m);
        }
        let m = p.apply_field(-1.5);
        assert!(m < -0.5, "best candidate should still follow the field: {m}");
    }

    #[test]
    fn test_magnetization_bounded() {
        let mut p = StonerWohlfarthParticle::new(0.2);
        let mut h = -1.5;
        while h <= 1.5 {
            let m = p.apply_field(h);
            assert!(m.abs() <= 1.0 + 1e-12);
            h += 0.05;
        }
    }
}
