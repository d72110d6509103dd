// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Particle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Particle capability and the closed set of particle models.
//!
//! Every model keeps its history in an explicit `Copy` state value and
//! exposes a pure `transition(state, field) -> (state', m)`; `apply_field`
//! is that transition applied to the stored state.

use crate::branch_data::BranchTable;
use crate::hysteron::Hysteron;
use crate::stoner_wohlfarth::StonerWohlfarthParticle;
use crate::two_branch::TwoBranchParticle;
use forc_types::config::ParticleConfig;
use forc_types::error::HysteresisResult;

/// Two-valued switching state shared by the rectangular-loop and
/// coherent-rotation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Polarity::Positive => 1.0,
            Polarity::Negative => -1.0,
        }
    }
}

/// Hysteretic field → magnetization operator.
///
/// Output depends on the order of applied fields, not on the field alone.
pub trait MagneticParticle {
    /// Apply `field`, update the internal state, return the magnetization.
    fn apply_field(&mut self, field: f64) -> f64;

    /// Force the extreme positive state.
    fn set_up(&mut self);

    /// Force the extreme negative state.
    fn set_down(&mut self);

    fn magnetization(&self) -> f64;

    /// Field above which further increase changes nothing.
    fn positive_saturation_field(&self) -> f64;

    /// Field below which further decrease changes nothing.
    fn negative_saturation_field(&self) -> f64;

    /// Optional switching-field hook. Models without tunable switching
    /// fields ignore it.
    fn prepare_particle(&mut self, _neg_to_pos: f64, _pos_to_neg: f64) {}
}

#[derive(Debug, Clone)]
pub enum Particle {
    Hysteron(Hysteron),
    StonerWohlfarth(StonerWohlfarthParticle),
    TwoBranch(TwoBranchParticle),
}

impl Particle {
    /// Build a particle from its configuration. Two-branch particles load
    /// their table from `path`.
    pub fn from_config(config: &ParticleConfig) -> HysteresisResult<Self> {
        match config {
            ParticleConfig::Hysteron { alpha, beta } => {
                Ok(Particle::Hysteron(Hysteron::new(*alpha, *beta)?))
            }
            ParticleConfig::StonerWohlfarth { psi, convention } => Ok(Particle::StonerWohlfarth(
                StonerWohlfarthParticle::with_convention(*psi, *convention),
            )),
            ParticleConfig::TwoBranch {
                path,
                upper_to_bottom,
                bottom_to_upper,
            } => {
                let table = BranchTable::from_file(path)?;
                let particle = TwoBranchParticle::new(&table)?
                    .with_switching_fields(*upper_to_bottom, *bottom_to_upper);
                Ok(Particle::TwoBranch(particle))
            }
        }
    }
}

impl MagneticParticle for Particle {
    fn apply_field(&mut self, field: f64) -> f64 {
        match self {
            Particle::Hysteron(p) => p.apply_field(field),
            Particle::StonerWohlfarth(p) => p.apply_field(field),
            Particle::TwoBranch(p) => p.apply_field(field),
        }
    }

    fn set_up(&mut self) {
        match self {
            Particle::Hysteron(p) => p.set_up(),
            Particle::StonerWohlfarth(p) => p.set_up(),
            Particle::TwoBranch(p) => p.set_up(),
        }
    }

    fn set_down(&mut self) {
        match self {
            Particle::Hysteron(p) => p.set_down(),
            Particle::StonerWohlfarth(p) => p.set_down(),
            Particle::TwoBranch(p) => p.set_down(),
        }
    }

    fn magnetization(&self) -> f64 {
        match self {
            Particle::Hysteron(p) => p.magnetization(),
            Particle::StonerWohlfarth(p) => p.magnetization(),
            Particle::TwoBranch(p) => p.magnetization(),
        }
    }

    fn positive_saturation_field(&self) -> f64 {
        match self {
            Particle::Hysteron(p) => p.positive_saturation_field(),
            Particle::StonerWohlfarth(p) => p.positive_saturation_field(),
            Particle::TwoBranch(p) => p.positive_saturation_field(),
        }
    }

    fn negative_saturation_field(&self) -> f64 {
        match self {
            Particle::Hysteron(p) => p.negative_saturation_field(),
            Particle::StonerWohlfarth(p) => p.negative_saturation_field(),
            Particle::TwoBranch(p) => p.negative_saturation_field(),
        }
    }

    fn prepare_particle(&mut self, neg_to_pos: f64, pos_to_neg: f64) {
        match self {
            Particle::Hysteron(p) => p.prepare_particle(neg_to_pos, pos_to_neg),
            Particle::StonerWohlfarth(p) => p.prepare_particle(neg_to_pos, pos_to_neg),
            Particle::TwoBranch(p) => p.prepare_particle(neg_to_pos, pos_to_neg),
        }
    }
}

impl From<Hysteron> for Particle {
    fn from(p: Hysteron) -> Self {
        Particle::Hysteron(p)
    }
}

impl From<StonerWohlfarthParticle> for Particle {
    fn from(p: StonerWohlfarthParticle) -> Self {
        Particle::StonerWohlfarth(p)
    }
}

impl From<TwoBranchParticle> for Particle {
    fn from(p: TwoBranchParticle) -> Self {
        Particle::TwoBranch(p)
    }
}
