// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Matter
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bulk magnetic matter built from particles.
//!
//! `SingleParticleMatter` forwards to one particle; `EnsembleMatter` drives
//! every member with the same field and reports the mean magnetization.

use crate::ensemble::{preisach_hysteron_ensemble, random_stoner_wohlfarth_ensemble};
use crate::particle::{MagneticParticle, Particle};
use forc_types::config::MatterConfig;
use forc_types::error::{HysteresisError, HysteresisResult};

/// Field-driven sample probed by the FORC engine.
pub trait MagneticMatter {
    /// Apply `field` and return the resulting bulk magnetization.
    fn magnetize(&mut self, field: f64) -> f64;

    fn saturate_to_positive(&mut self);

    fn saturate_to_negative(&mut self);

    fn magnetization(&self) -> f64;

    fn positive_saturation_field(&self) -> f64;

    fn negative_saturation_field(&self) -> f64;

    /// Forward switching fields to every particle.
    fn prepare_matter(&mut self, neg_to_pos: f64, pos_to_neg: f64);
}

#[derive(Debug, Clone)]
pub struct SingleParticleMatter<P: MagneticParticle = Particle> {
    particle: P,
}

impl<P: MagneticParticle> SingleParticleMatter<P> {
    pub fn new(particle: P) -> Self {
        SingleParticleMatter { particle }
    }

    pub fn particle(&self) -> &P {
        &self.particle
    }
}

impl<P: MagneticParticle> MagneticMatter for SingleParticleMatter<P> {
    fn magnetize(&mut self, field: f64) -> f64 {
        self.particle.apply_field(field)
    }

    fn saturate_to_positive(&mut self) {
        self.particle.set_up();
    }

    fn saturate_to_negative(&mut self) {
        self.particle.set_down();
    }

    fn magnetization(&self) -> f64 {
        self.particle.magnetization()
    }

    fn positive_saturation_field(&self) -> f64 {
        self.particle.positive_saturation_field()
    }

    fn negative_saturation_field(&self) -> f64 {
        self.particle.negative_saturation_field()
    }

    fn prepare_matter(&mut self, neg_to_pos: f64, pos_to_neg: f64) {
        self.particle.prepare_particle(neg_to_pos, pos_to_neg);
    }
}

#[derive(Debug, Clone)]
pub struct EnsembleMatter<P: MagneticParticle = Particle> {
    particles: Vec<P>,
    magnetization: f64,
    positive_saturation_field: f64,
    negative_saturation_field: f64,
}

impl<P: MagneticParticle> EnsembleMatter<P> {
    /// Members are kept in the given order. An empty ensemble is rejected.
    pub fn new(particles: Vec<P>) -> HysteresisResult<Self> {
        if particles.is_empty() {
            return Err(HysteresisError::ConfigError(
                "ensemble requires at least one particle".to_string(),
            ));
        }
        let positive_saturation_field = particles
            .iter()
            .map(|p| p.positive_saturation_field())
            .fold(f64::NEG_INFINITY, f64::max);
        let negative_saturation_field = particles
            .iter()
            .map(|p| p.negative_saturation_field())
            .fold(f64::INFINITY, f64::min);

        let mut matter = EnsembleMatter {
            particles,
            magnetization: 0.0,
            positive_saturation_field,
            negative_saturation_field,
        };
        matter.refresh_magnetization();
        Ok(matter)
    }

    pub fn particles(&self) -> &[P] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn refresh_magnetization(&mut self) -> f64 {
        let total: f64 = self.particles.iter().map(|p| p.magnetization()).sum();
        self.magnetization = total / self.particles.len() as f64;
        self.magnetization
    }
}

impl<P: MagneticParticle> MagneticMatter for EnsembleMatter<P> {
    fn magnetize(&mut self, field: f64) -> f64 {
        for particle in &mut self.particles {
            particle.apply_field(field);
        }
        self.refresh_magnetization()
    }

    fn saturate_to_positive(&mut self) {
        for particle in &mut self.particles {
            particle.set_up();
        }
        self.refresh_magnetization();
    }

    fn saturate_to_negative(&mut self) {
        for particle in &mut self.particles {
            particle.set_down();
        }
        self.refresh_magnetization();
    }

    fn magnetization(&self) -> f64 {
        self.magnetization
    }

    fn positive_saturation_field(&self) -> f64 {
        self.positive_saturation_field
    }

    fn negative_saturation_field(&self) -> f64 {
        self.negative_saturation_field
    }

    fn prepare_matter(&mut self, neg_to_pos: f64, pos_to_neg: f64) {
        for particle in &mut self.particles {
            particle.prepare_particle(neg_to_pos, pos_to_neg);
        }
        self.refresh_magnetization();
    }
}

/// Matter described by a run configuration.
#[derive(Debug, Clone)]
pub enum Matter {
    Single(SingleParticleMatter),
    Ensemble(EnsembleMatter),
}

impl Matter {
    pub fn from_config(config: &MatterConfig) -> HysteresisResult<Self> {
        match config {
            MatterConfig::Single { particle } => Ok(Matter::Single(SingleParticleMatter::new(
                Particle::from_config(particle)?,
            ))),
            MatterConfig::Ensemble { particles } => {
                let members = particles
                    .iter()
                    .map(Particle::from_config)
                    .collect::<HysteresisResult<Vec<_>>>()?;
                Ok(Matter::Ensemble(EnsembleMatter::new(members)?))
            }
            MatterConfig::Preisach(preisach) => {
                Ok(Matter::Ensemble(preisach_hysteron_ensemble(preisach)?))
            }
            MatterConfig::RandomStonerWohlfarth { count, seed } => Ok(Matter::Ensemble(
                random_stoner_wohlfarth_ensemble(*count, *seed)?,
            )),
        }
    }
}

impl MagneticMatter for Matter {
    fn magnetize(&mut self, field: f64) -> f64 {
        match self {
            Matter::Single(m) => m.magnetize(field),
            Matter::Ensemble(m) => m.magnetize(field),
        }
    }

    fn saturate_to_positive(&mut self) {
        match self {
            Matter::Single(m) => m.saturate_to_positive(),
            Matter::Ensemble(m) => m.saturate_to_positive(),
        }
    }

    fn saturate_to_negative(&mut self) {
        match self {
            Matter::Single(m) => m.saturate_to_negative(),
            Matter::Ensemble(m) => m.saturate_to_negative(),
        }
    }

    fn magnetization(&self) -> f64 {
        match self {
            Matter::Single(m) => m.magnetization(),
            Matter::Ensemble(m) => m.magnetization(),
        }
    }

    fn positive_saturation_field(&self) -> f64 {
        match self {
            Matter::Single(m) => m.positive_saturation_field(),
            Matter::Ensemble(m) => m.positive_saturation_field(),
        }
    }

    fn negative_saturation_field(&self) -> f64 {
        match self {
            Matter::Single(m) => m.negative_saturation_field(),
            Matter::Ensemble(m) => m.negative_saturation_field(),
        }
    }

    fn prepare_matter(&mut self, neg_to_pos: f64, pos_to_neg: f64) {
        match self {
            Matter::Single(m) => m.prepare_matter(neg_to_pos, pos_to_neg),
            Matter::Ensemble(m) => m.prepare_matter(neg_to_pos, pos_to_neg),
        }
    }
}
