// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Ensemble Generators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Seeded random particle ensembles.

use crate::hysteron::Hysteron;
use crate::matter::EnsembleMatter;
use crate::particle::Particle;
use crate::stoner_wohlfarth::StonerWohlfarthParticle;
use forc_types::config::PreisachConfig;
use forc_types::error::{HysteresisError, HysteresisResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use tracing::debug;

/// Gaussian Preisach ensemble.
///
/// Coercivity `hc = |N(hc_mean, hc_std)|`, bias `hu = N(hu_mean, hu_std)`;
/// each hysteron gets `alpha = hu + hc`, `beta = hu - hc`.
pub fn preisach_hysteron_ensemble(config: &PreisachConfig) -> HysteresisResult<EnsembleMatter> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let hc_dist = Normal::new(config.hc_mean, config.hc_std)
        .map_err(|e| HysteresisError::ConfigError(format!("coercivity distribution: {e}")))?;
    let hu_dist = Normal::new(config.hu_mean, config.hu_std)
        .map_err(|e| HysteresisError::ConfigError(format!("bias distribution: {e}")))?;

    let mut particles = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let hc: f64 = hc_dist.sample(&mut rng).abs();
        let hu: f64 = hu_dist.sample(&mut rng);
        particles.push(Particle::Hysteron(Hysteron::new(hu + hc, hu - hc)?));
    }
    debug!(
        count = config.count,
        seed = config.seed,
        "generated Preisach hysteron ensemble"
    );
    EnsembleMatter::new(particles)
}

/// Stoner–Wohlfarth ensemble with easy axes uniform in `[0, π)`.
pub fn random_stoner_wohlfarth_ensemble(
    count: usize,
    seed: u64,
) -> HysteresisResult<EnsembleMatter> {
    let mut rng = StdRng::seed_from_u64(seed);
    let particles: Vec<Particle> = (0..count)
        .map(|_| Particle::StonerWohlfarth(StonerWohlfarthParticle::new(rng.gen_range(0.0..PI))))
        .collect();
    debug!(count, seed, "generated random Stoner-Wohlfarth ensemble");
    EnsembleMatter::new(particles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::MagneticMatter;

    fn preisach(count: usize, seed: u64) -> PreisachConfig {
        PreisachConfig {
            count,
            hc_mean: 1.0,
            hc_std: 0.25,
            hu_mean: 0.2,
            hu_std: 0.1,
            seed,
        }
    }

    fn hysterons(matter: &EnsembleMatter) -> Vec<(f64, f64)> {
        matter
            .particles()
            .iter()
            .map(|p| match p {
                Particle::Hysteron(h) => (h.alpha(), h.beta()),
                other => panic!("unexpected particle: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_preisach_reproducible_per_seed() {
        let a = preisach_hysteron_ensemble(&preisach(64, 11)).unwrap();
        let b = preisach_hysteron_ensemble(&preisach(64, 11)).unwrap();
        let c = preisach_hysteron_ensemble(&preisach(64, 12)).unwrap();
        assert_eq!(hysterons(&a), hysterons(&b));
        assert_ne!(hysterons(&a), hysterons(&c));
    }

    #[test]
    fn test_preisach_statistics() {
        let matter = preisach_hysteron_ensemble(&preisach(4000, 5)).unwrap();
        let pairs = hysterons(&matter);
        let n = pairs.len() as f64;
        let mean_hc = pairs.iter().map(|(a, b)| 0.5 * (a - b)).sum::<f64>() / n;
        let mean_hu = pairs.iter().map(|(a, b)| 0.5 * (a + b)).sum::<f64>() / n;
        assert!((mean_hc - 1.0).abs() < 0.03, "mean_hc = {mean_hc}");
        assert!((mean_hu - 0.2).abs() < 0.01, "mean_hu = {mean_hu}");
        assert!(pairs.iter().all(|(a, b)| a >= b));
    }

    #[test]
    fn test_preisach_rejects_negative_std() {
        let mut cfg = preisach(10, 1);
        cfg.hc_std = -1.0;
        let err = preisach_hysteron_ensemble(&cfg).unwrap_err();
        assert!(matches!(err, HysteresisError::ConfigError(_)));
    }

    #[test]
    fn test_empty_count_rejected() {
        assert!(preisach_hysteron_ensemble(&preisach(0, 1)).is_err());
        assert!(random_stoner_wohlfarth_ensemble(0, 1).is_err());
    }

    #[test]
    fn test_random_sw_axes_in_range() {
        let matter = random_stoner_wohlfarth_ensemble(32, 9).unwrap();
        assert_eq!(matter.len(), 32);
        for p in matter.particles() {
            match p {
                Particle::StonerWohlfarth(sw) => assert!((0.0..PI).contains(&sw.psi())),
                other => panic!("unexpected particle: {other:?}"),
            }
        }
        assert!((matter.positive_saturation_field() - 1.5).abs() < 1e-12);
    }
}
