// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Hysteron
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rectangular-loop (Preisach) hysteron.
//!
//! Switches up above `alpha`, down below `beta`, and remembers its state in
//! between.

use crate::particle::{MagneticParticle, Polarity};
use forc_types::error::{HysteresisError, HysteresisResult};

#[derive(Debug, Clone)]
pub struct Hysteron {
    alpha: f64,
    beta: f64,
    state: Polarity,
}

impl Hysteron {
    /// Requires `alpha >= beta`. Starts in the positive state.
    pub fn new(alpha: f64, beta: f64) -> HysteresisResult<Self> {
        if !alpha.is_finite() || !beta.is_finite() {
            return Err(HysteresisError::ConfigError(format!(
                "hysteron thresholds must be finite, got alpha={alpha}, beta={beta}"
            )));
        }
        if alpha < beta {
            return Err(HysteresisError::ConfigError(format!(
                "hysteron alpha ({alpha}) must be >= beta ({beta})"
            )));
        }
        Ok(Hysteron {
            alpha,
            beta,
            state: Polarity::Positive,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Coercivity `(alpha - beta) / 2`.
    pub fn coercivity(&self) -> f64 {
        0.5 * (self.alpha - self.beta)
    }

    /// Bias (interaction) field `(alpha + beta) / 2`.
    pub fn bias(&self) -> f64 {
        0.5 * (self.alpha + self.beta)
    }

    pub fn state(&self) -> Polarity {
        self.state
    }

    pub fn transition(&self, state: Polarity, field: f64) -> (Polarity, f64) {
        let next = if field > self.alpha {
            Polarity::Positive
        } else if field < self.beta {
            Polarity::Negative
        } else {
            state
        };
        (next, next.sign())
    }
}

impl MagneticParticle for Hysteron {
    fn apply_field(&mut self, field: f64) -> f64 {
        let (next, m) = self.transition(self.state, field);
        self.state = next;
        m
    }

    fn set_up(&mut self) {
        self.state = Polarity::Positive;
    }

    fn set_down(&mut self) {
        self.state = Polarity::Negative;
    }

    fn magnetization(&self) -> f64 {
        self.state.sign()
    }

    fn positive_saturation_field(&self) -> f64 {
        self.alpha + (self.alpha - self.beta) / 2.0
    }

    fn negative_saturation_field(&self) -> f64 {
        self.beta - (self.alpha - self.beta) / 2.0
    }
}
