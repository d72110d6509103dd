// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Two-Branch Particle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Data-driven particle that switches between two tabulated branches.
//!
//! Branches are tabulated against |h|; the output sign follows the field.
//! A sweep reversal resets to the upper branch, |h| above `upper_to_bottom`
//! moves to the bottom branch and |h| below `bottom_to_upper` moves back.

use crate::branch_data::{BranchSample, BranchTable};
use crate::particle::MagneticParticle;
use forc_math::interp::{end_slope, interp_linear, origin_secant_slope};
use forc_types::error::{HysteresisError, HysteresisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBranch {
    Upper,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Rising,
    Falling,
}

/// One tabulated branch, sorted by field.
#[derive(Debug, Clone)]
pub struct BranchCurve {
    fields: Vec<f64>,
    magnetizations: Vec<f64>,
    distances: Vec<f64>,
}

impl BranchCurve {
    /// `samples` must be sorted by field and non-empty.
    pub fn new(samples: &[BranchSample], name: &str) -> HysteresisResult<Self> {
        if samples.is_empty() {
            return Err(HysteresisError::ConfigError(format!(
                "{name} branch has no samples"
            )));
        }
        Ok(BranchCurve {
            fields: samples.iter().map(|s| s.field).collect(),
            magnetizations: samples.iter().map(|s| s.magnetization).collect(),
            distances: samples.iter().map(|s| s.distance).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn max_field(&self) -> f64 {
        self.fields[self.fields.len() - 1]
    }

    /// Secant slope from the origin through the lowest sample.
    pub fn zero_field_susceptibility(&self) -> f64 {
        origin_secant_slope(self.fields[0], self.magnetizations[0])
    }

    /// Slope through the last two samples, zero for a single sample.
    pub fn saturation_slope(&self) -> f64 {
        end_slope(&self.fields, &self.magnetizations)
    }

    /// Magnetization at `amplitude = |h|`, extrapolating outside the table.
    pub fn evaluate(&self, amplitude: f64) -> f64 {
        let lowest = self.fields[0];
        let highest = self.max_field();
        if amplitude < lowest {
            self.zero_field_susceptibility() * amplitude
        } else if amplitude > highest {
            let m_last = self.magnetizations[self.magnetizations.len() - 1];
            m_last + self.saturation_slope() * (amplitude - highest)
        } else {
            interp_linear(&self.fields, &self.magnetizations, amplitude)
        }
    }

    /// Auxiliary distance metric at `amplitude`, clamped to the table.
    pub fn distance_at(&self, amplitude: f64) -> f64 {
        interp_linear(&self.fields, &self.distances, amplitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBranchState {
    pub branch: ActiveBranch,
    pub last_field: f64,
    /// Unknown until the first field change.
    pub direction: Option<SweepDirection>,
    pub magnetization: f64,
}

impl Default for TwoBranchState {
    fn default() -> Self {
        TwoBranchState {
            branch: ActiveBranch::Upper,
            last_field: 0.0,
            direction: None,
            magnetization: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TwoBranchParticle {
    upper: BranchCurve,
    bottom: BranchCurve,
    upper_to_bottom: Option<f64>,
    bottom_to_upper: Option<f64>,
    saturation_field: f64,
    state: TwoBranchState,
}

impl TwoBranchParticle {
    /// Both branches must hold at least one sample. Switching fields start
    /// unset, so the particle stays on the upper branch until configured.
    pub fn new(table: &BranchTable) -> HysteresisResult<Self> {
        let upper = BranchCurve::new(&table.upper, "upper")?;
        let bottom = BranchCurve::new(&table.bottom, "bottom")?;
        let saturation_field = upper.max_field().max(bottom.max_field());
        Ok(TwoBranchParticle {
            upper,
            bottom,
            upper_to_bottom: None,
            bottom_to_upper: None,
            saturation_field,
            state: TwoBranchState::default(),
        })
    }

    pub fn with_switching_fields(
        mut self,
        upper_to_bottom: Option<f64>,
        bottom_to_upper: Option<f64>,
    ) -> Self {
        self.upper_to_bottom = upper_to_bottom;
        self.bottom_to_upper = bottom_to_upper;
        self
    }

    pub fn upper(&self) -> &BranchCurve {
        &self.upper
    }

    pub fn bottom(&self) -> &BranchCurve {
        &self.bottom
    }

    pub fn switching_fields(&self) -> (Option<f64>, Option<f64>) {
        (self.upper_to_bottom, self.bottom_to_upper)
    }

    pub fn state(&self) -> TwoBranchState {
        self.state
    }

    fn curve(&self, branch: ActiveBranch) -> &BranchCurve {
        match branch {
            ActiveBranch::Upper => &self.upper,
            ActiveBranch::Bottom => &self.bottom,
        }
    }

    /// Distance metric of the active branch at `field`.
    pub fn distance_at(&self, field: f64) -> f64 {
        self.curve(self.state.branch).distance_at(field.abs())
    }

    pub fn transition(&self, state: TwoBranchState, field: f64) -> (TwoBranchState, f64) {
        let direction = if field > state.last_field {
            Some(SweepDirection::Rising)
        } else if field < state.last_field {
            Some(SweepDirection::Falling)
        } else {
            state.direction
        };

        let mut branch = state.branch;
        if let (Some(prev), Some(next)) = (state.direction, direction) {
            if prev != next {
                branch = ActiveBranch::Upper;
            }
        }

        let amplitude = field.abs();
        if matches!(self.upper_to_bottom, Some(u2b) if amplitude > u2b) {
            branch = ActiveBranch::Bottom;
        }
        if matches!(self.bottom_to_upper, Some(b2u) if amplitude < b2u) {
            branch = ActiveBranch::Upper;
        }

        let m_abs = self.curve(branch).evaluate(amplitude);
        let magnetization = if field < 0.0 { -m_abs } else { m_abs };
        (
            TwoBranchState {
                branch,
                last_field: field,
                direction,
                magnetization,
            },
            magnetization,
        )
    }
}

impl MagneticParticle for TwoBranchParticle {
    fn apply_field(&mut self, field: f64) -> f64 {
        let (next, m) = self.transition(self.state, field);
        self.state = next;
        m
    }

    fn set_up(&mut self) {
        self.apply_field(self.saturation_field);
    }

    fn set_down(&mut self) {
        self.apply_field(-self.saturation_field);
    }

    fn magnetization(&self) -> f64 {
        self.state.magnetization
    }

    fn positive_saturation_field(&self) -> f64 {
        self.saturation_field
    }

    fn negative_saturation_field(&self) -> f64 {
        -self.saturation_field
    }

    fn prepare_particle(&mut self, neg_to_pos: f64, pos_to_neg: f64) {
        self.bottom_to_upper = Some(neg_to_pos);
        self.upper_to_bottom = Some(pos_to_neg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bundled_table() -> BranchTable {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("configs/data/soft_branches.dat");
        BranchTable::from_file(&path.to_string_lossy()).unwrap()
    }

    fn sample(field: f64, magnetization: f64) -> BranchSample {
        BranchSample {
            field,
            magnetization,
            distance: 0.1 * field,
        }
    }

    #[test]
    fn test_branch_interpolates_inside_range() {
        let p = TwoBranchParticle::new(&bundled_table()).unwrap();
        let expected = 0.462117 + 0.5 * (0.635149 - 0.462117);
        assert!((p.upper().evaluate(0.25) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_branch_extrapolates_below_lowest_sample() {
        let p = TwoBranchParticle::new(&bundled_table()).unwrap();
        let chi0 = 0.244919 / 0.1;
        assert!((p.upper().zero_field_susceptibility() - chi0).abs() < 1e-9);
        assert!((p.upper().evaluate(0.05) - chi0 * 0.05).abs() < 1e-9);
        assert_eq!(p.upper().evaluate(0.0), 0.0);
    }

    #[test]
    fn test_branch_extrapolates_above_highest_sample() {
        let p = TwoBranchParticle::new(&bundled_table()).unwrap();
        let slope = (0.991860 - 0.986614) / 0.1;
        let expected = 0.991860 + slope * 0.1;
        assert!((p.upper().evaluate(1.2) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_branch_is_flat_above_range() {
        let table = BranchTable {
            upper: vec![sample(0.5, 0.8)],
            bottom: vec![sample(0.5, 0.6)],
        };
        let p = TwoBranchParticle::new(&table).unwrap();
        assert_eq!(p.upper().saturation_slope(), 0.0);
        assert!((p.upper().evaluate(2.0) - 0.8).abs() < 1e-12);
        assert!((p.upper().evaluate(0.25) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_branch_rejected() {
        let table = BranchTable {
            upper: vec![sample(0.5, 0.8)],
            bottom: Vec::new(),
        };
        let err = TwoBranchParticle::new(&table).unwrap_err();
        assert!(matches!(err, HysteresisError::ConfigError(_)));
    }

    #[test]
    fn test_output_sign_follows_field() {
        let mut p = TwoBranchParticle::new(&bundled_table()).unwrap();
        let m = p.apply_field(-0.25);
        let expected = 0.462117 + 0.5 * (0.635149 - 0.462117);
        assert!((m + expected).abs() < 1e-9);
    }

    #[test]
    fn test_reversal_resets_to_upper() {
        let mut p = TwoBranchParticle::new(&bundled_table())
            .unwrap()
            .with_switching_fields(Some(0.8), Some(0.1));
        p.apply_field(0.5);
        assert_eq!(p.state().branch, ActiveBranch::Upper);

        let m = p.apply_field(0.9);
        assert_eq!(p.state().branch, ActiveBranch::Bottom);
        assert!((m - 0.924624).abs() < 1e-9);

        let m = p.apply_field(0.5);
        assert_eq!(p.state().branch, ActiveBranch::Upper);
        assert!((m - 0.848284).abs() < 1e-9);
    }

    #[test]
    fn test_bottom_branch_held_until_low_field() {
        let mut p = TwoBranchParticle::new(&bundled_table())
            .unwrap()
            .with_switching_fields(Some(0.8), Some(0.1));
        p.apply_field(-1.0);
        p.apply_field(-1.05);
        // Reversal, then straight back past the upper-to-bottom threshold.
        p.apply_field(-0.9);
        assert_eq!(p.state().branch, ActiveBranch::Bottom);

        let m = p.apply_field(-0.5);
        assert_eq!(p.state().branch, ActiveBranch::Bottom);
        assert!((m + 0.716298).abs() < 1e-9);

        p.apply_field(-0.05);
        assert_eq!(p.state().branch, ActiveBranch::Upper);
    }

    #[test]
    fn test_prepare_particle_sets_switching_fields() {
        let mut p = TwoBranchParticle::new(&bundled_table()).unwrap();
        assert_eq!(p.switching_fields(), (None, None));
        p.prepare_particle(0.1, 0.8);
        assert_eq!(p.switching_fields(), (Some(0.8), Some(0.1)));
    }

    #[test]
    fn test_saturation_fields_span_both_branches() {
        let mut p = TwoBranchParticle::new(&bundled_table()).unwrap();
        assert!((p.positive_saturation_field() - 1.1).abs() < 1e-12);
        assert!((p.negative_saturation_field() + 1.1).abs() < 1e-12);
        p.set_up();
        assert!((p.magnetization() - 0.991860).abs() < 1e-9);
        p.set_down();
        assert!((p.magnetization() + 0.991860).abs() < 1e-9);
    }

    #[test]
    fn test_distance_clamped_to_table() {
        let p = TwoBranchParticle::new(&bundled_table()).unwrap();
        assert!((p.distance_at(0.25) - 0.125).abs() < 1e-9);
        assert!((p.distance_at(5.0) - 0.55).abs() < 1e-9);
        assert!((p.bottom().distance_at(0.0) - 0.04).abs() < 1e-9);
    }
}
