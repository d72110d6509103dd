// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{DEFAULT_RESOLUTION, DEFAULT_SMOOTHING_FACTOR};
use crate::error::{HysteresisError, HysteresisResult};
use crate::state::ForcBounds;
use serde::{Deserialize, Serialize};

/// Top-level run description: FORC window plus the matter to probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub forc: ForcParams,
    pub matter: MatterConfig,
}

/// FORC engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcParams {
    pub max_hc: f64,
    pub min_hu: f64,
    pub max_hu: f64,
    /// Number of reversal fields (default: 101)
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    /// Half-width of the local fit window in grid-index units (default: 4)
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: usize,
    /// Run the sweep and the fit on the rayon pool (default: false)
    #[serde(default)]
    pub parallel: bool,
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}
fn default_smoothing_factor() -> usize {
    DEFAULT_SMOOTHING_FACTOR
}

impl ForcParams {
    pub fn new(max_hc: f64, min_hu: f64, max_hu: f64) -> Self {
        ForcParams {
            max_hc,
            min_hu,
            max_hu,
            resolution: DEFAULT_RESOLUTION,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            parallel: false,
        }
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_smoothing_factor(mut self, smoothing_factor: usize) -> Self {
        self.smoothing_factor = smoothing_factor;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validated (Hc, Hu) rectangle.
    pub fn bounds(&self) -> HysteresisResult<ForcBounds> {
        if self.smoothing_factor == 0 {
            return Err(HysteresisError::ConfigError(
                "smoothing_factor must be >= 1".to_string(),
            ));
        }
        ForcBounds::new(self.max_hc, self.min_hu, self.max_hu)
    }
}

/// Easy-axis angle handling for Stoner–Wohlfarth particles.
///
/// `Reduced` folds the angle into `[0, π)` before use, which is the domain
/// the critical-angle formula assumes. `Raw` keeps the angle as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasyAxisConvention {
    #[default]
    Reduced,
    Raw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParticleConfig {
    Hysteron {
        alpha: f64,
        beta: f64,
    },
    StonerWohlfarth {
        /// Easy-axis angle in radians
        psi: f64,
        #[serde(default)]
        convention: EasyAxisConvention,
    },
    TwoBranch {
        /// Tabulated branch data file
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper_to_bottom: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bottom_to_upper: Option<f64>,
    },
}

/// Gaussian Preisach ensemble of rectangular-loop particles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreisachConfig {
    pub count: usize,
    pub hc_mean: f64,
    pub hc_std: f64,
    #[serde(default)]
    pub hu_mean: f64,
    pub hu_std: f64,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatterConfig {
    Single {
        particle: ParticleConfig,
    },
    Ensemble {
        particles: Vec<ParticleConfig>,
    },
    Preisach(PreisachConfig),
    RandomStonerWohlfarth {
        count: usize,
        #[serde(default)]
        seed: u64,
    },
}

impl RunConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> HysteresisResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> HysteresisResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.forc.bounds()?;
        Ok(config)
    }
}
