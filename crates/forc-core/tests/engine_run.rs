// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — End-to-End Engine Runs
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full runs from the bundled JSON configurations.
//!
//! Set `RUST_LOG=forc_core=debug` to see per-branch progress.

use forc_core::forc::ForcEngine;
use forc_core::matter::{MagneticMatter, Matter};
use forc_types::config::RunConfig;
use forc_types::state::cells_to_nan;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static TRACING: OnceLock<()> = OnceLock::new();

fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn config_path(relative: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
        .to_string_lossy()
        .to_string()
}

#[test]
fn preisach_config_end_to_end() {
    init_tracing();
    let engine_config = RunConfig::from_file(&config_path("configs/preisach_forc.json")).unwrap();
    let mut engine = ForcEngine::from_config(&engine_config).unwrap();
    assert!(matches!(engine.matter(), Matter::Ensemble(_)));
    engine.run();

    let (n_rows, n_cols) = engine.grid().shape();
    assert_eq!(n_rows, 61);
    assert_eq!(engine.m_grid().dim(), (n_rows, n_cols));

    // Upper-triangular validity of the magnetization surface.
    for i in 0..n_rows {
        for j in 0..n_cols {
            let defined = engine.m_grid()[[i, j]].is_some();
            assert_eq!(defined, engine.h()[j] >= engine.hr()[i]);
        }
    }

    // The bulk of a Gaussian Preisach ensemble gives a positive distribution.
    let defined: Vec<f64> = engine.p_hchu().iter().flatten().copied().collect();
    assert!(!defined.is_empty());
    let total: f64 = defined.iter().sum();
    assert!(total > 0.0, "integrated distribution = {total}");

    let nan_view = cells_to_nan(engine.p_hchu());
    let nan_count = nan_view.iter().filter(|v| v.is_nan()).count();
    assert_eq!(nan_count + defined.len(), n_rows * n_cols);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    init_tracing();
    let mut config = RunConfig::from_file(&config_path("configs/preisach_forc.json")).unwrap();
    config.forc.resolution = 31;
    config.forc.parallel = false;
    let mut sequential = ForcEngine::from_config(&config).unwrap();
    config.forc.parallel = true;
    let mut parallel = ForcEngine::from_config(&config).unwrap();

    sequential.run();
    parallel.run();
    assert_eq!(sequential.m_grid(), parallel.m_grid());
    assert_eq!(sequential.p_hchu(), parallel.p_hchu());

    // The parallel sweep works on clones; the engine's matter is untouched.
    assert_eq!(parallel.matter().magnetization(), 1.0);
}
