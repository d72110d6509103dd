//! Hysteresis particle operators, matter aggregation and the FORC engine.
//!
//! Particles: rectangular-loop hysteron, Stoner–Wohlfarth coherent rotation,
//! tabulated two-branch model. Matter: single particle or ensemble.
//! `forc::ForcEngine` drives matter through reversal curves and extracts
//! the FORC distribution.

pub mod branch_data;
pub mod ensemble;
pub mod forc;
pub mod hysteron;
pub mod matter;
pub mod particle;
pub mod stoner_wohlfarth;
pub mod two_branch;
