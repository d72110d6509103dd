//! Mathematical primitives for the FORC workspace.

pub mod interp;
pub mod linalg;
pub mod minimize;
