//! Two-body Keplerian orbits.

pub mod orbits;
pub mod solver;
