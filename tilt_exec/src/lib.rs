//! # Tilt compensation library.
//!
//! This library allows other crates in the workspace to access items defined inside the tilt
//! compensation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geometry primitives - headings, tilt offsets and local frame shifts
pub mod geom;

/// Tilt correction module - corrects a trajectory for the tilt of the sensor mount
pub mod tilt_corr;

/// Trajectory data - loading samples, exporting corrected records and summarising them
pub mod traj_data;
