//! # Geometry primitives
//!
//! Pure functions used to move between the global frame (GF), in which
//! positions are reported, and the vehicle's local frame (LF), whose x' axis
//! points along the direction of travel and whose y' axis is rotated a
//! quarter turn anticlockwise from x'.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default height of the sensor mount above the ground contact point.
///
/// Units: millimeters
pub const DEFAULT_HEIGHT_MM: f64 = 1500.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Orientation of the local frame axes in the global frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Angle between the GF x axis and the LF x' axis.
    ///
    /// Units: radians
    pub alpha_x_rad: f64,

    /// Angle between the GF x axis and the LF y' axis.
    ///
    /// Units: radians
    pub alpha_y_rad: f64,
}

/// Magnitudes of the tilt induced displacement along the local frame axes.
///
/// Both magnitudes are non-negative, the direction comes from the `Heading`
/// they are applied with.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TiltOffset {
    /// Shift along the LF x' axis.
    ///
    /// Units: millimeters
    pub shift_x_mm: f64,

    /// Shift along the LF y' axis.
    ///
    /// Units: millimeters
    pub shift_y_mm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Heading {
    /// Build a heading from the x' axis angle, the y' axis being a quarter
    /// turn further round.
    pub fn from_alpha_x(alpha_x_rad: f64) -> Self {
        Self {
            alpha_x_rad,
            alpha_y_rad: alpha_x_rad + FRAC_PI_2,
        }
    }

    /// Unit vector along the LF x' axis, in the GF.
    pub fn x_axis(&self) -> Vector2<f64> {
        Vector2::new(self.alpha_x_rad.cos(), self.alpha_x_rad.sin())
    }

    /// Unit vector along the LF y' axis, in the GF.
    pub fn y_axis(&self) -> Vector2<f64> {
        Vector2::new(self.alpha_y_rad.cos(), self.alpha_y_rad.sin())
    }
}

impl TiltOffset {
    /// Apply this offset to a GF position using the given heading.
    pub fn apply(&self, position: &Vector2<f64>, heading: &Heading) -> Vector2<f64> {
        apply_offset(position, heading, self.shift_x_mm, self.shift_y_mm)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Heading of the local frame when travelling from `from` to `to`.
///
/// Identical points give `atan2(0, 0) = 0`, which is returned as is.
pub fn heading_between(from: &Vector2<f64>, to: &Vector2<f64>) -> Heading {
    let delta = to - from;
    Heading::from_alpha_x(delta.y.atan2(delta.x))
}

/// Displacement caused by the sensor mount tilting by the given roll and
/// pitch.
pub fn tilt_offset(roll_deg: f64, pitch_deg: f64, height_mm: f64) -> TiltOffset {
    let roll_rad = roll_deg.to_radians();

    let shift_y_mm = (height_mm * roll_rad.sin()).abs();

    // Pitch tilts the part of the mount left standing after the roll
    let height_adj_mm = (height_mm * roll_rad.cos()).abs();
    let shift_x_mm = (height_adj_mm * pitch_deg.to_radians().sin()).abs();

    TiltOffset {
        shift_x_mm,
        shift_y_mm,
    }
}

/// Shift along the LF y' axis which undoes the roll offset of the given roll.
///
/// Always non-positive.
pub fn backroll_offset(roll_deg: f64, height_mm: f64) -> f64 {
    -(height_mm * roll_deg.to_radians().sin()).abs()
}

/// Shift a GF position along the LF axes.
///
/// The x' shift is applied first, then the y' shift. The two are independent
/// translations along each axis direction.
pub fn apply_offset(
    position: &Vector2<f64>,
    heading: &Heading,
    shift_x_mm: f64,
    shift_y_mm: f64,
) -> Vector2<f64> {
    let shifted_x = position + heading.x_axis() * shift_x_mm;

    shifted_x + heading.y_axis() * shift_y_mm
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
