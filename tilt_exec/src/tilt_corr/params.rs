//! Parameters structure for TiltCorr

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::geom::DEFAULT_HEIGHT_MM;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for tilt correction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Height of the sensor mount above the ground contact point.
    ///
    /// Units: millimeters
    pub height_mm: f64,

    /// If true the first pair of consecutive samples with the same roll
    /// triggers a re-estimation of every previous sample.
    pub recalc: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("Mount height must be finite and non-negative, found {0} mm")]
    InvalidHeight(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            height_mm: DEFAULT_HEIGHT_MM,
            recalc: true,
        }
    }
}

impl Params {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.height_mm.is_finite() || self.height_mm < 0.0 {
            return Err(ParamsError::InvalidHeight(self.height_mm));
        }

        Ok(())
    }
}
